//! A mock light client.
//!
//! The mock client tracks heights and timestamps but verifies nothing: every
//! membership and non-membership proof is accepted. Handler tests thereby
//! exercise the state machines without constructing real consensus proofs,
//! while status, proof-height and freeze behavior stay observable.

use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;
use core::str::FromStr;

use ibc_kernel::client::context::ClientExecutionContext;
use ibc_kernel::client::error::ClientError;
use ibc_kernel::client::{
    ClientStateCommon, ClientStateExecution, ClientStateValidation, ConsensusState, Height, Status,
};
use ibc_kernel::commitment::{CommitmentPrefix, CommitmentProofBytes, CommitmentRoot};
use ibc_kernel::host::identifiers::{ClientId, ClientType};
use ibc_kernel::host::path::{ClientConsensusStatePath, ClientStatePath, Path};
use ibc_kernel::host::ValidationContext;
use ibc_kernel::primitives::Timestamp;

use crate::context::MockContext;

pub const MOCK_CLIENT_TYPE: &str = "9999-mock";

/// A header of the mocked counterparty chain: just a height and the block
/// timestamp at that height.
#[derive(Clone, Copy, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MockHeader {
    pub height: Height,
    pub timestamp: Timestamp,
}

impl MockHeader {
    pub fn new(height: Height, timestamp: Timestamp) -> Self {
        Self { height, timestamp }
    }
}

/// Two headers for the same height; evidence that freezes the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MockMisbehaviour {
    pub header1: MockHeader,
    pub header2: MockHeader,
}

/// What `MsgUpdateClient` carries for a mock client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub enum MockClientMessage {
    Header(MockHeader),
    Misbehaviour(MockMisbehaviour),
}

impl MockClientMessage {
    /// The byte encoding submitted in a message.
    pub fn encode_vec(&self) -> Vec<u8> {
        borsh::to_vec(self).expect("writing a client message to a Vec never fails")
    }

    fn decode(bytes: &[u8]) -> Result<Self, ClientError> {
        borsh::from_slice(bytes).map_err(|e| ClientError::InvalidClientMessage {
            description: e.to_string(),
        })
    }
}

/// Client state of the mock client: the latest header it was updated to and
/// a freeze flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MockClientState {
    pub latest_header: MockHeader,
    pub frozen: bool,
}

impl MockClientState {
    pub fn new(latest_header: MockHeader) -> Self {
        Self {
            latest_header,
            frozen: false,
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// The byte encoding submitted in messages and validated by
    /// `validate_self_client`.
    pub fn encode_vec(&self) -> Vec<u8> {
        borsh::to_vec(self).expect("writing a client state to a Vec never fails")
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ClientError> {
        borsh::from_slice(bytes).map_err(|e| ClientError::InvalidClientState {
            description: e.to_string(),
        })
    }
}

/// Consensus state tracked by the mock client: a fixed root plus the
/// counterparty timestamp of the header that produced it.
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct MockConsensusState {
    pub header: MockHeader,
    root: CommitmentRoot,
}

impl MockConsensusState {
    pub fn new(header: MockHeader) -> Self {
        Self {
            header,
            root: CommitmentRoot::from_bytes(b"mock-commitment-root"),
        }
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ClientError> {
        borsh::from_slice(bytes).map_err(|e| ClientError::InvalidClientState {
            description: e.to_string(),
        })
    }
}

impl ConsensusState for MockConsensusState {
    fn root(&self) -> &CommitmentRoot {
        &self.root
    }

    fn timestamp(&self) -> Timestamp {
        self.header.timestamp
    }

    fn encode_vec(&self) -> Vec<u8> {
        borsh::to_vec(self).expect("writing a consensus state to a Vec never fails")
    }
}

impl ClientStateCommon for MockClientState {
    fn client_type(&self) -> ClientType {
        ClientType::from_str(MOCK_CLIENT_TYPE).expect("mock client type is valid")
    }

    fn latest_height(&self) -> Height {
        self.latest_header.height
    }

    fn validate_proof_height(&self, proof_height: Height) -> Result<(), ClientError> {
        if self.latest_height() < proof_height {
            return Err(ClientError::InsufficientProofHeight {
                proof_height,
                latest_height: self.latest_height(),
            });
        }
        Ok(())
    }

    // The mock client accepts every proof; the tests' subject matter is the
    // handshake and packet state machines, not commitment schemes.
    fn verify_membership(
        &self,
        _prefix: &CommitmentPrefix,
        _proof: &CommitmentProofBytes,
        _root: &CommitmentRoot,
        _path: Path,
        _value: Vec<u8>,
    ) -> Result<(), ClientError> {
        Ok(())
    }

    fn verify_non_membership(
        &self,
        _prefix: &CommitmentPrefix,
        _proof: &CommitmentProofBytes,
        _root: &CommitmentRoot,
        _path: Path,
    ) -> Result<(), ClientError> {
        Ok(())
    }
}

impl ClientStateValidation<MockContext> for MockClientState {
    fn verify_client_message(
        &self,
        _ctx: &MockContext,
        _client_id: &ClientId,
        client_message: &[u8],
    ) -> Result<(), ClientError> {
        match MockClientMessage::decode(client_message)? {
            MockClientMessage::Header(_) => Ok(()),
            MockClientMessage::Misbehaviour(m) => {
                if m.header1.height != m.header2.height {
                    return Err(ClientError::InvalidClientMessage {
                        description: "misbehaviour headers are for different heights".to_string(),
                    });
                }
                Ok(())
            }
        }
    }

    fn check_for_misbehaviour(
        &self,
        _ctx: &MockContext,
        _client_id: &ClientId,
        client_message: &[u8],
    ) -> Result<bool, ClientError> {
        match MockClientMessage::decode(client_message)? {
            MockClientMessage::Header(_) => Ok(false),
            MockClientMessage::Misbehaviour(m) => Ok(m.header1 != m.header2),
        }
    }

    fn status(&self, _ctx: &MockContext, _client_id: &ClientId) -> Result<Status, ClientError> {
        if self.is_frozen() {
            return Ok(Status::Frozen);
        }
        Ok(Status::Active)
    }
}

impl ClientStateExecution<MockContext> for MockClientState {
    fn initialise(
        &self,
        ctx: &mut MockContext,
        client_id: &ClientId,
        consensus_state: &[u8],
    ) -> Result<(), ClientError> {
        let consensus_state = MockConsensusState::decode(consensus_state)?;

        ctx.store_client_state(ClientStatePath::new(client_id.clone()), *self)?;
        ctx.store_consensus_state(
            ClientConsensusStatePath::new(
                client_id.clone(),
                self.latest_height().revision_number(),
                self.latest_height().revision_height(),
            ),
            consensus_state,
        )?;

        Ok(())
    }

    fn update_state(
        &self,
        ctx: &mut MockContext,
        client_id: &ClientId,
        header: &[u8],
    ) -> Result<Vec<Height>, ClientError> {
        let header = match MockClientMessage::decode(header)? {
            MockClientMessage::Header(header) => header,
            MockClientMessage::Misbehaviour(_) => {
                return Err(ClientError::InvalidClientMessage {
                    description: "cannot update a client from misbehaviour evidence".to_string(),
                })
            }
        };

        let new_state = if header.height > self.latest_height() {
            MockClientState {
                latest_header: header,
                frozen: self.frozen,
            }
        } else {
            *self
        };

        ctx.store_client_state(ClientStatePath::new(client_id.clone()), new_state)?;
        ctx.store_consensus_state(
            ClientConsensusStatePath::new(
                client_id.clone(),
                header.height.revision_number(),
                header.height.revision_height(),
            ),
            MockConsensusState::new(header),
        )?;

        let host_timestamp = ctx.host_timestamp()?;
        let host_height = ctx.host_height()?;
        ctx.store_update_meta(client_id.clone(), header.height, host_timestamp, host_height)?;

        Ok(vec![header.height])
    }

    fn update_state_on_misbehaviour(
        &self,
        ctx: &mut MockContext,
        client_id: &ClientId,
        _client_message: &[u8],
    ) -> Result<(), ClientError> {
        let frozen = MockClientState {
            latest_header: self.latest_header,
            frozen: true,
        };
        ctx.store_client_state(ClientStatePath::new(client_id.clone()), frozen)?;
        Ok(())
    }
}

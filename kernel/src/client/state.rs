//! The verification contract implemented by concrete light clients.
//!
//! The contract is split in three traits so that methods needing no context,
//! a validation context, or an execution context can be implemented against
//! exactly the capability they require. The kernel never implements
//! consensus verification; it only orchestrates calls into whichever client
//! the host registered for a given client identifier.

use crate::client::context::{ClientExecutionContext, ClientValidationContext};
use crate::client::error::ClientError;
use crate::client::{Height, Status};
use crate::commitment::{CommitmentPrefix, CommitmentProofBytes, CommitmentRoot};
use crate::host::identifiers::{ClientId, ClientType};
use crate::host::path::Path;
use crate::prelude::*;

/// `ClientState` methods needing neither a validation nor an execution
/// context.
pub trait ClientStateCommon {
    /// Type of the client (e.g. `07-tendermint`).
    fn client_type(&self) -> ClientType;

    /// Latest height the client was updated to.
    fn latest_height(&self) -> Height;

    /// Validates that the client has been updated at least up to
    /// `proof_height`, i.e. that it can possibly hold a consensus root for
    /// it.
    fn validate_proof_height(&self, proof_height: Height) -> Result<(), ClientError>;

    /// Verifies a proof that `value` is committed under `path` in the
    /// counterparty's store with root `root`.
    ///
    /// A failure here is [`ClientError::InvalidProof`]: a permanent
    /// rejection of the message that carried the proof.
    fn verify_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
        value: Vec<u8>,
    ) -> Result<(), ClientError>;

    /// Verifies a proof that nothing is committed under `path` in the
    /// counterparty's store with root `root`.
    fn verify_non_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
    ) -> Result<(), ClientError>;
}

/// `ClientState` methods requiring read access to the client's stored
/// records.
pub trait ClientStateValidation<V>: ClientStateCommon
where
    V: ClientValidationContext,
{
    /// Verifies a client message (header or misbehaviour evidence) against
    /// the tracked consensus. Must be called before `check_for_misbehaviour`
    /// or any state update.
    fn verify_client_message(
        &self,
        ctx: &V,
        client_id: &ClientId,
        client_message: &[u8],
    ) -> Result<(), ClientError>;

    /// Checks whether the (already verified) client message is evidence of
    /// misbehaviour.
    fn check_for_misbehaviour(
        &self,
        ctx: &V,
        client_id: &ClientId,
        client_message: &[u8],
    ) -> Result<bool, ClientError>;

    /// Status of the client. Frozen and expired clients verify nothing.
    fn status(&self, ctx: &V, client_id: &ClientId) -> Result<Status, ClientError>;
}

/// `ClientState` methods requiring write access to the client's stored
/// records. Clients own the storage of their client and consensus states.
pub trait ClientStateExecution<E>: ClientStateValidation<E>
where
    E: ClientExecutionContext,
{
    /// Stores the initial client and consensus states on client creation.
    fn initialise(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        consensus_state: &[u8],
    ) -> Result<(), ClientError>;

    /// Applies a verified header: stores the new consensus state(s) and the
    /// update metadata, and advances the latest height. Returns the heights
    /// updated to (at least one).
    fn update_state(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        header: &[u8],
    ) -> Result<Vec<Height>, ClientError>;

    /// Freezes the client in response to verified misbehaviour. After this,
    /// `status` reports `Frozen` permanently.
    fn update_state_on_misbehaviour(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        client_message: &[u8],
    ) -> Result<(), ClientError>;
}

/// A consensus state tracked for a counterparty chain at one height: the
/// commitment root proofs are checked against, and the counterparty's
/// timestamp at that height.
pub trait ConsensusState {
    fn root(&self) -> &CommitmentRoot;

    fn timestamp(&self) -> crate::primitives::Timestamp;

    /// Deterministic byte encoding, as committed to in the provable store.
    fn encode_vec(&self) -> Vec<u8>;
}

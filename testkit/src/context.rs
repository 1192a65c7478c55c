//! An in-memory host implementing the kernel's context traits.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::time::Duration;

use ibc_kernel::channel::commitment::{AcknowledgementCommitment, PacketCommitment};
use ibc_kernel::channel::error::ChannelError;
use ibc_kernel::channel::packet::Receipt;
use ibc_kernel::channel::ChannelEnd;
use ibc_kernel::client::context::{ClientExecutionContext, ClientValidationContext};
use ibc_kernel::client::error::ClientError;
use ibc_kernel::client::{ClientStateCommon, Height};
use ibc_kernel::commitment::CommitmentPrefix;
use ibc_kernel::connection::error::ConnectionError;
use ibc_kernel::connection::ConnectionEnd;
use ibc_kernel::error::ProtocolError;
use ibc_kernel::host::identifiers::{ChannelCapability, ChannelId, ClientId, ConnectionId, PortId, Sequence};
use ibc_kernel::host::path::{
    AckPath, ChannelEndPath, ClientConsensusStatePath, ClientStatePath, CommitmentPath,
    ConnectionPath, ReceiptPath, SeqAckPath, SeqRecvPath, SeqSendPath,
};
use ibc_kernel::host::{ExecutionContext, ValidationContext};
use ibc_kernel::prelude::format;
use ibc_kernel::primitives::{Signer, Timestamp};

use crate::clients::{MockClientState, MockConsensusState, MockHeader};

/// Everything the host stores for one light client.
#[derive(Clone, Debug)]
pub struct MockClientRecord {
    pub client_state: MockClientState,
    pub consensus_states: BTreeMap<Height, MockConsensusState>,
    /// Host (timestamp, height) at which each client height was installed.
    pub update_metas: BTreeMap<Height, (Timestamp, Height)>,
}

/// An in-memory host chain. State lives in plain maps; heights and
/// timestamps are set by the test.
#[derive(Clone, Debug)]
pub struct MockContext {
    host_height: Height,
    host_timestamp: Timestamp,
    max_time_per_block: Duration,
    client_counter: u64,
    connection_counter: u64,
    channel_counter: u64,
    clients: BTreeMap<ClientId, MockClientRecord>,
    connections: BTreeMap<ConnectionId, ConnectionEnd>,
    channels: BTreeMap<(PortId, ChannelId), ChannelEnd>,
    next_seq_send: BTreeMap<(PortId, ChannelId), Sequence>,
    next_seq_recv: BTreeMap<(PortId, ChannelId), Sequence>,
    next_seq_ack: BTreeMap<(PortId, ChannelId), Sequence>,
    packet_commitments: BTreeMap<(PortId, ChannelId, Sequence), PacketCommitment>,
    packet_receipts: BTreeMap<(PortId, ChannelId, Sequence), Receipt>,
    packet_acks: BTreeMap<(PortId, ChannelId, Sequence), AcknowledgementCommitment>,
    capabilities: BTreeMap<(PortId, ChannelId), ChannelCapability>,
    pub logs: Vec<String>,
}

impl Default for MockContext {
    fn default() -> Self {
        Self {
            host_height: Height::new(0, 10).expect("non-zero height"),
            host_timestamp: Timestamp::from_nanoseconds(10_000_000_000),
            max_time_per_block: Duration::from_secs(10),
            client_counter: 0,
            connection_counter: 0,
            channel_counter: 0,
            clients: BTreeMap::new(),
            connections: BTreeMap::new(),
            channels: BTreeMap::new(),
            next_seq_send: BTreeMap::new(),
            next_seq_recv: BTreeMap::new(),
            next_seq_ack: BTreeMap::new(),
            packet_commitments: BTreeMap::new(),
            packet_receipts: BTreeMap::new(),
            packet_acks: BTreeMap::new(),
            capabilities: BTreeMap::new(),
            logs: Vec::new(),
        }
    }
}

impl MockContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host_height(mut self, height: Height) -> Self {
        self.host_height = height;
        self
    }

    pub fn with_host_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.host_timestamp = timestamp;
        self
    }

    pub fn with_max_expected_time_per_block(mut self, duration: Duration) -> Self {
        self.max_time_per_block = duration;
        self
    }

    /// Installs a client with a consensus state and update metadata at its
    /// latest height, as if it had just been created and updated here.
    pub fn with_client(mut self, client_id: &ClientId, client_state: MockClientState) -> Self {
        let latest = client_state.latest_height();
        let mut consensus_states = BTreeMap::new();
        consensus_states.insert(latest, MockConsensusState::new(client_state.latest_header));
        let mut update_metas = BTreeMap::new();
        update_metas.insert(latest, (self.host_timestamp, self.host_height));

        self.clients.insert(
            client_id.clone(),
            MockClientRecord {
                client_state,
                consensus_states,
                update_metas,
            },
        );
        self.client_counter += 1;
        self
    }

    pub fn with_connection(mut self, conn_id: ConnectionId, conn_end: ConnectionEnd) -> Self {
        self.connections.insert(conn_id, conn_end);
        self.connection_counter += 1;
        self
    }

    /// Installs a channel end, its three sequence counters, and a
    /// capability for it.
    pub fn with_channel(
        mut self,
        port_id: PortId,
        channel_id: ChannelId,
        channel_end: ChannelEnd,
    ) -> Self {
        let key = (port_id.clone(), channel_id.clone());
        self.channels.insert(key.clone(), channel_end);
        self.next_seq_send.entry(key.clone()).or_insert(Sequence::from(1));
        self.next_seq_recv.entry(key.clone()).or_insert(Sequence::from(1));
        self.next_seq_ack.entry(key.clone()).or_insert(Sequence::from(1));
        self.capabilities
            .insert(key, mint_capability(&port_id, &channel_id));
        self.channel_counter += 1;
        self
    }

    /// Moves the host chain forward one block.
    pub fn advance_block(&mut self) {
        self.host_height = self.host_height.increment();
        self.host_timestamp = (self.host_timestamp + self.max_time_per_block)
            .expect("host timestamp does not overflow in tests");
    }

    /// The capability minted for a channel end, as the owning application
    /// would hold it.
    pub fn channel_capability(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Option<ChannelCapability> {
        self.capabilities
            .get(&(port_id.clone(), channel_id.clone()))
            .cloned()
    }

    pub fn client_record(&self, client_id: &ClientId) -> Option<&MockClientRecord> {
        self.clients.get(client_id)
    }

    /// Overwrites the update metadata for one installed client height;
    /// used to simulate a consensus state installed at a chosen host time.
    pub fn set_update_meta(
        &mut self,
        client_id: &ClientId,
        height: Height,
        host_timestamp: Timestamp,
        host_height: Height,
    ) {
        if let Some(record) = self.clients.get_mut(client_id) {
            record
                .update_metas
                .insert(height, (host_timestamp, host_height));
        }
    }

    pub fn packet_commitment_count(&self) -> usize {
        self.packet_commitments.len()
    }
}

fn mint_capability(port_id: &PortId, channel_id: &ChannelId) -> ChannelCapability {
    ChannelCapability::from(format!("capabilities/ports/{port_id}/channels/{channel_id}").into_bytes())
}

impl ClientValidationContext for MockContext {
    type ClientStateRef = MockClientState;
    type ConsensusStateRef = MockConsensusState;

    fn client_state(&self, client_id: &ClientId) -> Result<MockClientState, ProtocolError> {
        self.clients
            .get(client_id)
            .map(|record| record.client_state)
            .ok_or_else(|| {
                ClientError::ClientNotFound {
                    client_id: client_id.clone(),
                }
                .into()
            })
    }

    fn decode_client_state(&self, client_state: &[u8]) -> Result<MockClientState, ProtocolError> {
        Ok(MockClientState::decode(client_state)?)
    }

    fn consensus_state(
        &self,
        client_cons_state_path: &ClientConsensusStatePath,
    ) -> Result<MockConsensusState, ProtocolError> {
        let height = Height::new(
            client_cons_state_path.revision_number,
            client_cons_state_path.revision_height,
        )?;
        self.clients
            .get(&client_cons_state_path.client_id)
            .and_then(|record| record.consensus_states.get(&height))
            .cloned()
            .ok_or_else(|| {
                ClientError::ConsensusStateNotFound {
                    client_id: client_cons_state_path.client_id.clone(),
                    height,
                }
                .into()
            })
    }

    fn client_update_meta(
        &self,
        client_id: &ClientId,
        height: &Height,
    ) -> Result<(Timestamp, Height), ProtocolError> {
        self.clients
            .get(client_id)
            .and_then(|record| record.update_metas.get(height))
            .copied()
            .ok_or_else(|| {
                ClientError::ConsensusStateNotFound {
                    client_id: client_id.clone(),
                    height: *height,
                }
                .into()
            })
    }
}

impl ClientExecutionContext for MockContext {
    type ClientStateMut = MockClientState;

    fn store_client_state(
        &mut self,
        client_state_path: ClientStatePath,
        client_state: MockClientState,
    ) -> Result<(), ProtocolError> {
        self.clients
            .entry(client_state_path.0)
            .and_modify(|record| record.client_state = client_state)
            .or_insert_with(|| MockClientRecord {
                client_state,
                consensus_states: BTreeMap::new(),
                update_metas: BTreeMap::new(),
            });
        Ok(())
    }

    fn store_consensus_state(
        &mut self,
        consensus_state_path: ClientConsensusStatePath,
        consensus_state: MockConsensusState,
    ) -> Result<(), ProtocolError> {
        let height = Height::new(
            consensus_state_path.revision_number,
            consensus_state_path.revision_height,
        )?;
        let record = self
            .clients
            .get_mut(&consensus_state_path.client_id)
            .ok_or_else(|| ClientError::ClientNotFound {
                client_id: consensus_state_path.client_id.clone(),
            })?;
        record.consensus_states.insert(height, consensus_state);
        Ok(())
    }

    fn store_update_meta(
        &mut self,
        client_id: ClientId,
        height: Height,
        host_timestamp: Timestamp,
        host_height: Height,
    ) -> Result<(), ProtocolError> {
        let record = self
            .clients
            .get_mut(&client_id)
            .ok_or_else(|| ClientError::ClientNotFound {
                client_id: client_id.clone(),
            })?;
        record
            .update_metas
            .insert(height, (host_timestamp, host_height));
        Ok(())
    }
}

impl ValidationContext for MockContext {
    type V = Self;
    type HostConsensusState = MockConsensusState;

    fn get_client_validation_context(&self) -> &Self {
        self
    }

    fn host_height(&self) -> Result<Height, ProtocolError> {
        Ok(self.host_height)
    }

    fn host_timestamp(&self) -> Result<Timestamp, ProtocolError> {
        Ok(self.host_timestamp)
    }

    fn host_consensus_state(&self, height: &Height) -> Result<MockConsensusState, ProtocolError> {
        // Deterministically derived, so both sides of a test agree on it.
        Ok(MockConsensusState::new(MockHeader::new(
            *height,
            self.host_timestamp,
        )))
    }

    fn client_counter(&self) -> Result<u64, ProtocolError> {
        Ok(self.client_counter)
    }

    fn connection_end(&self, conn_id: &ConnectionId) -> Result<ConnectionEnd, ProtocolError> {
        self.connections.get(conn_id).cloned().ok_or_else(|| {
            ConnectionError::ConnectionNotFound {
                connection_id: conn_id.clone(),
            }
            .into()
        })
    }

    fn validate_self_client(&self, client_state: &[u8]) -> Result<(), ProtocolError> {
        let client_state = MockClientState::decode(client_state)?;
        if client_state.is_frozen() {
            return Err(ClientError::InvalidClientState {
                description: "the counterparty's client of this chain is frozen".into(),
            }
            .into());
        }
        if client_state.latest_height() > self.host_height {
            return Err(ClientError::InvalidClientState {
                description: format!(
                    "client height {} is ahead of host height {}",
                    client_state.latest_height(),
                    self.host_height
                ),
            }
            .into());
        }
        Ok(())
    }

    fn commitment_prefix(&self) -> CommitmentPrefix {
        CommitmentPrefix::from(b"mock".to_vec())
    }

    fn connection_counter(&self) -> Result<u64, ProtocolError> {
        Ok(self.connection_counter)
    }

    fn channel_end(&self, path: &ChannelEndPath) -> Result<ChannelEnd, ProtocolError> {
        self.channels
            .get(&(path.0.clone(), path.1.clone()))
            .cloned()
            .ok_or_else(|| channel_not_found(&path.0, &path.1))
    }

    fn get_next_sequence_send(&self, path: &SeqSendPath) -> Result<Sequence, ProtocolError> {
        self.next_seq_send
            .get(&(path.0.clone(), path.1.clone()))
            .copied()
            .ok_or_else(|| channel_not_found(&path.0, &path.1))
    }

    fn get_next_sequence_recv(&self, path: &SeqRecvPath) -> Result<Sequence, ProtocolError> {
        self.next_seq_recv
            .get(&(path.0.clone(), path.1.clone()))
            .copied()
            .ok_or_else(|| channel_not_found(&path.0, &path.1))
    }

    fn get_next_sequence_ack(&self, path: &SeqAckPath) -> Result<Sequence, ProtocolError> {
        self.next_seq_ack
            .get(&(path.0.clone(), path.1.clone()))
            .copied()
            .ok_or_else(|| channel_not_found(&path.0, &path.1))
    }

    fn get_packet_commitment(
        &self,
        path: &CommitmentPath,
    ) -> Result<Option<PacketCommitment>, ProtocolError> {
        Ok(self
            .packet_commitments
            .get(&(path.port_id.clone(), path.channel_id.clone(), path.sequence))
            .cloned())
    }

    fn get_packet_receipt(&self, path: &ReceiptPath) -> Result<Option<Receipt>, ProtocolError> {
        Ok(self
            .packet_receipts
            .get(&(path.port_id.clone(), path.channel_id.clone(), path.sequence))
            .cloned())
    }

    fn get_packet_acknowledgement(
        &self,
        path: &AckPath,
    ) -> Result<Option<AcknowledgementCommitment>, ProtocolError> {
        Ok(self
            .packet_acks
            .get(&(path.port_id.clone(), path.channel_id.clone(), path.sequence))
            .cloned())
    }

    fn channel_counter(&self) -> Result<u64, ProtocolError> {
        Ok(self.channel_counter)
    }

    fn max_expected_time_per_block(&self) -> Duration {
        self.max_time_per_block
    }

    fn authenticate_channel_capability(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        capability: &ChannelCapability,
    ) -> Result<(), ProtocolError> {
        match self.capabilities.get(&(port_id.clone(), channel_id.clone())) {
            Some(minted) if minted == capability => Ok(()),
            _ => Err(ChannelError::UnauthorizedCapability {
                port_id: port_id.clone(),
                channel_id: channel_id.clone(),
            }
            .into()),
        }
    }

    fn validate_message_signer(&self, signer: &Signer) -> Result<(), ProtocolError> {
        if signer.as_ref().is_empty() {
            return Err(ClientError::InvalidIdentifier(
                ibc_kernel::host::error::IdentifierError::Empty,
            )
            .into());
        }
        Ok(())
    }
}

fn channel_not_found(port_id: &PortId, channel_id: &ChannelId) -> ProtocolError {
    ChannelError::ChannelNotFound {
        port_id: port_id.clone(),
        channel_id: channel_id.clone(),
    }
    .into()
}

impl ExecutionContext for MockContext {
    type E = Self;

    fn get_client_execution_context(&mut self) -> &mut Self {
        self
    }

    fn increase_client_counter(&mut self) -> Result<(), ProtocolError> {
        self.client_counter += 1;
        Ok(())
    }

    fn store_connection(
        &mut self,
        path: &ConnectionPath,
        connection_end: ConnectionEnd,
    ) -> Result<(), ProtocolError> {
        self.connections.insert(path.0.clone(), connection_end);
        Ok(())
    }

    fn increase_connection_counter(&mut self) -> Result<(), ProtocolError> {
        self.connection_counter += 1;
        Ok(())
    }

    fn store_packet_commitment(
        &mut self,
        path: &CommitmentPath,
        commitment: PacketCommitment,
    ) -> Result<(), ProtocolError> {
        self.packet_commitments.insert(
            (path.port_id.clone(), path.channel_id.clone(), path.sequence),
            commitment,
        );
        Ok(())
    }

    fn delete_packet_commitment(&mut self, path: &CommitmentPath) -> Result<(), ProtocolError> {
        self.packet_commitments
            .remove(&(path.port_id.clone(), path.channel_id.clone(), path.sequence));
        Ok(())
    }

    fn store_packet_receipt(
        &mut self,
        path: &ReceiptPath,
        receipt: Receipt,
    ) -> Result<(), ProtocolError> {
        self.packet_receipts.insert(
            (path.port_id.clone(), path.channel_id.clone(), path.sequence),
            receipt,
        );
        Ok(())
    }

    fn store_packet_acknowledgement(
        &mut self,
        path: &AckPath,
        ack_commitment: AcknowledgementCommitment,
    ) -> Result<(), ProtocolError> {
        self.packet_acks.insert(
            (path.port_id.clone(), path.channel_id.clone(), path.sequence),
            ack_commitment,
        );
        Ok(())
    }

    fn delete_packet_acknowledgement(&mut self, path: &AckPath) -> Result<(), ProtocolError> {
        self.packet_acks
            .remove(&(path.port_id.clone(), path.channel_id.clone(), path.sequence));
        Ok(())
    }

    fn store_channel(
        &mut self,
        path: &ChannelEndPath,
        channel_end: ChannelEnd,
    ) -> Result<(), ProtocolError> {
        self.channels
            .insert((path.0.clone(), path.1.clone()), channel_end);
        Ok(())
    }

    fn store_next_sequence_send(
        &mut self,
        path: &SeqSendPath,
        seq: Sequence,
    ) -> Result<(), ProtocolError> {
        self.next_seq_send
            .insert((path.0.clone(), path.1.clone()), seq);
        Ok(())
    }

    fn store_next_sequence_recv(
        &mut self,
        path: &SeqRecvPath,
        seq: Sequence,
    ) -> Result<(), ProtocolError> {
        self.next_seq_recv
            .insert((path.0.clone(), path.1.clone()), seq);
        Ok(())
    }

    fn store_next_sequence_ack(
        &mut self,
        path: &SeqAckPath,
        seq: Sequence,
    ) -> Result<(), ProtocolError> {
        self.next_seq_ack
            .insert((path.0.clone(), path.1.clone()), seq);
        Ok(())
    }

    fn increase_channel_counter(&mut self) -> Result<(), ProtocolError> {
        self.channel_counter += 1;
        Ok(())
    }

    fn create_channel_capability(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
    ) -> Result<(), ProtocolError> {
        let capability = mint_capability(&port_id, &channel_id);
        self.capabilities.insert((port_id, channel_id), capability);
        Ok(())
    }

    fn log_message(&mut self, message: String) -> Result<(), ProtocolError> {
        self.logs.push(message);
        Ok(())
    }
}

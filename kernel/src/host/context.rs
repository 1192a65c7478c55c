//! The traits a host chain implements to run the protocol kernel.
//!
//! [`ValidationContext`] is the read-only view used by the `validate`
//! half of every handler; [`ExecutionContext`] adds the writes used by
//! the `execute` half. A host implements both over its own store and
//! passes itself to [`crate::entrypoint::dispatch`].

use core::time::Duration;

use crate::channel::commitment::{AcknowledgementCommitment, PacketCommitment};
use crate::channel::packet::Receipt;
use crate::channel::ChannelEnd;
use crate::client::context::{ClientExecutionContext, ClientValidationContext};
use crate::client::{ConsensusState, Height};
use crate::commitment::CommitmentPrefix;
use crate::connection::version::{self as connection_version, Version as ConnectionVersion};
use crate::connection::ConnectionEnd;
use crate::error::ProtocolError;
use crate::host::identifiers::{ChannelCapability, ChannelId, ConnectionId, PortId, Sequence};
use crate::host::path::{
    AckPath, ChannelEndPath, CommitmentPath, ConnectionPath, ReceiptPath, SeqAckPath, SeqRecvPath,
    SeqSendPath,
};
use crate::prelude::*;
use crate::primitives::{Signer, Timestamp};

/// Read-only access to the host's committed protocol state.
pub trait ValidationContext: Sized {
    type V: ClientValidationContext;
    /// The consensus state of the host chain itself, as stored by
    /// counterparty chains and reproduced here for handshake checks.
    type HostConsensusState: ConsensusState;

    /// Access to the client sub-context holding client and consensus states.
    fn get_client_validation_context(&self) -> &Self::V;

    /// The current height of the host chain.
    fn host_height(&self) -> Result<Height, ProtocolError>;

    /// The timestamp of the current host block.
    fn host_timestamp(&self) -> Result<Timestamp, ProtocolError>;

    /// The host consensus state at `height`, used to check that a
    /// counterparty's view of this chain is accurate.
    fn host_consensus_state(
        &self,
        height: &Height,
    ) -> Result<Self::HostConsensusState, ProtocolError>;

    /// Number of clients created on this chain; never decreases.
    fn client_counter(&self) -> Result<u64, ProtocolError>;

    /// Returns the connection end stored under `conn_id`.
    fn connection_end(&self, conn_id: &ConnectionId) -> Result<ConnectionEnd, ProtocolError>;

    /// Checks that `client_state`, submitted by a counterparty as its view
    /// of this chain, is a plausible client of the host.
    fn validate_self_client(&self, client_state: &[u8]) -> Result<(), ProtocolError>;

    /// The prefix under which this chain commits protocol state.
    fn commitment_prefix(&self) -> CommitmentPrefix;

    /// Number of connections created on this chain; never decreases.
    fn connection_counter(&self) -> Result<u64, ProtocolError>;

    /// The connection versions this chain is willing to negotiate.
    fn get_compatible_versions(&self) -> Vec<ConnectionVersion> {
        connection_version::compatibles()
    }

    /// Returns the channel end stored under the given port and channel.
    fn channel_end(&self, path: &ChannelEndPath) -> Result<ChannelEnd, ProtocolError>;

    fn get_next_sequence_send(&self, path: &SeqSendPath) -> Result<Sequence, ProtocolError>;

    fn get_next_sequence_recv(&self, path: &SeqRecvPath) -> Result<Sequence, ProtocolError>;

    fn get_next_sequence_ack(&self, path: &SeqAckPath) -> Result<Sequence, ProtocolError>;

    /// The stored commitment for an in-flight packet, or `None` once the
    /// packet has been acknowledged or timed out.
    fn get_packet_commitment(
        &self,
        path: &CommitmentPath,
    ) -> Result<Option<PacketCommitment>, ProtocolError>;

    /// The receipt recorded for a delivered packet, or `None` if the
    /// packet has not been received.
    fn get_packet_receipt(&self, path: &ReceiptPath) -> Result<Option<Receipt>, ProtocolError>;

    /// The acknowledgement commitment written for a received packet, or
    /// `None` if no acknowledgement has been written.
    fn get_packet_acknowledgement(
        &self,
        path: &AckPath,
    ) -> Result<Option<AcknowledgementCommitment>, ProtocolError>;

    /// Number of channels created on this chain; never decreases.
    fn channel_counter(&self) -> Result<u64, ProtocolError>;

    /// The maximum interval the host expects between two of its blocks.
    /// Converts a connection's time delay into a block delay.
    fn max_expected_time_per_block(&self) -> Duration;

    /// The number of blocks that must elapse to honor a connection's
    /// `delay_period` time.
    fn block_delay(&self, delay_period_time: &Duration) -> u64 {
        calculate_block_delay(delay_period_time, &self.max_expected_time_per_block())
    }

    /// Checks that `capability` was minted for this channel end and has
    /// not been revoked. Packet sends and channel closure require it.
    fn authenticate_channel_capability(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        capability: &ChannelCapability,
    ) -> Result<(), ProtocolError>;

    /// Host-specific check on the signer of a message.
    fn validate_message_signer(&self, signer: &Signer) -> Result<(), ProtocolError>;
}

/// Write access to the host's protocol state.
pub trait ExecutionContext: ValidationContext {
    type E: ClientExecutionContext;

    /// Mutable access to the client sub-context.
    fn get_client_execution_context(&mut self) -> &mut Self::E;

    fn increase_client_counter(&mut self) -> Result<(), ProtocolError>;

    /// Stores a connection end under its path.
    fn store_connection(
        &mut self,
        path: &ConnectionPath,
        connection_end: ConnectionEnd,
    ) -> Result<(), ProtocolError>;

    fn increase_connection_counter(&mut self) -> Result<(), ProtocolError>;

    fn store_packet_commitment(
        &mut self,
        path: &CommitmentPath,
        commitment: PacketCommitment,
    ) -> Result<(), ProtocolError>;

    fn delete_packet_commitment(&mut self, path: &CommitmentPath) -> Result<(), ProtocolError>;

    fn store_packet_receipt(
        &mut self,
        path: &ReceiptPath,
        receipt: Receipt,
    ) -> Result<(), ProtocolError>;

    fn store_packet_acknowledgement(
        &mut self,
        path: &AckPath,
        ack_commitment: AcknowledgementCommitment,
    ) -> Result<(), ProtocolError>;

    fn delete_packet_acknowledgement(&mut self, path: &AckPath) -> Result<(), ProtocolError>;

    fn store_channel(
        &mut self,
        path: &ChannelEndPath,
        channel_end: ChannelEnd,
    ) -> Result<(), ProtocolError>;

    fn store_next_sequence_send(
        &mut self,
        path: &SeqSendPath,
        seq: Sequence,
    ) -> Result<(), ProtocolError>;

    fn store_next_sequence_recv(
        &mut self,
        path: &SeqRecvPath,
        seq: Sequence,
    ) -> Result<(), ProtocolError>;

    fn store_next_sequence_ack(
        &mut self,
        path: &SeqAckPath,
        seq: Sequence,
    ) -> Result<(), ProtocolError>;

    fn increase_channel_counter(&mut self) -> Result<(), ProtocolError>;

    /// Mints and records the capability that authorizes sends and closure
    /// on a newly created channel end. The host hands the token to the
    /// application owning the port; the kernel only ever sees it again
    /// through [`ValidationContext::authenticate_channel_capability`].
    fn create_channel_capability(
        &mut self,
        port_id: PortId,
        channel_id: ChannelId,
    ) -> Result<(), ProtocolError>;

    /// Structured log line for host operators; not part of consensus.
    fn log_message(&mut self, message: String) -> Result<(), ProtocolError>;
}

/// Rounds a time delay up to a whole number of blocks.
pub fn calculate_block_delay(
    delay_period_time: &Duration,
    max_expected_time_per_block: &Duration,
) -> u64 {
    let delay_period_time = delay_period_time.as_secs();
    let max_expected_time_per_block = max_expected_time_per_block.as_secs();

    if max_expected_time_per_block == 0 {
        return 0;
    }

    if delay_period_time % max_expected_time_per_block == 0 {
        return delay_period_time / max_expected_time_per_block;
    }

    delay_period_time / max_expected_time_per_block + 1
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::zero_delay(0, 10, 0)]
    #[case::exact_multiple(30, 10, 3)]
    #[case::rounds_up(35, 10, 4)]
    #[case::no_block_estimate(35, 0, 0)]
    fn block_delay_rounds_up(#[case] delay: u64, #[case] per_block: u64, #[case] expected: u64) {
        assert_eq!(
            calculate_block_delay(&Duration::from_secs(delay), &Duration::from_secs(per_block)),
            expected
        );
    }
}

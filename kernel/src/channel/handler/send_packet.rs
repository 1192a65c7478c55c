//! `send_packet` is not message-driven: the sending application calls it
//! directly, presenting the channel capability it was handed at handshake
//! time.

use crate::channel::commitment::compute_packet_commitment;
use crate::channel::error::PacketError;
use crate::channel::events::SendPacket;
use crate::channel::packet::Packet;
use crate::channel::{Counterparty, State};
use crate::client::context::ClientValidationContext;
use crate::client::{ClientStateCommon, ClientStateValidation, ConsensusState};
use crate::error::ProtocolError;
use crate::events::IbcEvent;
use crate::host::identifiers::ChannelCapability;
use crate::host::path::{ChannelEndPath, ClientConsensusStatePath, CommitmentPath, SeqSendPath};
use crate::host::{ExecutionContext, ValidationContext};
use crate::prelude::*;

/// Commits an outgoing packet: checks the channel and its client, verifies
/// the packet is not already timed out from the counterparty's point of
/// view, and stores the packet commitment under the next send sequence.
pub fn send_packet<Ctx>(
    ctx_a: &mut Ctx,
    capability: &ChannelCapability,
    packet: Packet,
) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    send_packet_validate(ctx_a, capability, &packet)?;
    send_packet_execute(ctx_a, packet)
}

pub fn send_packet_validate<Ctx>(
    ctx_a: &Ctx,
    capability: &ChannelCapability,
    packet: &Packet,
) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    if !packet.timeout_height_on_b.is_set() && !packet.timeout_timestamp_on_b.is_set() {
        return Err(PacketError::MissingTimeout.into());
    }

    let chan_end_path_on_a = ChannelEndPath::new(&packet.port_id_on_a, &packet.chan_id_on_a);
    let chan_end_on_a = ctx_a.channel_end(&chan_end_path_on_a)?;

    // Sends require a fully open channel; a mid-handshake end has no
    // agreed version for the application to speak.
    chan_end_on_a.verify_state_matches(&State::Open)?;

    let counterparty = Counterparty::new(
        packet.port_id_on_b.clone(),
        Some(packet.chan_id_on_b.clone()),
    );
    chan_end_on_a.verify_counterparty_matches(&counterparty)?;

    ctx_a.authenticate_channel_capability(
        &packet.port_id_on_a,
        &packet.chan_id_on_a,
        capability,
    )?;

    let conn_end_on_a = ctx_a.connection_end(chan_end_on_a.connection_id())?;

    let client_id_on_a = conn_end_on_a.client_id();
    let client_val_ctx_a = ctx_a.get_client_validation_context();
    let client_state_of_b_on_a = client_val_ctx_a.client_state(client_id_on_a)?;

    client_state_of_b_on_a
        .status(client_val_ctx_a, client_id_on_a)?
        .verify_is_active()?;

    // Refuse packets that are dead on arrival, judged against the latest
    // view of the counterparty this chain has.
    let latest_height_on_a = client_state_of_b_on_a.latest_height();

    if packet.timeout_height_on_b.has_expired(latest_height_on_a) {
        return Err(PacketError::LowPacketHeight {
            chain_height: latest_height_on_a,
            timeout_height: packet.timeout_height_on_b,
        }
        .into());
    }

    let client_cons_state_path_on_a = ClientConsensusStatePath::new(
        client_id_on_a.clone(),
        latest_height_on_a.revision_number(),
        latest_height_on_a.revision_height(),
    );
    let consensus_state_of_b_on_a = client_val_ctx_a.consensus_state(&client_cons_state_path_on_a)?;
    let latest_timestamp_on_b = consensus_state_of_b_on_a.timestamp();

    if packet.timeout_timestamp_on_b.has_expired(&latest_timestamp_on_b) {
        return Err(PacketError::LowPacketTimestamp {
            chain_timestamp: latest_timestamp_on_b,
            timeout_timestamp: packet.timeout_timestamp_on_b,
        }
        .into());
    }

    let seq_send_path_on_a = SeqSendPath::new(&packet.port_id_on_a, &packet.chan_id_on_a);
    let next_seq_send_on_a = ctx_a.get_next_sequence_send(&seq_send_path_on_a)?;

    if packet.seq_on_a != next_seq_send_on_a {
        return Err(PacketError::InvalidPacketSequence {
            given_sequence: packet.seq_on_a,
            next_sequence: next_seq_send_on_a,
        }
        .into());
    }

    Ok(())
}

pub fn send_packet_execute<Ctx>(
    ctx_a: &mut Ctx,
    packet: Packet,
) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    let seq_send_path_on_a = SeqSendPath::new(&packet.port_id_on_a, &packet.chan_id_on_a);
    let next_seq_send_on_a = ctx_a.get_next_sequence_send(&seq_send_path_on_a)?;

    // A sequence that can no longer advance poisons the channel; refuse
    // the send rather than wrap around.
    let bumped_seq = next_seq_send_on_a
        .increment()
        .ok_or(PacketError::SequenceOverflow)?;

    let chan_end_path_on_a = ChannelEndPath::new(&packet.port_id_on_a, &packet.chan_id_on_a);
    let chan_end_on_a = ctx_a.channel_end(&chan_end_path_on_a)?;

    ctx_a.store_next_sequence_send(&seq_send_path_on_a, bumped_seq)?;

    ctx_a.store_packet_commitment(
        &CommitmentPath::new(&packet.port_id_on_a, &packet.chan_id_on_a, packet.seq_on_a),
        compute_packet_commitment(
            &packet.data,
            &packet.timeout_height_on_b,
            &packet.timeout_timestamp_on_b,
        ),
    )?;

    ctx_a.log_message(format!(
        "success: send_packet: sequence {} on {}/{}",
        packet.seq_on_a, packet.port_id_on_a, packet.chan_id_on_a
    ))?;

    let channel_ordering = *chan_end_on_a.ordering();

    Ok(vec![IbcEvent::SendPacket(SendPacket {
        packet,
        channel_ordering,
    })])
}

//! Protocol logic for `MsgRecvPacket`.

use crate::channel::commitment::{compute_ack_commitment, compute_packet_commitment};
use crate::channel::error::{ChannelError, PacketError};
use crate::channel::events::{ReceivePacket, WriteAcknowledgement};
use crate::channel::msgs::MsgRecvPacket;
use crate::channel::packet::Receipt;
use crate::channel::{Counterparty, Order, State};
use crate::client::context::ClientValidationContext;
use crate::client::{ClientStateCommon, ClientStateValidation, ConsensusState};
use crate::connection::delay::verify_conn_delay_passed;
use crate::connection::State as ConnectionState;
use crate::error::ProtocolError;
use crate::events::IbcEvent;
use crate::host::path::{
    AckPath, ChannelEndPath, ClientConsensusStatePath, CommitmentPath, Path, ReceiptPath,
    SeqRecvPath,
};
use crate::host::{ExecutionContext, ValidationContext};
use crate::prelude::*;
use crate::router::Module;

pub fn recv_packet_validate<Ctx>(ctx_b: &Ctx, msg: &MsgRecvPacket) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    ctx_b.validate_message_signer(&msg.signer)?;

    let chan_end_path_on_b = ChannelEndPath::new(&msg.packet.port_id_on_b, &msg.packet.chan_id_on_b);
    let chan_end_on_b = ctx_b.channel_end(&chan_end_path_on_b)?;

    chan_end_on_b.verify_state_matches(&State::Open)?;

    let counterparty = Counterparty::new(
        msg.packet.port_id_on_a.clone(),
        Some(msg.packet.chan_id_on_a.clone()),
    );
    chan_end_on_b.verify_counterparty_matches(&counterparty)?;

    let conn_end_on_b = ctx_b.connection_end(chan_end_on_b.connection_id())?;

    conn_end_on_b
        .verify_state_matches(&ConnectionState::Open)
        .map_err(|_| ChannelError::ConnectionNotOpen {
            connection_id: chan_end_on_b.connection_id().clone(),
        })?;

    // The timeout bounds are judged against this chain, the destination.
    let latest_height = ctx_b.host_height()?;
    if msg.packet.timeout_height_on_b.has_expired(latest_height) {
        return Err(PacketError::LowPacketHeight {
            chain_height: latest_height,
            timeout_height: msg.packet.timeout_height_on_b,
        }
        .into());
    }

    let latest_timestamp = ctx_b.host_timestamp()?;
    if msg.packet.timeout_timestamp_on_b.has_expired(&latest_timestamp) {
        return Err(PacketError::LowPacketTimestamp {
            chain_timestamp: latest_timestamp,
            timeout_timestamp: msg.packet.timeout_timestamp_on_b,
        }
        .into());
    }

    // Replay of an already-received sequence resolves as a no-op during
    // execution; the proof need not be checked again.
    if chan_end_on_b.order_matches(&Order::Unordered) {
        let receipt_path_on_b = ReceiptPath::new(
            &msg.packet.port_id_on_b,
            &msg.packet.chan_id_on_b,
            msg.packet.seq_on_a,
        );
        if ctx_b.get_packet_receipt(&receipt_path_on_b)?.is_some() {
            return Ok(());
        }
    }

    let client_id_on_b = conn_end_on_b.client_id();
    let client_val_ctx_b = ctx_b.get_client_validation_context();
    let client_state_of_a_on_b = client_val_ctx_b.client_state(client_id_on_b)?;

    client_state_of_a_on_b
        .status(client_val_ctx_b, client_id_on_b)?
        .verify_is_active()?;
    client_state_of_a_on_b.validate_proof_height(msg.proof_height_on_a)?;

    let client_cons_state_path_on_b = ClientConsensusStatePath::new(
        client_id_on_b.clone(),
        msg.proof_height_on_a.revision_number(),
        msg.proof_height_on_a.revision_height(),
    );
    let consensus_state_of_a_on_b = client_val_ctx_b.consensus_state(&client_cons_state_path_on_b)?;

    verify_conn_delay_passed(ctx_b, msg.proof_height_on_a, &conn_end_on_b)?;

    // The relayed packet fields must hash to the commitment chain A holds.
    let expected_commitment_on_a = compute_packet_commitment(
        &msg.packet.data,
        &msg.packet.timeout_height_on_b,
        &msg.packet.timeout_timestamp_on_b,
    );

    let commitment_path_on_a = CommitmentPath::new(
        &msg.packet.port_id_on_a,
        &msg.packet.chan_id_on_a,
        msg.packet.seq_on_a,
    );

    client_state_of_a_on_b
        .verify_membership(
            conn_end_on_b.counterparty().prefix(),
            &msg.proof_commitment_on_a,
            consensus_state_of_a_on_b.root(),
            Path::Commitment(commitment_path_on_a),
            expected_commitment_on_a.into_vec(),
        )
        .map_err(|client_error| PacketError::PacketVerificationFailed {
            sequence: msg.packet.seq_on_a,
            client_error,
        })?;

    if chan_end_on_b.order_matches(&Order::Ordered) {
        let seq_recv_path_on_b =
            SeqRecvPath::new(&msg.packet.port_id_on_b, &msg.packet.chan_id_on_b);
        let next_seq_recv = ctx_b.get_next_sequence_recv(&seq_recv_path_on_b)?;

        // Ahead of schedule is an error; behind schedule is a replay,
        // resolved as a no-op during execution.
        if msg.packet.seq_on_a > next_seq_recv {
            return Err(PacketError::InvalidPacketSequence {
                given_sequence: msg.packet.seq_on_a,
                next_sequence: next_seq_recv,
            }
            .into());
        }
    }

    Ok(())
}

pub fn recv_packet_execute<Ctx>(
    ctx_b: &mut Ctx,
    module: &mut dyn Module,
    msg: MsgRecvPacket,
) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    let chan_end_path_on_b = ChannelEndPath::new(&msg.packet.port_id_on_b, &msg.packet.chan_id_on_b);
    let chan_end_on_b = ctx_b.channel_end(&chan_end_path_on_b)?;

    let seq_recv_path_on_b = SeqRecvPath::new(&msg.packet.port_id_on_b, &msg.packet.chan_id_on_b);
    let receipt_path_on_b = ReceiptPath::new(
        &msg.packet.port_id_on_b,
        &msg.packet.chan_id_on_b,
        msg.packet.seq_on_a,
    );

    // A packet relayed twice must succeed without effects: neither the
    // application callback nor any event may fire again.
    let already_received = match chan_end_on_b.ordering() {
        Order::Ordered => msg.packet.seq_on_a < ctx_b.get_next_sequence_recv(&seq_recv_path_on_b)?,
        Order::Unordered => ctx_b.get_packet_receipt(&receipt_path_on_b)?.is_some(),
    };

    if already_received {
        ctx_b.log_message(format!(
            "success: recv_packet: packet {} already received, no-op",
            msg.packet.seq_on_a
        ))?;
        return Ok(vec![]);
    }

    let ack_path_on_b = AckPath::new(
        &msg.packet.port_id_on_b,
        &msg.packet.chan_id_on_b,
        msg.packet.seq_on_a,
    );

    if ctx_b.get_packet_acknowledgement(&ack_path_on_b)?.is_some() {
        return Err(PacketError::AcknowledgementExists {
            sequence: msg.packet.seq_on_a,
        }
        .into());
    }

    let (extras, acknowledgement) = module.on_recv_packet_execute(&msg.packet, &msg.signer);

    match chan_end_on_b.ordering() {
        Order::Ordered => {
            let next_seq_recv = ctx_b.get_next_sequence_recv(&seq_recv_path_on_b)?;
            let bumped_seq = next_seq_recv
                .increment()
                .ok_or(PacketError::SequenceOverflow)?;
            ctx_b.store_next_sequence_recv(&seq_recv_path_on_b, bumped_seq)?;
        }
        Order::Unordered => {
            ctx_b.store_packet_receipt(&receipt_path_on_b, Receipt::Ok)?;
        }
    }

    ctx_b.store_packet_acknowledgement(&ack_path_on_b, compute_ack_commitment(&acknowledgement))?;

    ctx_b.log_message(format!(
        "success: recv_packet: sequence {} on {}/{}",
        msg.packet.seq_on_a, msg.packet.port_id_on_b, msg.packet.chan_id_on_b
    ))?;
    for log in extras.log {
        ctx_b.log_message(log)?;
    }

    let channel_ordering = *chan_end_on_b.ordering();

    let mut events = vec![
        IbcEvent::ReceivePacket(ReceivePacket {
            packet: msg.packet.clone(),
            channel_ordering,
        }),
        IbcEvent::WriteAcknowledgement(WriteAcknowledgement {
            packet: msg.packet,
            acknowledgement,
        }),
    ];
    events.extend(extras.events.into_iter().map(IbcEvent::Module));

    Ok(events)
}

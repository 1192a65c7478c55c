//! Protocol logic for `MsgTimeout`, plus the execution path shared with
//! `MsgTimeoutOnClose`.

use crate::channel::commitment::compute_packet_commitment;
use crate::channel::error::PacketError;
use crate::channel::events::{ChannelClosed, TimeoutPacket};
use crate::channel::msgs::{MsgTimeout, MsgTimeoutOnClose};
use crate::channel::packet::Packet;
use crate::channel::{ChannelEnd, Counterparty, Order, State};
use crate::client::context::ClientValidationContext;
use crate::client::{ClientStateCommon, ClientStateValidation, ConsensusState};
use crate::commitment::{CommitmentProofBytes, CommitmentRoot};
use crate::connection::delay::verify_conn_delay_passed;
use crate::connection::ConnectionEnd;
use crate::error::ProtocolError;
use crate::events::IbcEvent;
use crate::host::identifiers::Sequence;
use crate::host::path::{
    ChannelEndPath, ClientConsensusStatePath, CommitmentPath, Path, ReceiptPath, SeqRecvPath,
};
use crate::host::{ExecutionContext, ValidationContext};
use crate::prelude::*;
use crate::router::Module;

/// Both timeout flavors mutate state identically; only their validation
/// differs.
pub enum TimeoutMsgType {
    Timeout(MsgTimeout),
    TimeoutOnClose(MsgTimeoutOnClose),
}

pub fn timeout_packet_validate<Ctx>(
    ctx_a: &Ctx,
    module: &dyn Module,
    msg: &MsgTimeout,
) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    validate(ctx_a, msg)?;

    module.on_timeout_packet_validate(&msg.packet, &msg.signer)?;

    Ok(())
}

pub fn timeout_packet_execute<Ctx>(
    ctx_a: &mut Ctx,
    module: &mut dyn Module,
    msg: TimeoutMsgType,
) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    let (packet, signer) = match msg {
        TimeoutMsgType::Timeout(msg) => (msg.packet, msg.signer),
        TimeoutMsgType::TimeoutOnClose(msg) => (msg.packet, msg.signer),
    };

    let commitment_path_on_a =
        CommitmentPath::new(&packet.port_id_on_a, &packet.chan_id_on_a, packet.seq_on_a);

    // Commitment already cleared: acknowledged or timed out previously.
    if ctx_a.get_packet_commitment(&commitment_path_on_a)?.is_none() {
        ctx_a.log_message(format!(
            "success: timeout_packet: packet {} already handled, no-op",
            packet.seq_on_a
        ))?;
        return Ok(vec![]);
    }

    let chan_end_path_on_a = ChannelEndPath::new(&packet.port_id_on_a, &packet.chan_id_on_a);
    let mut chan_end_on_a = ctx_a.channel_end(&chan_end_path_on_a)?;

    let (extras, cb_result) = module.on_timeout_packet_execute(&packet, &signer);
    cb_result?;

    ctx_a.delete_packet_commitment(&commitment_path_on_a)?;

    // A timeout breaks the exactly-in-order guarantee of an ordered
    // channel; the channel cannot outlive it.
    let channel_closed_event = if chan_end_on_a.order_matches(&Order::Ordered) {
        chan_end_on_a.set_state(State::Closed);
        ctx_a.store_channel(&chan_end_path_on_a, chan_end_on_a.clone())?;

        Some(IbcEvent::ChannelClosed(ChannelClosed {
            port_id: packet.port_id_on_a.clone(),
            channel_id: packet.chan_id_on_a.clone(),
            port_id_on_b: chan_end_on_a.counterparty().port_id.clone(),
            channel_id_on_b: chan_end_on_a.counterparty().channel_id.clone(),
            conn_id: chan_end_on_a.connection_id().clone(),
            channel_ordering: *chan_end_on_a.ordering(),
        }))
    } else {
        None
    };

    ctx_a.log_message(format!(
        "success: timeout_packet: sequence {} on {}/{}",
        packet.seq_on_a, packet.port_id_on_a, packet.chan_id_on_a
    ))?;
    for log in extras.log {
        ctx_a.log_message(log)?;
    }

    let mut events = vec![IbcEvent::TimeoutPacket(TimeoutPacket {
        packet,
        channel_ordering: *chan_end_on_a.ordering(),
    })];
    events.extend(channel_closed_event);
    events.extend(extras.events.into_iter().map(IbcEvent::Module));

    Ok(events)
}

fn validate<Ctx>(ctx_a: &Ctx, msg: &MsgTimeout) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    let chan_end_path_on_a = ChannelEndPath::new(&msg.packet.port_id_on_a, &msg.packet.chan_id_on_a);
    let chan_end_on_a = ctx_a.channel_end(&chan_end_path_on_a)?;

    // The local end stays open while a timeout is pending; only the
    // counterparty's state matters for the proof.
    chan_end_on_a.verify_state_matches(&State::Open)?;

    let counterparty = Counterparty::new(
        msg.packet.port_id_on_b.clone(),
        Some(msg.packet.chan_id_on_b.clone()),
    );
    chan_end_on_a.verify_counterparty_matches(&counterparty)?;

    let conn_end_on_a = ctx_a.connection_end(chan_end_on_a.connection_id())?;

    let commitment_path_on_a = CommitmentPath::new(
        &msg.packet.port_id_on_a,
        &msg.packet.chan_id_on_a,
        msg.packet.seq_on_a,
    );

    // No commitment: already acknowledged or timed out; no-op in execution.
    let Some(commitment_on_a) = ctx_a.get_packet_commitment(&commitment_path_on_a)? else {
        return Ok(());
    };

    if commitment_on_a
        != compute_packet_commitment(
            &msg.packet.data,
            &msg.packet.timeout_height_on_b,
            &msg.packet.timeout_timestamp_on_b,
        )
    {
        return Err(PacketError::IncorrectPacketCommitment {
            sequence: msg.packet.seq_on_a,
        }
        .into());
    }

    let client_id_on_a = conn_end_on_a.client_id();
    let client_val_ctx_a = ctx_a.get_client_validation_context();
    let client_state_of_b_on_a = client_val_ctx_a.client_state(client_id_on_a)?;

    client_state_of_b_on_a
        .status(client_val_ctx_a, client_id_on_a)?
        .verify_is_active()?;
    client_state_of_b_on_a.validate_proof_height(msg.proof_height_on_b)?;

    let client_cons_state_path_on_a = ClientConsensusStatePath::new(
        client_id_on_a.clone(),
        msg.proof_height_on_b.revision_number(),
        msg.proof_height_on_b.revision_height(),
    );
    let consensus_state_of_b_on_a = client_val_ctx_a.consensus_state(&client_cons_state_path_on_a)?;

    // The timeout must have elapsed on chain B as of the proof height.
    let timestamp_of_b = consensus_state_of_b_on_a.timestamp();
    if !msg.packet.timed_out(&timestamp_of_b, msg.proof_height_on_b) {
        return Err(PacketError::PacketTimeoutNotReached {
            timeout_height: msg.packet.timeout_height_on_b,
            timeout_timestamp: msg.packet.timeout_timestamp_on_b,
        }
        .into());
    }

    verify_conn_delay_passed(ctx_a, msg.proof_height_on_b, &conn_end_on_a)?;

    verify_unreceived_on_b(
        &msg.packet,
        &chan_end_on_a,
        &conn_end_on_a,
        &client_state_of_b_on_a,
        consensus_state_of_b_on_a.root(),
        msg.next_seq_recv_on_b,
        &msg.proof_unreceived_on_b,
    )
}

/// Proof that chain B never received the packet: on an ordered channel, a
/// membership proof that B's next receive sequence is still at or below
/// the packet's; on an unordered channel, a non-membership proof of the
/// packet's receipt.
pub(super) fn verify_unreceived_on_b<CS>(
    packet: &Packet,
    chan_end_on_a: &ChannelEnd,
    conn_end_on_a: &ConnectionEnd,
    client_state_of_b_on_a: &CS,
    root_on_b: &CommitmentRoot,
    next_seq_recv_on_b: Sequence,
    proof_unreceived_on_b: &CommitmentProofBytes,
) -> Result<(), ProtocolError>
where
    CS: ClientStateCommon,
{
    match chan_end_on_a.ordering() {
        Order::Ordered => {
            if next_seq_recv_on_b > packet.seq_on_a {
                return Err(PacketError::InvalidPacketSequence {
                    given_sequence: packet.seq_on_a,
                    next_sequence: next_seq_recv_on_b,
                }
                .into());
            }

            let seq_recv_path_on_b = SeqRecvPath::new(&packet.port_id_on_b, &packet.chan_id_on_b);

            client_state_of_b_on_a.verify_membership(
                conn_end_on_a.counterparty().prefix(),
                proof_unreceived_on_b,
                root_on_b,
                Path::SeqRecv(seq_recv_path_on_b),
                next_seq_recv_on_b.to_vec(),
            )
        }
        Order::Unordered => {
            let receipt_path_on_b =
                ReceiptPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);

            client_state_of_b_on_a.verify_non_membership(
                conn_end_on_a.counterparty().prefix(),
                proof_unreceived_on_b,
                root_on_b,
                Path::Receipt(receipt_path_on_b),
            )
        }
    }
    .map_err(|client_error| {
        PacketError::PacketVerificationFailed {
            sequence: packet.seq_on_a,
            client_error,
        }
        .into()
    })
}

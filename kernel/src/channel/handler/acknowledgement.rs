//! Protocol logic for `MsgAcknowledgement`.

use crate::channel::commitment::{compute_ack_commitment, compute_packet_commitment};
use crate::channel::error::{ChannelError, PacketError};
use crate::channel::events::AcknowledgePacket;
use crate::channel::msgs::MsgAcknowledgement;
use crate::channel::{Counterparty, Order, State};
use crate::client::context::ClientValidationContext;
use crate::client::{ClientStateCommon, ClientStateValidation, ConsensusState};
use crate::connection::delay::verify_conn_delay_passed;
use crate::connection::State as ConnectionState;
use crate::error::ProtocolError;
use crate::events::IbcEvent;
use crate::host::path::{
    AckPath, ChannelEndPath, ClientConsensusStatePath, CommitmentPath, Path, SeqAckPath,
};
use crate::host::{ExecutionContext, ValidationContext};
use crate::prelude::*;
use crate::router::Module;

pub fn acknowledgement_packet_validate<Ctx>(
    ctx_a: &Ctx,
    module: &dyn Module,
    msg: &MsgAcknowledgement,
) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    validate(ctx_a, msg)?;

    module.on_acknowledgement_packet_validate(&msg.packet, &msg.acknowledgement, &msg.signer)?;

    Ok(())
}

pub fn acknowledgement_packet_execute<Ctx>(
    ctx_a: &mut Ctx,
    module: &mut dyn Module,
    msg: MsgAcknowledgement,
) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    let commitment_path_on_a = CommitmentPath::new(
        &msg.packet.port_id_on_a,
        &msg.packet.chan_id_on_a,
        msg.packet.seq_on_a,
    );

    // Commitment already cleared: acknowledged or timed out previously.
    if ctx_a.get_packet_commitment(&commitment_path_on_a)?.is_none() {
        ctx_a.log_message(format!(
            "success: acknowledgement: packet {} already handled, no-op",
            msg.packet.seq_on_a
        ))?;
        return Ok(vec![]);
    }

    let chan_end_path_on_a = ChannelEndPath::new(&msg.packet.port_id_on_a, &msg.packet.chan_id_on_a);
    let chan_end_on_a = ctx_a.channel_end(&chan_end_path_on_a)?;

    let (extras, cb_result) =
        module.on_acknowledgement_packet_execute(&msg.packet, &msg.acknowledgement, &msg.signer);
    cb_result?;

    ctx_a.delete_packet_commitment(&commitment_path_on_a)?;

    if chan_end_on_a.order_matches(&Order::Ordered) {
        let seq_ack_path_on_a = SeqAckPath::new(&msg.packet.port_id_on_a, &msg.packet.chan_id_on_a);
        let bumped_seq = msg
            .packet
            .seq_on_a
            .increment()
            .ok_or(PacketError::SequenceOverflow)?;
        ctx_a.store_next_sequence_ack(&seq_ack_path_on_a, bumped_seq)?;
    }

    ctx_a.log_message(format!(
        "success: acknowledgement: sequence {} on {}/{}",
        msg.packet.seq_on_a, msg.packet.port_id_on_a, msg.packet.chan_id_on_a
    ))?;
    for log in extras.log {
        ctx_a.log_message(log)?;
    }

    let channel_ordering = *chan_end_on_a.ordering();

    let mut events = vec![IbcEvent::AcknowledgePacket(AcknowledgePacket {
        packet: msg.packet,
        channel_ordering,
    })];
    events.extend(extras.events.into_iter().map(IbcEvent::Module));

    Ok(events)
}

fn validate<Ctx>(ctx_a: &Ctx, msg: &MsgAcknowledgement) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    let chan_end_path_on_a = ChannelEndPath::new(&msg.packet.port_id_on_a, &msg.packet.chan_id_on_a);
    let chan_end_on_a = ctx_a.channel_end(&chan_end_path_on_a)?;

    chan_end_on_a.verify_state_matches(&State::Open)?;

    let counterparty = Counterparty::new(
        msg.packet.port_id_on_b.clone(),
        Some(msg.packet.chan_id_on_b.clone()),
    );
    chan_end_on_a.verify_counterparty_matches(&counterparty)?;

    let conn_end_on_a = ctx_a.connection_end(chan_end_on_a.connection_id())?;

    conn_end_on_a
        .verify_state_matches(&ConnectionState::Open)
        .map_err(|_| ChannelError::ConnectionNotOpen {
            connection_id: chan_end_on_a.connection_id().clone(),
        })?;

    let commitment_path_on_a = CommitmentPath::new(
        &msg.packet.port_id_on_a,
        &msg.packet.chan_id_on_a,
        msg.packet.seq_on_a,
    );

    // No commitment: the packet was already acknowledged or timed out.
    // Validation succeeds so the replay resolves as a no-op in execution.
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

    if chan_end_on_a.order_matches(&Order::Ordered) {
        let seq_ack_path_on_a = SeqAckPath::new(&msg.packet.port_id_on_a, &msg.packet.chan_id_on_a);
        let next_seq_ack = ctx_a.get_next_sequence_ack(&seq_ack_path_on_a)?;

        if msg.packet.seq_on_a != next_seq_ack {
            return Err(PacketError::InvalidPacketSequence {
                given_sequence: msg.packet.seq_on_a,
                next_sequence: next_seq_ack,
            }
            .into());
        }
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

    verify_conn_delay_passed(ctx_a, msg.proof_height_on_b, &conn_end_on_a)?;

    let ack_path_on_b = AckPath::new(
        &msg.packet.port_id_on_b,
        &msg.packet.chan_id_on_b,
        msg.packet.seq_on_a,
    );

    client_state_of_b_on_a
        .verify_membership(
            conn_end_on_a.counterparty().prefix(),
            &msg.proof_acked_on_b,
            consensus_state_of_b_on_a.root(),
            Path::Ack(ack_path_on_b),
            compute_ack_commitment(&msg.acknowledgement).into_vec(),
        )
        .map_err(|client_error| PacketError::PacketVerificationFailed {
            sequence: msg.packet.seq_on_a,
            client_error,
        })?;

    Ok(())
}

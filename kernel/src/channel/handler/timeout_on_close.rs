//! Protocol logic for `MsgTimeoutOnClose`.
//!
//! Releases a packet whose destination channel closed before delivery.
//! The timeout bounds themselves are not consulted: the closed channel is
//! the reason the packet can never be received.

use crate::channel::commitment::compute_packet_commitment;
use crate::channel::error::{ChannelError, PacketError};
use crate::channel::handler::timeout::verify_unreceived_on_b;
use crate::channel::msgs::MsgTimeoutOnClose;
use crate::channel::{ChannelEnd, Counterparty, State};
use crate::client::context::ClientValidationContext;
use crate::client::{ClientStateCommon, ClientStateValidation, ConsensusState};
use crate::connection::delay::verify_conn_delay_passed;
use crate::connection::error::ConnectionError;
use crate::error::ProtocolError;
use crate::host::path::{ChannelEndPath, ClientConsensusStatePath, CommitmentPath, Path};
use crate::host::ValidationContext;
use crate::prelude::*;
use crate::router::Module;

pub fn timeout_on_close_packet_validate<Ctx>(
    ctx_a: &Ctx,
    module: &dyn Module,
    msg: &MsgTimeoutOnClose,
) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    validate(ctx_a, msg)?;

    module.on_timeout_packet_validate(&msg.packet, &msg.signer)?;

    Ok(())
}

fn validate<Ctx>(ctx_a: &Ctx, msg: &MsgTimeoutOnClose) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    let chan_end_path_on_a = ChannelEndPath::new(&msg.packet.port_id_on_a, &msg.packet.chan_id_on_a);
    let chan_end_on_a = ctx_a.channel_end(&chan_end_path_on_a)?;

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

    // First prove the counterparty end is CLOSED; only then does the
    // unreceived proof release the packet.
    {
        let chan_id_on_b = chan_end_on_a
            .counterparty()
            .channel_id()
            .ok_or(ChannelError::MissingCounterpartyChannelId)?;

        let conn_id_on_b = conn_end_on_a
            .counterparty()
            .connection_id()
            .ok_or(ConnectionError::MissingCounterpartyConnectionId)?;

        let expected_chan_end_on_b = ChannelEnd::new(
            State::Closed,
            *chan_end_on_a.ordering(),
            Counterparty::new(
                msg.packet.port_id_on_a.clone(),
                Some(msg.packet.chan_id_on_a.clone()),
            ),
            vec![conn_id_on_b.clone()],
            chan_end_on_a.version().clone(),
        )?;

        client_state_of_b_on_a
            .verify_membership(
                conn_end_on_a.counterparty().prefix(),
                &msg.proof_close_on_b,
                consensus_state_of_b_on_a.root(),
                Path::ChannelEnd(ChannelEndPath::new(&msg.packet.port_id_on_b, chan_id_on_b)),
                expected_chan_end_on_b.encode_vec(),
            )
            .map_err(ChannelError::VerifyChannelFailed)?;
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

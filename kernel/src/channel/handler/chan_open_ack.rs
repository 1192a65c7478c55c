//! Protocol logic for `MsgChannelOpenAck`.

use crate::channel::error::ChannelError;
use crate::channel::events::OpenAck;
use crate::channel::msgs::MsgChannelOpenAck;
use crate::channel::{ChannelEnd, Counterparty, State};
use crate::client::context::ClientValidationContext;
use crate::client::{ClientStateCommon, ClientStateValidation, ConsensusState};
use crate::connection::error::ConnectionError;
use crate::connection::State as ConnectionState;
use crate::error::ProtocolError;
use crate::events::IbcEvent;
use crate::host::path::{ChannelEndPath, ClientConsensusStatePath, Path};
use crate::host::{ExecutionContext, ValidationContext};
use crate::prelude::*;
use crate::router::Module;

pub fn chan_open_ack_validate<Ctx>(
    ctx_a: &Ctx,
    module: &dyn Module,
    msg: &MsgChannelOpenAck,
) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    validate(ctx_a, msg)?;

    module.on_chan_open_ack_validate(&msg.port_id_on_a, &msg.chan_id_on_a, &msg.version_on_b)?;

    Ok(())
}

pub fn chan_open_ack_execute<Ctx>(
    ctx_a: &mut Ctx,
    module: &mut dyn Module,
    msg: MsgChannelOpenAck,
) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    let extras =
        module.on_chan_open_ack_execute(&msg.port_id_on_a, &msg.chan_id_on_a, &msg.version_on_b)?;

    let chan_end_path_on_a = ChannelEndPath::new(&msg.port_id_on_a, &msg.chan_id_on_a);
    let mut chan_end_on_a = ctx_a.channel_end(&chan_end_path_on_a)?;

    chan_end_on_a.set_state(State::Open);
    chan_end_on_a.set_version(msg.version_on_b.clone());
    chan_end_on_a.set_counterparty_channel_id(msg.chan_id_on_b.clone());

    let port_id_on_b = chan_end_on_a.counterparty().port_id.clone();
    let conn_id_on_a = chan_end_on_a.connection_id().clone();

    ctx_a.store_channel(&chan_end_path_on_a, chan_end_on_a)?;

    ctx_a.log_message("success: chan_open_ack verification passed".to_string())?;
    for log in extras.log {
        ctx_a.log_message(log)?;
    }

    let mut events = vec![IbcEvent::OpenAckChannel(OpenAck {
        port_id_on_a: msg.port_id_on_a,
        chan_id_on_a: msg.chan_id_on_a,
        port_id_on_b,
        chan_id_on_b: msg.chan_id_on_b,
        conn_id_on_a,
    })];
    events.extend(extras.events.into_iter().map(IbcEvent::Module));

    Ok(events)
}

fn validate<Ctx>(ctx_a: &Ctx, msg: &MsgChannelOpenAck) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    let chan_end_path_on_a = ChannelEndPath::new(&msg.port_id_on_a, &msg.chan_id_on_a);
    let chan_end_on_a = ctx_a.channel_end(&chan_end_path_on_a)?;

    // Ack is only accepted on the end that initiated the handshake.
    chan_end_on_a.verify_state_matches(&State::Init)?;

    let conn_end_on_a = ctx_a.connection_end(chan_end_on_a.connection_id())?;

    conn_end_on_a
        .verify_state_matches(&ConnectionState::Open)
        .map_err(|_| ChannelError::ConnectionNotOpen {
            connection_id: chan_end_on_a.connection_id().clone(),
        })?;

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

    let prefix_on_b = conn_end_on_a.counterparty().prefix();
    let port_id_on_b = &chan_end_on_a.counterparty().port_id;

    let conn_id_on_b = conn_end_on_a
        .counterparty()
        .connection_id()
        .ok_or(ConnectionError::MissingCounterpartyConnectionId)?;

    let expected_chan_end_on_b = ChannelEnd::new(
        State::TryOpen,
        *chan_end_on_a.ordering(),
        Counterparty::new(msg.port_id_on_a.clone(), Some(msg.chan_id_on_a.clone())),
        vec![conn_id_on_b.clone()],
        msg.version_on_b.clone(),
    )?;

    client_state_of_b_on_a
        .verify_membership(
            prefix_on_b,
            &msg.proof_chan_end_on_b,
            consensus_state_of_b_on_a.root(),
            Path::ChannelEnd(ChannelEndPath::new(port_id_on_b, &msg.chan_id_on_b)),
            expected_chan_end_on_b.encode_vec(),
        )
        .map_err(ChannelError::VerifyChannelFailed)?;

    Ok(())
}

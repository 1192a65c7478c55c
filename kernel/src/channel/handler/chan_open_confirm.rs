//! Protocol logic for `MsgChannelOpenConfirm`.

use crate::channel::error::ChannelError;
use crate::channel::events::OpenConfirm;
use crate::channel::msgs::MsgChannelOpenConfirm;
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

pub fn chan_open_confirm_validate<Ctx>(
    ctx_b: &Ctx,
    module: &dyn Module,
    msg: &MsgChannelOpenConfirm,
) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    validate(ctx_b, msg)?;

    module.on_chan_open_confirm_validate(&msg.port_id_on_b, &msg.chan_id_on_b)?;

    Ok(())
}

pub fn chan_open_confirm_execute<Ctx>(
    ctx_b: &mut Ctx,
    module: &mut dyn Module,
    msg: MsgChannelOpenConfirm,
) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    let extras = module.on_chan_open_confirm_execute(&msg.port_id_on_b, &msg.chan_id_on_b)?;

    let chan_end_path_on_b = ChannelEndPath::new(&msg.port_id_on_b, &msg.chan_id_on_b);
    let mut chan_end_on_b = ctx_b.channel_end(&chan_end_path_on_b)?;

    chan_end_on_b.set_state(State::Open);

    let port_id_on_a = chan_end_on_b.counterparty().port_id.clone();
    let chan_id_on_a = chan_end_on_b
        .counterparty()
        .channel_id()
        .ok_or(ChannelError::MissingCounterpartyChannelId)?
        .clone();
    let conn_id_on_b = chan_end_on_b.connection_id().clone();

    ctx_b.store_channel(&chan_end_path_on_b, chan_end_on_b)?;

    ctx_b.log_message("success: chan_open_confirm verification passed".to_string())?;
    for log in extras.log {
        ctx_b.log_message(log)?;
    }

    let mut events = vec![IbcEvent::OpenConfirmChannel(OpenConfirm {
        port_id_on_b: msg.port_id_on_b,
        chan_id_on_b: msg.chan_id_on_b,
        port_id_on_a,
        chan_id_on_a,
        conn_id_on_b,
    })];
    events.extend(extras.events.into_iter().map(IbcEvent::Module));

    Ok(events)
}

fn validate<Ctx>(ctx_b: &Ctx, msg: &MsgChannelOpenConfirm) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    ctx_b.validate_message_signer(&msg.signer)?;

    let chan_end_path_on_b = ChannelEndPath::new(&msg.port_id_on_b, &msg.chan_id_on_b);
    let chan_end_on_b = ctx_b.channel_end(&chan_end_path_on_b)?;

    chan_end_on_b.verify_state_matches(&State::TryOpen)?;

    let conn_end_on_b = ctx_b.connection_end(chan_end_on_b.connection_id())?;

    conn_end_on_b
        .verify_state_matches(&ConnectionState::Open)
        .map_err(|_| ChannelError::ConnectionNotOpen {
            connection_id: chan_end_on_b.connection_id().clone(),
        })?;

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

    let prefix_on_a = conn_end_on_b.counterparty().prefix();
    let port_id_on_a = &chan_end_on_b.counterparty().port_id;
    let chan_id_on_a = chan_end_on_b
        .counterparty()
        .channel_id()
        .ok_or(ChannelError::MissingCounterpartyChannelId)?;

    let conn_id_on_a = conn_end_on_b
        .counterparty()
        .connection_id()
        .ok_or(ConnectionError::MissingCounterpartyConnectionId)?;

    let expected_chan_end_on_a = ChannelEnd::new(
        State::Open,
        *chan_end_on_b.ordering(),
        Counterparty::new(msg.port_id_on_b.clone(), Some(msg.chan_id_on_b.clone())),
        vec![conn_id_on_a.clone()],
        chan_end_on_b.version().clone(),
    )?;

    client_state_of_a_on_b
        .verify_membership(
            prefix_on_a,
            &msg.proof_chan_end_on_a,
            consensus_state_of_a_on_b.root(),
            Path::ChannelEnd(ChannelEndPath::new(port_id_on_a, chan_id_on_a)),
            expected_chan_end_on_a.encode_vec(),
        )
        .map_err(ChannelError::VerifyChannelFailed)?;

    Ok(())
}

//! Protocol logic for `MsgChannelCloseInit`.

use crate::channel::error::ChannelError;
use crate::channel::events::CloseInit;
use crate::channel::msgs::MsgChannelCloseInit;
use crate::channel::State;
use crate::client::context::ClientValidationContext;
use crate::client::ClientStateValidation;
use crate::connection::State as ConnectionState;
use crate::error::ProtocolError;
use crate::events::IbcEvent;
use crate::host::path::ChannelEndPath;
use crate::host::{ExecutionContext, ValidationContext};
use crate::prelude::*;
use crate::router::Module;

pub fn chan_close_init_validate<Ctx>(
    ctx_a: &Ctx,
    module: &dyn Module,
    msg: &MsgChannelCloseInit,
) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    validate(ctx_a, msg)?;

    module.on_chan_close_init_validate(&msg.port_id_on_a, &msg.chan_id_on_a)?;

    Ok(())
}

pub fn chan_close_init_execute<Ctx>(
    ctx_a: &mut Ctx,
    module: &mut dyn Module,
    msg: MsgChannelCloseInit,
) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    let extras = module.on_chan_close_init_execute(&msg.port_id_on_a, &msg.chan_id_on_a)?;

    let chan_end_path_on_a = ChannelEndPath::new(&msg.port_id_on_a, &msg.chan_id_on_a);
    let mut chan_end_on_a = ctx_a.channel_end(&chan_end_path_on_a)?;

    chan_end_on_a.set_state(State::Closed);

    let port_id_on_b = chan_end_on_a.counterparty().port_id.clone();
    let chan_id_on_b = chan_end_on_a
        .counterparty()
        .channel_id()
        .ok_or(ChannelError::MissingCounterpartyChannelId)?
        .clone();
    let conn_id_on_a = chan_end_on_a.connection_id().clone();

    ctx_a.store_channel(&chan_end_path_on_a, chan_end_on_a)?;

    ctx_a.log_message("success: chan_close_init verification passed".to_string())?;
    for log in extras.log {
        ctx_a.log_message(log)?;
    }

    let mut events = vec![IbcEvent::CloseInitChannel(CloseInit {
        port_id_on_a: msg.port_id_on_a,
        chan_id_on_a: msg.chan_id_on_a,
        port_id_on_b,
        chan_id_on_b,
        conn_id_on_a,
    })];
    events.extend(extras.events.into_iter().map(IbcEvent::Module));

    Ok(events)
}

fn validate<Ctx>(ctx_a: &Ctx, msg: &MsgChannelCloseInit) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    // Closure is reserved to the application holding the channel's
    // capability.
    ctx_a.authenticate_channel_capability(&msg.port_id_on_a, &msg.chan_id_on_a, &msg.capability)?;

    let chan_end_path_on_a = ChannelEndPath::new(&msg.port_id_on_a, &msg.chan_id_on_a);
    let chan_end_on_a = ctx_a.channel_end(&chan_end_path_on_a)?;

    chan_end_on_a.verify_not_closed()?;

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

    Ok(())
}

//! Protocol logic for `MsgChannelOpenInit`.

use crate::channel::error::ChannelError;
use crate::channel::events::OpenInit;
use crate::channel::msgs::MsgChannelOpenInit;
use crate::channel::{ChannelEnd, Counterparty, State};
use crate::client::context::ClientValidationContext;
use crate::client::ClientStateValidation;
use crate::error::ProtocolError;
use crate::events::IbcEvent;
use crate::host::identifiers::{ChannelId, Sequence};
use crate::host::path::{ChannelEndPath, SeqAckPath, SeqRecvPath, SeqSendPath};
use crate::host::{ExecutionContext, ValidationContext};
use crate::prelude::*;
use crate::router::Module;

pub fn chan_open_init_validate<Ctx>(
    ctx_a: &Ctx,
    module: &dyn Module,
    msg: &MsgChannelOpenInit,
) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    validate(ctx_a, msg)?;

    // The channel identifier the channel will get, for the callback only;
    // nothing is stored under it until execution.
    let chan_id_on_a = ChannelId::new(ctx_a.channel_counter()?);

    module.on_chan_open_init_validate(
        msg.ordering,
        &msg.connection_hops_on_a,
        &msg.port_id_on_a,
        &chan_id_on_a,
        &Counterparty::new(msg.port_id_on_b.clone(), None),
        &msg.version_proposal,
    )?;

    Ok(())
}

pub fn chan_open_init_execute<Ctx>(
    ctx_a: &mut Ctx,
    module: &mut dyn Module,
    msg: MsgChannelOpenInit,
) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    let chan_id_on_a = ChannelId::new(ctx_a.channel_counter()?);

    let (extras, version) = module.on_chan_open_init_execute(
        msg.ordering,
        &msg.connection_hops_on_a,
        &msg.port_id_on_a,
        &chan_id_on_a,
        &Counterparty::new(msg.port_id_on_b.clone(), None),
        &msg.version_proposal,
    )?;

    let conn_id_on_a = msg.connection_hops_on_a[0].clone();

    let chan_end_on_a = ChannelEnd::new(
        State::Init,
        msg.ordering,
        Counterparty::new(msg.port_id_on_b.clone(), None),
        msg.connection_hops_on_a.clone(),
        version.clone(),
    )?;

    let chan_end_path_on_a = ChannelEndPath::new(&msg.port_id_on_a, &chan_id_on_a);

    ctx_a.store_channel(&chan_end_path_on_a, chan_end_on_a)?;
    ctx_a.store_next_sequence_send(
        &SeqSendPath::new(&msg.port_id_on_a, &chan_id_on_a),
        Sequence::from(1),
    )?;
    ctx_a.store_next_sequence_recv(
        &SeqRecvPath::new(&msg.port_id_on_a, &chan_id_on_a),
        Sequence::from(1),
    )?;
    ctx_a.store_next_sequence_ack(
        &SeqAckPath::new(&msg.port_id_on_a, &chan_id_on_a),
        Sequence::from(1),
    )?;
    ctx_a.increase_channel_counter()?;
    ctx_a.create_channel_capability(msg.port_id_on_a.clone(), chan_id_on_a.clone())?;

    ctx_a.log_message(format!(
        "success: chan_open_init: generated new channel identifier: {chan_id_on_a}"
    ))?;
    for log in extras.log {
        ctx_a.log_message(log)?;
    }

    let mut events = vec![IbcEvent::OpenInitChannel(OpenInit {
        port_id_on_a: msg.port_id_on_a,
        chan_id_on_a,
        port_id_on_b: msg.port_id_on_b,
        conn_id_on_a,
        version_on_a: version,
    })];
    events.extend(extras.events.into_iter().map(IbcEvent::Module));

    Ok(events)
}

fn validate<Ctx>(ctx_a: &Ctx, msg: &MsgChannelOpenInit) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    if msg.connection_hops_on_a.len() != 1 {
        return Err(ChannelError::InvalidConnectionHopsLength {
            actual: msg.connection_hops_on_a.len(),
        }
        .into());
    }

    // The underlying connection must exist and end up open before packets
    // flow, but the handshake may start over an INIT connection; only the
    // ordering feature is checked here.
    let conn_end_on_a = ctx_a.connection_end(&msg.connection_hops_on_a[0])?;

    let conn_version = &conn_end_on_a.versions()[0];
    if !conn_version.is_supported_feature(msg.ordering.as_str()) {
        return Err(ChannelError::UnsupportedOrdering {
            ordering: msg.ordering,
        }
        .into());
    }

    let client_id_on_a = conn_end_on_a.client_id();
    let client_val_ctx_a = ctx_a.get_client_validation_context();
    let client_state_of_b_on_a = client_val_ctx_a.client_state(client_id_on_a)?;

    client_state_of_b_on_a
        .status(client_val_ctx_a, client_id_on_a)?
        .verify_is_active()?;

    Ok(())
}

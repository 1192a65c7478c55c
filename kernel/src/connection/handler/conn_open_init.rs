//! Protocol logic for `MsgConnectionOpenInit`.

use crate::client::context::ClientValidationContext;
use crate::client::ClientStateValidation;
use crate::connection::events::OpenInit;
use crate::connection::msgs::MsgConnectionOpenInit;
use crate::connection::{ConnectionEnd, Counterparty, State};
use crate::error::ProtocolError;
use crate::events::IbcEvent;
use crate::host::identifiers::ConnectionId;
use crate::host::path::ConnectionPath;
use crate::host::{ExecutionContext, ValidationContext};
use crate::prelude::*;

pub fn validate<Ctx>(ctx_a: &Ctx, msg: &MsgConnectionOpenInit) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    // The client that will verify the counterparty must exist and be active.
    let client_val_ctx_a = ctx_a.get_client_validation_context();
    let client_state_of_b_on_a = client_val_ctx_a.client_state(&msg.client_id_on_a)?;

    client_state_of_b_on_a
        .status(client_val_ctx_a, &msg.client_id_on_a)?
        .verify_is_active()?;

    if let Some(version) = &msg.version {
        version.verify_is_supported(&ctx_a.get_compatible_versions())?;
    }

    Ok(())
}

pub fn execute<Ctx>(
    ctx_a: &mut Ctx,
    msg: MsgConnectionOpenInit,
) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    let versions = if let Some(version) = msg.version {
        vec![version]
    } else {
        ctx_a.get_compatible_versions()
    };

    let conn_end_on_a = ConnectionEnd::new(
        State::Init,
        msg.client_id_on_a.clone(),
        Counterparty::new(
            msg.counterparty.client_id().clone(),
            None,
            msg.counterparty.prefix().clone(),
        ),
        versions,
        msg.delay_period,
    )?;

    let conn_id_on_a = ConnectionId::new(ctx_a.connection_counter()?);

    ctx_a.increase_connection_counter()?;
    ctx_a.store_connection(&ConnectionPath::new(&conn_id_on_a), conn_end_on_a)?;

    ctx_a.log_message(format!(
        "success: conn_open_init: generated new connection identifier: {conn_id_on_a}"
    ))?;

    let client_id_on_b = msg.counterparty.client_id().clone();

    Ok(vec![IbcEvent::OpenInitConnection(OpenInit::new(
        conn_id_on_a,
        msg.client_id_on_a,
        client_id_on_b,
    ))])
}

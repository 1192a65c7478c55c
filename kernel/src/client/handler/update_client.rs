//! Protocol logic for `MsgUpdateClient`: header updates and misbehaviour
//! submission share one entrypoint; the concrete client tells them apart.

use crate::client::context::{ClientExecutionContext, ClientValidationContext};
use crate::client::events::{ClientMisbehaviour, UpdateClient};
use crate::client::msgs::MsgUpdateClient;
use crate::client::{ClientStateCommon, ClientStateExecution, ClientStateValidation};
use crate::error::ProtocolError;
use crate::events::IbcEvent;
use crate::host::{ExecutionContext, ValidationContext};
use crate::prelude::*;

pub fn validate<Ctx>(ctx: &Ctx, msg: &MsgUpdateClient) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    ctx.validate_message_signer(&msg.signer)?;

    let client_val_ctx = ctx.get_client_validation_context();
    let client_state = client_val_ctx.client_state(&msg.client_id)?;

    client_state
        .status(client_val_ctx, &msg.client_id)?
        .verify_is_active()?;

    client_state.verify_client_message(client_val_ctx, &msg.client_id, &msg.client_message)?;

    Ok(())
}

pub fn execute<Ctx>(ctx: &mut Ctx, msg: MsgUpdateClient) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    let client_exec_ctx = ctx.get_client_execution_context();
    let client_state = client_exec_ctx.client_state_mut(&msg.client_id)?;
    let client_type = client_state.client_type();

    let found_misbehaviour =
        client_state.check_for_misbehaviour(client_exec_ctx, &msg.client_id, &msg.client_message)?;

    if found_misbehaviour {
        client_state.update_state_on_misbehaviour(
            client_exec_ctx,
            &msg.client_id,
            &msg.client_message,
        )?;

        ctx.log_message(format!(
            "success: misbehaviour submitted for client {}",
            msg.client_id
        ))?;

        return Ok(vec![IbcEvent::ClientMisbehaviour(ClientMisbehaviour::new(
            msg.client_id,
            client_type,
        ))]);
    }

    let consensus_heights =
        client_state.update_state(client_exec_ctx, &msg.client_id, &msg.client_message)?;

    ctx.log_message(format!(
        "success: update client {} to heights {consensus_heights:?}",
        msg.client_id
    ))?;

    Ok(vec![IbcEvent::UpdateClient(UpdateClient::new(
        msg.client_id,
        client_type,
        consensus_heights,
    ))])
}

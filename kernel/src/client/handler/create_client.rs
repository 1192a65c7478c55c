//! Protocol logic for `MsgCreateClient`.

use crate::client::context::{ClientExecutionContext, ClientValidationContext};
use crate::client::events::CreateClient;
use crate::client::msgs::MsgCreateClient;
use crate::client::ClientStateCommon;
use crate::client::ClientStateExecution;
use crate::error::ProtocolError;
use crate::events::IbcEvent;
use crate::host::{ExecutionContext, ValidationContext};
use crate::prelude::*;

pub fn validate<Ctx>(ctx: &Ctx, msg: &MsgCreateClient) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    ctx.validate_message_signer(&msg.signer)?;

    // The concrete client decides whether the submitted state bytes are
    // well-formed; here we only require that they decode at all.
    ctx.get_client_validation_context()
        .decode_client_state(&msg.client_state)?;

    Ok(())
}

pub fn execute<Ctx>(ctx: &mut Ctx, msg: MsgCreateClient) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    let host_timestamp = ctx.host_timestamp()?;
    let host_height = ctx.host_height()?;
    let id_counter = ctx.client_counter()?;

    let client_exec_ctx = ctx.get_client_execution_context();
    let client_state = client_exec_ctx.decode_client_state(&msg.client_state)?;

    let client_type = client_state.client_type();
    let client_id = client_type.build_client_id(id_counter);
    let latest_height = client_state.latest_height();

    client_state.initialise(client_exec_ctx, &client_id, &msg.consensus_state)?;
    client_exec_ctx.store_update_meta(
        client_id.clone(),
        latest_height,
        host_timestamp,
        host_height,
    )?;

    ctx.increase_client_counter()?;

    ctx.log_message(format!(
        "success: create client with identifier {client_id}"
    ))?;

    Ok(vec![IbcEvent::CreateClient(CreateClient::new(
        client_id,
        client_type,
        latest_height,
    ))])
}

//! Protocol logic for `MsgConnectionOpenConfirm`.

use crate::client::context::ClientValidationContext;
use crate::client::{ClientStateCommon, ClientStateValidation, ConsensusState};
use crate::connection::error::ConnectionError;
use crate::connection::events::OpenConfirm;
use crate::connection::msgs::MsgConnectionOpenConfirm;
use crate::connection::{ConnectionEnd, Counterparty, State};
use crate::error::ProtocolError;
use crate::events::IbcEvent;
use crate::host::identifiers::{ClientId, ConnectionId};
use crate::host::path::{ClientConsensusStatePath, ConnectionPath, Path};
use crate::host::{ExecutionContext, ValidationContext};
use crate::prelude::*;

pub fn validate<Ctx>(ctx_b: &Ctx, msg: &MsgConnectionOpenConfirm) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    let vars = LocalVars::new(ctx_b, msg)?;

    ctx_b.validate_message_signer(&msg.signer)?;

    vars.conn_end_on_b.verify_state_matches(&State::TryOpen)?;

    let client_id_on_a = vars.client_id_on_a();
    let client_id_on_b = vars.client_id_on_b();
    let conn_id_on_a = vars.conn_id_on_a()?;

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

    let prefix_on_a = vars.conn_end_on_b.counterparty().prefix();
    let prefix_on_b = ctx_b.commitment_prefix();

    let expected_conn_end_on_a = ConnectionEnd::new(
        State::Open,
        client_id_on_a.clone(),
        Counterparty::new(
            client_id_on_b.clone(),
            Some(msg.conn_id_on_b.clone()),
            prefix_on_b,
        ),
        vars.conn_end_on_b.versions().to_vec(),
        vars.conn_end_on_b.delay_period(),
    )?;

    client_state_of_a_on_b
        .verify_membership(
            prefix_on_a,
            &msg.proof_conn_end_on_a,
            consensus_state_of_a_on_b.root(),
            Path::Connection(ConnectionPath::new(conn_id_on_a)),
            expected_conn_end_on_a.encode_vec(),
        )
        .map_err(ConnectionError::VerifyConnectionState)?;

    Ok(())
}

pub fn execute<Ctx>(
    ctx_b: &mut Ctx,
    msg: MsgConnectionOpenConfirm,
) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    let vars = LocalVars::new(ctx_b, &msg)?;

    let client_id_on_a = vars.client_id_on_a().clone();
    let client_id_on_b = vars.client_id_on_b().clone();
    let conn_id_on_a = vars.conn_id_on_a()?.clone();

    let new_conn_end_on_b = {
        let mut new_conn_end_on_b = vars.conn_end_on_b;
        new_conn_end_on_b.set_state(State::Open);
        new_conn_end_on_b
    };

    ctx_b.store_connection(&ConnectionPath::new(&msg.conn_id_on_b), new_conn_end_on_b)?;

    ctx_b.log_message("success: conn_open_confirm verification passed".to_string())?;

    Ok(vec![IbcEvent::OpenConfirmConnection(OpenConfirm::new(
        msg.conn_id_on_b,
        client_id_on_b,
        conn_id_on_a,
        client_id_on_a,
    ))])
}

struct LocalVars {
    conn_end_on_b: ConnectionEnd,
}

impl LocalVars {
    fn new<Ctx>(ctx_b: &Ctx, msg: &MsgConnectionOpenConfirm) -> Result<Self, ProtocolError>
    where
        Ctx: ValidationContext,
    {
        Ok(Self {
            conn_end_on_b: ctx_b.connection_end(&msg.conn_id_on_b)?,
        })
    }

    fn client_id_on_a(&self) -> &ClientId {
        self.conn_end_on_b.counterparty().client_id()
    }

    fn client_id_on_b(&self) -> &ClientId {
        self.conn_end_on_b.client_id()
    }

    fn conn_id_on_a(&self) -> Result<&ConnectionId, ConnectionError> {
        self.conn_end_on_b
            .counterparty()
            .connection_id()
            .ok_or(ConnectionError::MissingCounterpartyConnectionId)
    }
}

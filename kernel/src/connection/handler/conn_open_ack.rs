//! Protocol logic for `MsgConnectionOpenAck`.

use crate::client::context::ClientValidationContext;
use crate::client::{ClientStateCommon, ClientStateValidation, ConsensusState};
use crate::connection::error::ConnectionError;
use crate::connection::events::OpenAck;
use crate::connection::msgs::MsgConnectionOpenAck;
use crate::connection::{ConnectionEnd, Counterparty, State};
use crate::error::ProtocolError;
use crate::events::IbcEvent;
use crate::host::identifiers::ClientId;
use crate::host::path::{ClientConsensusStatePath, ClientStatePath, ConnectionPath, Path};
use crate::host::{ExecutionContext, ValidationContext};
use crate::prelude::*;

pub fn validate<Ctx>(ctx_a: &Ctx, msg: &MsgConnectionOpenAck) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    let vars = LocalVars::new(ctx_a, msg)?;

    ctx_a.validate_message_signer(&msg.signer)?;

    let host_height = ctx_a.host_height()?;
    if msg.consensus_height_of_a_on_b > host_height {
        return Err(ConnectionError::InvalidConsensusHeight {
            target_height: msg.consensus_height_of_a_on_b,
            current_height: host_height,
        }
        .into());
    }

    ctx_a.validate_self_client(&msg.client_state_of_a_on_b)?;

    // B must have selected one of the versions this end proposed.
    msg.version.verify_is_supported(vars.conn_end_on_a.versions())?;

    vars.conn_end_on_a.verify_state_matches(&State::Init)?;

    let client_val_ctx_a = ctx_a.get_client_validation_context();
    let client_state_of_b_on_a = client_val_ctx_a.client_state(vars.client_id_on_a())?;

    client_state_of_b_on_a
        .status(client_val_ctx_a, vars.client_id_on_a())?
        .verify_is_active()?;
    client_state_of_b_on_a.validate_proof_height(msg.proofs_height_on_b)?;

    let client_cons_state_path_on_a = ClientConsensusStatePath::new(
        vars.client_id_on_a().clone(),
        msg.proofs_height_on_b.revision_number(),
        msg.proofs_height_on_b.revision_height(),
    );
    let consensus_state_of_b_on_a = client_val_ctx_a.consensus_state(&client_cons_state_path_on_a)?;

    let prefix_on_a = ctx_a.commitment_prefix();
    let prefix_on_b = vars.conn_end_on_a.counterparty().prefix();

    {
        // The only acceptable counterparty record is TRYOPEN naming this
        // very connection end; crossing hellos resolve through it.
        let expected_conn_end_on_b = ConnectionEnd::new(
            State::TryOpen,
            vars.client_id_on_b().clone(),
            Counterparty::new(
                vars.client_id_on_a().clone(),
                Some(msg.conn_id_on_a.clone()),
                prefix_on_a,
            ),
            vec![msg.version.clone()],
            vars.conn_end_on_a.delay_period(),
        )?;

        client_state_of_b_on_a
            .verify_membership(
                prefix_on_b,
                &msg.proof_conn_end_on_b,
                consensus_state_of_b_on_a.root(),
                Path::Connection(ConnectionPath::new(&msg.conn_id_on_b)),
                expected_conn_end_on_b.encode_vec(),
            )
            .map_err(ConnectionError::VerifyConnectionState)?;
    }

    client_state_of_b_on_a
        .verify_membership(
            prefix_on_b,
            &msg.proof_client_state_of_a_on_b,
            consensus_state_of_b_on_a.root(),
            Path::ClientState(ClientStatePath::new(vars.client_id_on_b().clone())),
            msg.client_state_of_a_on_b.clone(),
        )
        .map_err(|client_error| ConnectionError::ClientStateVerificationFailure { client_error })?;

    let expected_consensus_state_of_a_on_b =
        ctx_a.host_consensus_state(&msg.consensus_height_of_a_on_b)?;

    let client_cons_state_path_on_b = ClientConsensusStatePath::new(
        vars.client_id_on_b().clone(),
        msg.consensus_height_of_a_on_b.revision_number(),
        msg.consensus_height_of_a_on_b.revision_height(),
    );

    client_state_of_b_on_a
        .verify_membership(
            prefix_on_b,
            &msg.proof_consensus_state_of_a_on_b,
            consensus_state_of_b_on_a.root(),
            Path::ClientConsensusState(client_cons_state_path_on_b),
            expected_consensus_state_of_a_on_b.encode_vec(),
        )
        .map_err(|client_error| ConnectionError::ConsensusStateVerificationFailure {
            height: msg.proofs_height_on_b,
            client_error,
        })?;

    Ok(())
}

pub fn execute<Ctx>(
    ctx_a: &mut Ctx,
    msg: MsgConnectionOpenAck,
) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    let vars = LocalVars::new(ctx_a, &msg)?;

    let client_id_on_a = vars.client_id_on_a().clone();
    let client_id_on_b = vars.client_id_on_b().clone();

    let new_conn_end_on_a = {
        let mut counterparty = vars.conn_end_on_a.counterparty().clone();
        counterparty.connection_id = Some(msg.conn_id_on_b.clone());

        let mut new_conn_end_on_a = vars.conn_end_on_a;
        new_conn_end_on_a.set_state(State::Open);
        new_conn_end_on_a.set_version(msg.version.clone());
        new_conn_end_on_a.set_counterparty(counterparty);
        new_conn_end_on_a
    };

    ctx_a.store_connection(&ConnectionPath::new(&msg.conn_id_on_a), new_conn_end_on_a)?;

    ctx_a.log_message("success: conn_open_ack verification passed".to_string())?;

    Ok(vec![IbcEvent::OpenAckConnection(OpenAck::new(
        msg.conn_id_on_a,
        client_id_on_a,
        msg.conn_id_on_b,
        client_id_on_b,
    ))])
}

struct LocalVars {
    conn_end_on_a: ConnectionEnd,
}

impl LocalVars {
    fn new<Ctx>(ctx_a: &Ctx, msg: &MsgConnectionOpenAck) -> Result<Self, ProtocolError>
    where
        Ctx: ValidationContext,
    {
        Ok(LocalVars {
            conn_end_on_a: ctx_a.connection_end(&msg.conn_id_on_a)?,
        })
    }

    fn client_id_on_a(&self) -> &ClientId {
        self.conn_end_on_a.client_id()
    }

    fn client_id_on_b(&self) -> &ClientId {
        self.conn_end_on_a.counterparty().client_id()
    }
}

//! Protocol logic for `MsgConnectionOpenTry`.

use crate::client::context::ClientValidationContext;
use crate::client::{ClientStateCommon, ClientStateValidation, ConsensusState};
use crate::connection::error::ConnectionError;
use crate::connection::events::OpenTry;
use crate::connection::msgs::MsgConnectionOpenTry;
use crate::connection::version::pick_version;
use crate::connection::{ConnectionEnd, Counterparty, State};
use crate::error::ProtocolError;
use crate::events::IbcEvent;
use crate::host::identifiers::ConnectionId;
use crate::host::path::{ClientConsensusStatePath, ClientStatePath, ConnectionPath, Path};
use crate::host::{ExecutionContext, ValidationContext};
use crate::prelude::*;

pub fn validate<Ctx>(ctx_b: &Ctx, msg: &MsgConnectionOpenTry) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    ctx_b.validate_message_signer(&msg.signer)?;

    let conn_id_on_a = msg
        .counterparty
        .connection_id()
        .ok_or(ConnectionError::MissingCounterpartyConnectionId)?;

    // A cannot have consumed a height of B that B has not produced.
    let host_height = ctx_b.host_height()?;
    if msg.consensus_height_of_b_on_a > host_height {
        return Err(ConnectionError::InvalidConsensusHeight {
            target_height: msg.consensus_height_of_b_on_a,
            current_height: host_height,
        }
        .into());
    }

    ctx_b.validate_self_client(&msg.client_state_of_b_on_a)?;

    // Negotiation must succeed before anything is committed.
    pick_version(&ctx_b.get_compatible_versions(), &msg.versions_on_a)?;

    let client_val_ctx_b = ctx_b.get_client_validation_context();
    let client_state_of_a_on_b = client_val_ctx_b.client_state(&msg.client_id_on_b)?;

    client_state_of_a_on_b
        .status(client_val_ctx_b, &msg.client_id_on_b)?
        .verify_is_active()?;
    client_state_of_a_on_b.validate_proof_height(msg.proofs_height_on_a)?;

    let client_cons_state_path_on_b = ClientConsensusStatePath::new(
        msg.client_id_on_b.clone(),
        msg.proofs_height_on_a.revision_number(),
        msg.proofs_height_on_a.revision_height(),
    );
    let consensus_state_of_a_on_b = client_val_ctx_b.consensus_state(&client_cons_state_path_on_b)?;

    let prefix_on_a = msg.counterparty.prefix();
    let prefix_on_b = ctx_b.commitment_prefix();
    let client_id_on_a = msg.counterparty.client_id();

    {
        let expected_conn_end_on_a = ConnectionEnd::new(
            State::Init,
            client_id_on_a.clone(),
            Counterparty::new(msg.client_id_on_b.clone(), None, prefix_on_b),
            msg.versions_on_a.clone(),
            msg.delay_period,
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
    }

    client_state_of_a_on_b
        .verify_membership(
            prefix_on_a,
            &msg.proof_client_state_of_b_on_a,
            consensus_state_of_a_on_b.root(),
            Path::ClientState(ClientStatePath::new(client_id_on_a.clone())),
            msg.client_state_of_b_on_a.clone(),
        )
        .map_err(|client_error| ConnectionError::ClientStateVerificationFailure { client_error })?;

    let expected_consensus_state_of_b_on_a =
        ctx_b.host_consensus_state(&msg.consensus_height_of_b_on_a)?;

    let client_cons_state_path_on_a = ClientConsensusStatePath::new(
        client_id_on_a.clone(),
        msg.consensus_height_of_b_on_a.revision_number(),
        msg.consensus_height_of_b_on_a.revision_height(),
    );

    client_state_of_a_on_b
        .verify_membership(
            prefix_on_a,
            &msg.proof_consensus_state_of_b_on_a,
            consensus_state_of_a_on_b.root(),
            Path::ClientConsensusState(client_cons_state_path_on_a),
            expected_consensus_state_of_b_on_a.encode_vec(),
        )
        .map_err(|client_error| ConnectionError::ConsensusStateVerificationFailure {
            height: msg.proofs_height_on_a,
            client_error,
        })?;

    Ok(())
}

pub fn execute<Ctx>(
    ctx_b: &mut Ctx,
    msg: MsgConnectionOpenTry,
) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    let conn_id_on_a = msg
        .counterparty
        .connection_id()
        .ok_or(ConnectionError::MissingCounterpartyConnectionId)?
        .clone();

    let version_on_b = pick_version(&ctx_b.get_compatible_versions(), &msg.versions_on_a)?;

    let conn_end_on_b = ConnectionEnd::new(
        State::TryOpen,
        msg.client_id_on_b.clone(),
        msg.counterparty.clone(),
        vec![version_on_b],
        msg.delay_period,
    )?;

    let conn_id_on_b = ConnectionId::new(ctx_b.connection_counter()?);

    ctx_b.increase_connection_counter()?;
    ctx_b.store_connection(&ConnectionPath::new(&conn_id_on_b), conn_end_on_b)?;

    ctx_b.log_message(format!(
        "success: conn_open_try: generated new connection identifier: {conn_id_on_b}"
    ))?;

    let client_id_on_a = msg.counterparty.client_id().clone();

    Ok(vec![IbcEvent::OpenTryConnection(OpenTry::new(
        conn_id_on_b,
        msg.client_id_on_b,
        conn_id_on_a,
        client_id_on_a,
    ))])
}

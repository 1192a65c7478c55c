//! Protocol logic for `MsgChannelOpenTry`.

use crate::channel::error::ChannelError;
use crate::channel::events::OpenTry;
use crate::channel::msgs::MsgChannelOpenTry;
use crate::channel::{ChannelEnd, Counterparty, State};
use crate::client::context::ClientValidationContext;
use crate::client::{ClientStateCommon, ClientStateValidation, ConsensusState};
use crate::connection::error::ConnectionError;
use crate::connection::State as ConnectionState;
use crate::error::ProtocolError;
use crate::events::IbcEvent;
use crate::host::identifiers::{ChannelId, Sequence};
use crate::host::path::{
    ChannelEndPath, ClientConsensusStatePath, Path, SeqAckPath, SeqRecvPath, SeqSendPath,
};
use crate::host::{ExecutionContext, ValidationContext};
use crate::prelude::*;
use crate::router::Module;

pub fn chan_open_try_validate<Ctx>(
    ctx_b: &Ctx,
    module: &dyn Module,
    msg: &MsgChannelOpenTry,
) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    validate(ctx_b, msg)?;

    let chan_id_on_b = ChannelId::new(ctx_b.channel_counter()?);

    module.on_chan_open_try_validate(
        msg.ordering,
        &msg.connection_hops_on_b,
        &msg.port_id_on_b,
        &chan_id_on_b,
        &Counterparty::new(msg.port_id_on_a.clone(), Some(msg.chan_id_on_a.clone())),
        &msg.version_supported_on_a,
    )?;

    Ok(())
}

pub fn chan_open_try_execute<Ctx>(
    ctx_b: &mut Ctx,
    module: &mut dyn Module,
    msg: MsgChannelOpenTry,
) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    let chan_id_on_b = ChannelId::new(ctx_b.channel_counter()?);

    let (extras, version) = module.on_chan_open_try_execute(
        msg.ordering,
        &msg.connection_hops_on_b,
        &msg.port_id_on_b,
        &chan_id_on_b,
        &Counterparty::new(msg.port_id_on_a.clone(), Some(msg.chan_id_on_a.clone())),
        &msg.version_supported_on_a,
    )?;

    let conn_id_on_b = msg.connection_hops_on_b[0].clone();

    let chan_end_on_b = ChannelEnd::new(
        State::TryOpen,
        msg.ordering,
        Counterparty::new(msg.port_id_on_a.clone(), Some(msg.chan_id_on_a.clone())),
        msg.connection_hops_on_b.clone(),
        version.clone(),
    )?;

    let chan_end_path_on_b = ChannelEndPath::new(&msg.port_id_on_b, &chan_id_on_b);

    ctx_b.store_channel(&chan_end_path_on_b, chan_end_on_b)?;
    ctx_b.store_next_sequence_send(
        &SeqSendPath::new(&msg.port_id_on_b, &chan_id_on_b),
        Sequence::from(1),
    )?;
    ctx_b.store_next_sequence_recv(
        &SeqRecvPath::new(&msg.port_id_on_b, &chan_id_on_b),
        Sequence::from(1),
    )?;
    ctx_b.store_next_sequence_ack(
        &SeqAckPath::new(&msg.port_id_on_b, &chan_id_on_b),
        Sequence::from(1),
    )?;
    ctx_b.increase_channel_counter()?;
    ctx_b.create_channel_capability(msg.port_id_on_b.clone(), chan_id_on_b.clone())?;

    ctx_b.log_message(format!(
        "success: chan_open_try: generated new channel identifier: {chan_id_on_b}"
    ))?;
    for log in extras.log {
        ctx_b.log_message(log)?;
    }

    let mut events = vec![IbcEvent::OpenTryChannel(OpenTry {
        port_id_on_b: msg.port_id_on_b,
        chan_id_on_b,
        port_id_on_a: msg.port_id_on_a,
        chan_id_on_a: msg.chan_id_on_a,
        conn_id_on_b,
        version_on_b: version,
    })];
    events.extend(extras.events.into_iter().map(IbcEvent::Module));

    Ok(events)
}

fn validate<Ctx>(ctx_b: &Ctx, msg: &MsgChannelOpenTry) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    ctx_b.validate_message_signer(&msg.signer)?;

    if msg.connection_hops_on_b.len() != 1 {
        return Err(ChannelError::InvalidConnectionHopsLength {
            actual: msg.connection_hops_on_b.len(),
        }
        .into());
    }

    let conn_end_on_b = ctx_b.connection_end(&msg.connection_hops_on_b[0])?;

    conn_end_on_b
        .verify_state_matches(&ConnectionState::Open)
        .map_err(|_| ChannelError::ConnectionNotOpen {
            connection_id: msg.connection_hops_on_b[0].clone(),
        })?;

    let conn_version = &conn_end_on_b.versions()[0];
    if !conn_version.is_supported_feature(msg.ordering.as_str()) {
        return Err(ChannelError::UnsupportedOrdering {
            ordering: msg.ordering,
        }
        .into());
    }

    // Proof that chain A committed an INIT channel end naming this chain.
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

    let conn_id_on_a = conn_end_on_b
        .counterparty()
        .connection_id()
        .ok_or(ConnectionError::MissingCounterpartyConnectionId)?;

    let expected_chan_end_on_a = ChannelEnd::new(
        State::Init,
        msg.ordering,
        Counterparty::new(msg.port_id_on_b.clone(), None),
        vec![conn_id_on_a.clone()],
        msg.version_supported_on_a.clone(),
    )?;

    client_state_of_a_on_b
        .verify_membership(
            prefix_on_a,
            &msg.proof_chan_end_on_a,
            consensus_state_of_a_on_b.root(),
            Path::ChannelEnd(ChannelEndPath::new(&msg.port_id_on_a, &msg.chan_id_on_a)),
            expected_chan_end_on_a.encode_vec(),
        )
        .map_err(ChannelError::VerifyChannelFailed)?;

    Ok(())
}

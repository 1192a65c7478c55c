//! The four-step connection handshake.

use core::time::Duration;

use ibc_kernel::client::Height;
use ibc_kernel::connection::error::ConnectionError;
use ibc_kernel::connection::msgs::{
    MsgConnectionOpenAck, MsgConnectionOpenConfirm, MsgConnectionOpenInit, MsgConnectionOpenTry,
};
use ibc_kernel::connection::version::{compatibles, Version};
use ibc_kernel::connection::{ConnectionEnd, State};
use ibc_kernel::dispatch;
use ibc_kernel::entrypoint::{ConnectionMsg, MsgEnvelope};
use ibc_kernel::error::ProtocolError;
use ibc_kernel::events::IbcEvent;
use ibc_kernel::host::identifiers::ConnectionId;
use ibc_kernel::host::ValidationContext;
use ibc_testkit::fixtures::{
    connection_counterparty, ctx_with_client, dummy_proof, dummy_signer, mock_client_id,
    mock_client_state,
};
use ibc_testkit::router::MockRouter;

fn height(h: u64) -> Height {
    Height::new(0, h).expect("non-zero height")
}

#[test]
fn conn_open_init_stores_init_end() {
    let (mut ctx, client_id) = ctx_with_client(height(10));
    let mut router = MockRouter::default();

    let msg = MsgEnvelope::Connection(ConnectionMsg::OpenInit(MsgConnectionOpenInit {
        client_id_on_a: client_id.clone(),
        counterparty: connection_counterparty(mock_client_id(1), None),
        version: None,
        delay_period: Duration::ZERO,
        signer: dummy_signer(),
    }));

    let events = dispatch(&mut ctx, &mut router, msg).expect("init succeeds");
    assert_eq!(events.len(), 1);
    match &events[0] {
        IbcEvent::OpenInitConnection(e) => {
            assert_eq!(e.conn_id_on_a, ConnectionId::new(0));
            assert_eq!(e.client_id_on_a, client_id);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    let end = ctx
        .connection_end(&ConnectionId::new(0))
        .expect("connection stored");
    assert!(end.state_matches(&State::Init));
    assert_eq!(end.versions(), compatibles());
    assert_eq!(end.counterparty().connection_id(), None);
}

#[test]
fn conn_open_init_rejects_unsupported_version() {
    let (mut ctx, client_id) = ctx_with_client(height(10));
    let mut router = MockRouter::default();

    let msg = MsgEnvelope::Connection(ConnectionMsg::OpenInit(MsgConnectionOpenInit {
        client_id_on_a: client_id,
        counterparty: connection_counterparty(mock_client_id(1), None),
        version: Some(Version::new("99".into(), vec![])),
        delay_period: Duration::ZERO,
        signer: dummy_signer(),
    }));

    let res = dispatch(&mut ctx, &mut router, msg);
    assert!(matches!(
        res,
        Err(ProtocolError::Connection(
            ConnectionError::VersionNotSupported { .. }
        ))
    ));
}

#[test]
fn conn_open_try_stores_try_open_end() {
    let (mut ctx, client_id) = ctx_with_client(height(10));
    let mut router = MockRouter::default();

    let msg = MsgEnvelope::Connection(ConnectionMsg::OpenTry(MsgConnectionOpenTry {
        client_id_on_b: client_id.clone(),
        counterparty: connection_counterparty(mock_client_id(1), Some(ConnectionId::new(7))),
        client_state_of_b_on_a: mock_client_state(height(5)).encode_vec(),
        versions_on_a: compatibles(),
        proof_conn_end_on_a: dummy_proof(),
        proof_client_state_of_b_on_a: dummy_proof(),
        proof_consensus_state_of_b_on_a: dummy_proof(),
        proofs_height_on_a: height(10),
        consensus_height_of_b_on_a: height(5),
        delay_period: Duration::ZERO,
        signer: dummy_signer(),
    }));

    let events = dispatch(&mut ctx, &mut router, msg).expect("try succeeds");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], IbcEvent::OpenTryConnection(_)));

    let end = ctx
        .connection_end(&ConnectionId::new(0))
        .expect("connection stored");
    assert!(end.state_matches(&State::TryOpen));
    assert_eq!(
        end.counterparty().connection_id(),
        Some(&ConnectionId::new(7))
    );
}

#[test]
fn conn_open_try_rejects_future_consensus_height() {
    let (mut ctx, client_id) = ctx_with_client(height(10));
    let mut router = MockRouter::default();

    let msg = MsgEnvelope::Connection(ConnectionMsg::OpenTry(MsgConnectionOpenTry {
        client_id_on_b: client_id,
        counterparty: connection_counterparty(mock_client_id(1), Some(ConnectionId::new(7))),
        client_state_of_b_on_a: mock_client_state(height(5)).encode_vec(),
        versions_on_a: compatibles(),
        proof_conn_end_on_a: dummy_proof(),
        proof_client_state_of_b_on_a: dummy_proof(),
        proof_consensus_state_of_b_on_a: dummy_proof(),
        proofs_height_on_a: height(10),
        consensus_height_of_b_on_a: height(20),
        delay_period: Duration::ZERO,
        signer: dummy_signer(),
    }));

    let res = dispatch(&mut ctx, &mut router, msg);
    assert!(matches!(
        res,
        Err(ProtocolError::Connection(
            ConnectionError::InvalidConsensusHeight { .. }
        ))
    ));
}

fn open_ack_msg() -> MsgEnvelope {
    MsgEnvelope::Connection(ConnectionMsg::OpenAck(MsgConnectionOpenAck {
        conn_id_on_a: ConnectionId::new(0),
        conn_id_on_b: ConnectionId::new(1),
        client_state_of_a_on_b: mock_client_state(height(5)).encode_vec(),
        proof_conn_end_on_b: dummy_proof(),
        proof_client_state_of_a_on_b: dummy_proof(),
        proof_consensus_state_of_a_on_b: dummy_proof(),
        proofs_height_on_b: height(10),
        consensus_height_of_a_on_b: height(5),
        version: Version::default(),
        signer: dummy_signer(),
    }))
}

#[test]
fn conn_open_ack_opens_initialized_connection() {
    let (ctx, client_id) = ctx_with_client(height(10));
    let init_end = ConnectionEnd::new(
        State::Init,
        client_id.clone(),
        connection_counterparty(mock_client_id(1), None),
        compatibles(),
        Duration::ZERO,
    )
    .expect("valid connection end");
    let mut ctx = ctx.with_connection(ConnectionId::new(0), init_end);
    let mut router = MockRouter::default();

    let events = dispatch(&mut ctx, &mut router, open_ack_msg()).expect("ack succeeds");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], IbcEvent::OpenAckConnection(_)));

    let end = ctx
        .connection_end(&ConnectionId::new(0))
        .expect("connection stored");
    assert!(end.state_matches(&State::Open));
    assert_eq!(
        end.counterparty().connection_id(),
        Some(&ConnectionId::new(1))
    );
}

#[test]
fn conn_open_ack_rejects_non_init_end() {
    let (ctx, client_id) = ctx_with_client(height(10));
    let try_open_end = ConnectionEnd::new(
        State::TryOpen,
        client_id,
        connection_counterparty(mock_client_id(1), Some(ConnectionId::new(1))),
        compatibles(),
        Duration::ZERO,
    )
    .expect("valid connection end");
    let mut ctx = ctx.with_connection(ConnectionId::new(0), try_open_end);
    let mut router = MockRouter::default();

    let res = dispatch(&mut ctx, &mut router, open_ack_msg());
    assert!(matches!(
        res,
        Err(ProtocolError::Connection(ConnectionError::InvalidState { .. }))
    ));
}

#[test]
fn conn_open_confirm_opens_try_open_end() {
    let (ctx, client_id) = ctx_with_client(height(10));
    let try_open_end = ConnectionEnd::new(
        State::TryOpen,
        client_id,
        connection_counterparty(mock_client_id(1), Some(ConnectionId::new(1))),
        compatibles(),
        Duration::ZERO,
    )
    .expect("valid connection end");
    let mut ctx = ctx.with_connection(ConnectionId::new(0), try_open_end);
    let mut router = MockRouter::default();

    let msg = MsgEnvelope::Connection(ConnectionMsg::OpenConfirm(MsgConnectionOpenConfirm {
        conn_id_on_b: ConnectionId::new(0),
        proof_conn_end_on_a: dummy_proof(),
        proof_height_on_a: height(10),
        signer: dummy_signer(),
    }));

    let events = dispatch(&mut ctx, &mut router, msg).expect("confirm succeeds");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], IbcEvent::OpenConfirmConnection(_)));

    let end = ctx
        .connection_end(&ConnectionId::new(0))
        .expect("connection stored");
    assert!(end.state_matches(&State::Open));
}

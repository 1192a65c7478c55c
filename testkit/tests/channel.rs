//! The channel handshake and channel closure, dispatched through the
//! router to the dummy application.

use core::time::Duration;

use ibc_kernel::channel::error::ChannelError;
use ibc_kernel::channel::msgs::{
    MsgChannelCloseConfirm, MsgChannelCloseInit, MsgChannelOpenAck, MsgChannelOpenConfirm,
    MsgChannelOpenInit, MsgChannelOpenTry,
};
use ibc_kernel::channel::version::Version as ChannelVersion;
use ibc_kernel::channel::{Order, State};
use ibc_kernel::client::Height;
use ibc_kernel::connection::version::Version as ConnectionVersion;
use ibc_kernel::connection::{ConnectionEnd, State as ConnectionState};
use ibc_kernel::dispatch;
use ibc_kernel::entrypoint::{ChannelMsg, MsgEnvelope};
use ibc_kernel::error::ProtocolError;
use ibc_kernel::events::IbcEvent;
use ibc_kernel::host::identifiers::{ChannelCapability, ChannelId, ConnectionId, Sequence};
use ibc_kernel::host::path::{ChannelEndPath, SeqSendPath};
use ibc_kernel::host::ValidationContext;
use ibc_kernel::router::RouterError;
use ibc_testkit::context::MockContext;
use ibc_testkit::fixtures::{
    connection_counterparty, ctx_with_channel, ctx_with_client, dummy_proof, dummy_signer,
    open_connection_end, transfer_port,
};
use ibc_testkit::router::MockRouter;

fn height(h: u64) -> Height {
    Height::new(0, h).expect("non-zero height")
}

fn ctx_with_open_connection() -> MockContext {
    let (ctx, client_id) = ctx_with_client(height(10));
    ctx.with_connection(
        ConnectionId::new(0),
        open_connection_end(&client_id, Duration::ZERO),
    )
}

#[test]
fn chan_open_init_stores_channel_and_capability() {
    let mut ctx = ctx_with_open_connection();
    let mut router = MockRouter::new_with_dummy(transfer_port());

    let msg = MsgEnvelope::Channel(ChannelMsg::OpenInit(MsgChannelOpenInit {
        port_id_on_a: transfer_port(),
        connection_hops_on_a: vec![ConnectionId::new(0)],
        port_id_on_b: transfer_port(),
        ordering: Order::Unordered,
        version_proposal: ChannelVersion::empty(),
        signer: dummy_signer(),
    }));

    let events = dispatch(&mut ctx, &mut router, msg).expect("init succeeds");
    assert_eq!(events.len(), 1);
    match &events[0] {
        IbcEvent::OpenInitChannel(e) => {
            assert_eq!(e.chan_id_on_a, ChannelId::new(0));
            // The empty proposal lets the application pick its version.
            assert_eq!(e.version_on_a.as_str(), "dummy-1");
        }
        other => panic!("unexpected event: {other:?}"),
    }

    let path = ChannelEndPath::new(&transfer_port(), &ChannelId::new(0));
    let end = ctx.channel_end(&path).expect("channel stored");
    assert!(end.state_matches(&State::Init));
    assert_eq!(end.version().as_str(), "dummy-1");

    let seq_send = ctx
        .get_next_sequence_send(&SeqSendPath::new(&transfer_port(), &ChannelId::new(0)))
        .expect("sequence stored");
    assert_eq!(seq_send, Sequence::from(1));
    assert!(ctx
        .channel_capability(&transfer_port(), &ChannelId::new(0))
        .is_some());
}

#[test]
fn chan_open_init_rejects_unbound_port() {
    let mut ctx = ctx_with_open_connection();
    let mut router = MockRouter::default();

    let msg = MsgEnvelope::Channel(ChannelMsg::OpenInit(MsgChannelOpenInit {
        port_id_on_a: transfer_port(),
        connection_hops_on_a: vec![ConnectionId::new(0)],
        port_id_on_b: transfer_port(),
        ordering: Order::Unordered,
        version_proposal: ChannelVersion::empty(),
        signer: dummy_signer(),
    }));

    let res = dispatch(&mut ctx, &mut router, msg);
    assert!(matches!(
        res,
        Err(ProtocolError::Router(RouterError::UnknownPort { .. }))
    ));
}

#[test]
fn chan_open_init_rejects_unsupported_ordering() {
    let (ctx, client_id) = ctx_with_client(height(10));
    let ordered_only = ConnectionEnd::new(
        ConnectionState::Open,
        client_id.clone(),
        connection_counterparty(client_id, Some(ConnectionId::new(1))),
        vec![ConnectionVersion::new(
            "1".into(),
            vec!["ORDER_ORDERED".into()],
        )],
        Duration::ZERO,
    )
    .expect("valid connection end");
    let mut ctx = ctx.with_connection(ConnectionId::new(0), ordered_only);
    let mut router = MockRouter::new_with_dummy(transfer_port());

    let msg = MsgEnvelope::Channel(ChannelMsg::OpenInit(MsgChannelOpenInit {
        port_id_on_a: transfer_port(),
        connection_hops_on_a: vec![ConnectionId::new(0)],
        port_id_on_b: transfer_port(),
        ordering: Order::Unordered,
        version_proposal: ChannelVersion::empty(),
        signer: dummy_signer(),
    }));

    let res = dispatch(&mut ctx, &mut router, msg);
    assert!(matches!(
        res,
        Err(ProtocolError::Channel(
            ChannelError::UnsupportedOrdering { .. }
        ))
    ));
}

#[test]
fn chan_open_try_stores_try_open_end() {
    let mut ctx = ctx_with_open_connection();
    let mut router = MockRouter::new_with_dummy(transfer_port());

    let msg = MsgEnvelope::Channel(ChannelMsg::OpenTry(MsgChannelOpenTry {
        port_id_on_b: transfer_port(),
        connection_hops_on_b: vec![ConnectionId::new(0)],
        port_id_on_a: transfer_port(),
        chan_id_on_a: ChannelId::new(1),
        version_supported_on_a: ChannelVersion::new("dummy-1".into()),
        proof_chan_end_on_a: dummy_proof(),
        proof_height_on_a: height(10),
        ordering: Order::Unordered,
        signer: dummy_signer(),
    }));

    let events = dispatch(&mut ctx, &mut router, msg).expect("try succeeds");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], IbcEvent::OpenTryChannel(_)));

    let path = ChannelEndPath::new(&transfer_port(), &ChannelId::new(0));
    let end = ctx.channel_end(&path).expect("channel stored");
    assert!(end.state_matches(&State::TryOpen));
    assert_eq!(end.counterparty().channel_id(), Some(&ChannelId::new(1)));
}

#[test]
fn chan_open_ack_opens_channel() {
    let (mut ctx, _) = ctx_with_channel(State::Init, Order::Unordered, height(10));
    let mut router = MockRouter::new_with_dummy(transfer_port());

    let msg = MsgEnvelope::Channel(ChannelMsg::OpenAck(MsgChannelOpenAck {
        port_id_on_a: transfer_port(),
        chan_id_on_a: ChannelId::new(0),
        chan_id_on_b: ChannelId::new(1),
        version_on_b: ChannelVersion::new("dummy-2".into()),
        proof_chan_end_on_b: dummy_proof(),
        proof_height_on_b: height(10),
        signer: dummy_signer(),
    }));

    let events = dispatch(&mut ctx, &mut router, msg).expect("ack succeeds");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], IbcEvent::OpenAckChannel(_)));

    let path = ChannelEndPath::new(&transfer_port(), &ChannelId::new(0));
    let end = ctx.channel_end(&path).expect("channel stored");
    assert!(end.state_matches(&State::Open));
    // The counterparty's version wins once the handshake converges.
    assert_eq!(end.version().as_str(), "dummy-2");
    assert_eq!(end.counterparty().channel_id(), Some(&ChannelId::new(1)));
}

#[test]
fn chan_open_ack_rejects_non_init_channel() {
    let (mut ctx, _) = ctx_with_channel(State::Open, Order::Unordered, height(10));
    let mut router = MockRouter::new_with_dummy(transfer_port());

    let msg = MsgEnvelope::Channel(ChannelMsg::OpenAck(MsgChannelOpenAck {
        port_id_on_a: transfer_port(),
        chan_id_on_a: ChannelId::new(0),
        chan_id_on_b: ChannelId::new(1),
        version_on_b: ChannelVersion::new("dummy-1".into()),
        proof_chan_end_on_b: dummy_proof(),
        proof_height_on_b: height(10),
        signer: dummy_signer(),
    }));

    let res = dispatch(&mut ctx, &mut router, msg);
    assert!(matches!(
        res,
        Err(ProtocolError::Channel(ChannelError::InvalidState { .. }))
    ));
}

#[test]
fn chan_open_confirm_opens_channel() {
    let (mut ctx, _) = ctx_with_channel(State::TryOpen, Order::Unordered, height(10));
    let mut router = MockRouter::new_with_dummy(transfer_port());

    let msg = MsgEnvelope::Channel(ChannelMsg::OpenConfirm(MsgChannelOpenConfirm {
        port_id_on_b: transfer_port(),
        chan_id_on_b: ChannelId::new(0),
        proof_chan_end_on_a: dummy_proof(),
        proof_height_on_a: height(10),
        signer: dummy_signer(),
    }));

    let events = dispatch(&mut ctx, &mut router, msg).expect("confirm succeeds");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], IbcEvent::OpenConfirmChannel(_)));

    let path = ChannelEndPath::new(&transfer_port(), &ChannelId::new(0));
    let end = ctx.channel_end(&path).expect("channel stored");
    assert!(end.state_matches(&State::Open));
}

#[test]
fn chan_close_init_closes_channel() {
    let (mut ctx, _) = ctx_with_channel(State::Open, Order::Unordered, height(10));
    let mut router = MockRouter::new_with_dummy(transfer_port());

    let capability = ctx
        .channel_capability(&transfer_port(), &ChannelId::new(0))
        .expect("capability minted");
    let msg = MsgEnvelope::Channel(ChannelMsg::CloseInit(MsgChannelCloseInit {
        port_id_on_a: transfer_port(),
        chan_id_on_a: ChannelId::new(0),
        capability,
        signer: dummy_signer(),
    }));

    let events = dispatch(&mut ctx, &mut router, msg).expect("close succeeds");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], IbcEvent::CloseInitChannel(_)));

    let path = ChannelEndPath::new(&transfer_port(), &ChannelId::new(0));
    let end = ctx.channel_end(&path).expect("channel stored");
    assert!(end.state_matches(&State::Closed));
}

#[test]
fn chan_close_init_rejects_foreign_capability() {
    let (mut ctx, _) = ctx_with_channel(State::Open, Order::Unordered, height(10));
    let mut router = MockRouter::new_with_dummy(transfer_port());

    let msg = MsgEnvelope::Channel(ChannelMsg::CloseInit(MsgChannelCloseInit {
        port_id_on_a: transfer_port(),
        chan_id_on_a: ChannelId::new(0),
        capability: ChannelCapability::from(b"forged".to_vec()),
        signer: dummy_signer(),
    }));

    let res = dispatch(&mut ctx, &mut router, msg);
    assert!(matches!(
        res,
        Err(ProtocolError::Channel(
            ChannelError::UnauthorizedCapability { .. }
        ))
    ));
}

#[test]
fn chan_close_init_rejects_closed_channel() {
    let (mut ctx, _) = ctx_with_channel(State::Closed, Order::Unordered, height(10));
    let mut router = MockRouter::new_with_dummy(transfer_port());

    let capability = ctx
        .channel_capability(&transfer_port(), &ChannelId::new(0))
        .expect("capability minted");
    let msg = MsgEnvelope::Channel(ChannelMsg::CloseInit(MsgChannelCloseInit {
        port_id_on_a: transfer_port(),
        chan_id_on_a: ChannelId::new(0),
        capability,
        signer: dummy_signer(),
    }));

    let res = dispatch(&mut ctx, &mut router, msg);
    assert!(matches!(
        res,
        Err(ProtocolError::Channel(ChannelError::ChannelClosed))
    ));
}

#[test]
fn chan_close_confirm_closes_channel() {
    let (mut ctx, _) = ctx_with_channel(State::Open, Order::Unordered, height(10));
    let mut router = MockRouter::new_with_dummy(transfer_port());

    let msg = MsgEnvelope::Channel(ChannelMsg::CloseConfirm(MsgChannelCloseConfirm {
        port_id_on_b: transfer_port(),
        chan_id_on_b: ChannelId::new(0),
        proof_chan_end_on_a: dummy_proof(),
        proof_height_on_a: height(10),
        signer: dummy_signer(),
    }));

    let events = dispatch(&mut ctx, &mut router, msg).expect("close succeeds");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], IbcEvent::CloseConfirmChannel(_)));

    let path = ChannelEndPath::new(&transfer_port(), &ChannelId::new(0));
    let end = ctx.channel_end(&path).expect("channel stored");
    assert!(end.state_matches(&State::Closed));
}

//! The packet lifecycle: send, receive, acknowledge, timeout.

use core::time::Duration;

use ibc_kernel::channel::acknowledgement::Acknowledgement;
use ibc_kernel::channel::commitment::compute_ack_commitment;
use ibc_kernel::channel::error::{ChannelError, PacketError};
use ibc_kernel::channel::handler::send_packet;
use ibc_kernel::channel::msgs::{
    MsgAcknowledgement, MsgRecvPacket, MsgTimeout, MsgTimeoutOnClose,
};
use ibc_kernel::channel::timeout::{TimeoutHeight, TimeoutTimestamp};
use ibc_kernel::channel::{Order, State};
use ibc_kernel::client::error::ClientError;
use ibc_kernel::client::msgs::MsgUpdateClient;
use ibc_kernel::client::Height;
use ibc_kernel::connection::error::ConnectionError;
use ibc_kernel::dispatch;
use ibc_kernel::entrypoint::{ClientMsg, MsgEnvelope, PacketMsg};
use ibc_kernel::error::ProtocolError;
use ibc_kernel::events::IbcEvent;
use ibc_kernel::host::identifiers::{ChannelCapability, ChannelId, ClientId, ConnectionId, Sequence};
use ibc_kernel::host::path::{
    AckPath, ChannelEndPath, CommitmentPath, ReceiptPath, SeqRecvPath, SeqSendPath,
};
use ibc_kernel::host::ValidationContext;
use ibc_kernel::primitives::Timestamp;
use ibc_testkit::clients::{MockClientMessage, MockHeader};
use ibc_testkit::context::MockContext;
use ibc_testkit::fixtures::{
    channel_end, ctx_with_channel, dummy_packet, dummy_packet_inbound, dummy_proof, dummy_signer,
    mock_client_id, mock_client_state, open_connection_end, transfer_port,
};
use ibc_testkit::router::MockRouter;
use rstest::rstest;

fn height(h: u64) -> Height {
    Height::new(0, h).expect("non-zero height")
}

fn capability_of(ctx: &MockContext) -> ChannelCapability {
    ctx.channel_capability(&transfer_port(), &ChannelId::new(0))
        .expect("capability minted")
}

fn recv_msg(seq: u64) -> MsgEnvelope {
    MsgEnvelope::Packet(PacketMsg::Recv(MsgRecvPacket {
        packet: dummy_packet_inbound(seq),
        proof_commitment_on_a: dummy_proof(),
        proof_height_on_a: height(10),
        signer: dummy_signer(),
    }))
}

fn update_client_msg(client_id: &ClientId, header: MockHeader) -> MsgEnvelope {
    MsgEnvelope::Client(ClientMsg::UpdateClient(MsgUpdateClient {
        client_id: client_id.clone(),
        client_message: MockClientMessage::Header(header).encode_vec(),
        signer: dummy_signer(),
    }))
}

#[test]
fn send_packet_commits_packet() {
    let (mut ctx, _) = ctx_with_channel(State::Open, Order::Unordered, height(10));
    let capability = capability_of(&ctx);

    let events = send_packet(&mut ctx, &capability, dummy_packet(1)).expect("send succeeds");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], IbcEvent::SendPacket(_)));

    let commitment_path = CommitmentPath::new(&transfer_port(), &ChannelId::new(0), 1.into());
    assert!(ctx
        .get_packet_commitment(&commitment_path)
        .expect("lookup succeeds")
        .is_some());

    let seq_send = ctx
        .get_next_sequence_send(&SeqSendPath::new(&transfer_port(), &ChannelId::new(0)))
        .expect("sequence stored");
    assert_eq!(seq_send, Sequence::from(2));
}

#[test]
fn send_packet_rejects_wrong_sequence() {
    let (mut ctx, _) = ctx_with_channel(State::Open, Order::Unordered, height(10));
    let capability = capability_of(&ctx);

    let res = send_packet(&mut ctx, &capability, dummy_packet(5));
    assert!(matches!(
        res,
        Err(ProtocolError::Packet(
            PacketError::InvalidPacketSequence { .. }
        ))
    ));
}

#[test]
fn send_packet_requires_capability() {
    let (mut ctx, _) = ctx_with_channel(State::Open, Order::Unordered, height(10));

    let res = send_packet(
        &mut ctx,
        &ChannelCapability::from(b"forged".to_vec()),
        dummy_packet(1),
    );
    assert!(matches!(
        res,
        Err(ProtocolError::Channel(
            ChannelError::UnauthorizedCapability { .. }
        ))
    ));
}

#[test]
fn send_packet_rejects_missing_timeout() {
    let (mut ctx, _) = ctx_with_channel(State::Open, Order::Unordered, height(10));
    let capability = capability_of(&ctx);

    let mut packet = dummy_packet(1);
    packet.timeout_height_on_b = TimeoutHeight::Never;
    packet.timeout_timestamp_on_b = TimeoutTimestamp::Never;

    let res = send_packet(&mut ctx, &capability, packet);
    assert!(matches!(
        res,
        Err(ProtocolError::Packet(PacketError::MissingTimeout))
    ));
}

#[test]
fn send_packet_rejects_unopened_channel() {
    let (mut ctx, _) = ctx_with_channel(State::Init, Order::Unordered, height(10));
    let capability = capability_of(&ctx);

    let res = send_packet(&mut ctx, &capability, dummy_packet(1));
    assert!(matches!(
        res,
        Err(ProtocolError::Channel(ChannelError::InvalidState { .. }))
    ));
}

#[test]
fn recv_packet_writes_receipt_and_acknowledgement() {
    let (mut ctx, _) = ctx_with_channel(State::Open, Order::Unordered, height(10));
    let mut router = MockRouter::new_with_dummy(transfer_port());

    let events = dispatch(&mut ctx, &mut router, recv_msg(1)).expect("recv succeeds");
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], IbcEvent::ReceivePacket(_)));
    match &events[1] {
        IbcEvent::WriteAcknowledgement(e) => {
            // The dummy application echoes the packet data back.
            assert_eq!(e.acknowledgement.as_bytes(), b"ping");
        }
        other => panic!("unexpected event: {other:?}"),
    }

    let receipt_path = ReceiptPath::new(&transfer_port(), &ChannelId::new(0), 1.into());
    assert!(ctx
        .get_packet_receipt(&receipt_path)
        .expect("lookup succeeds")
        .is_some());

    let ack_path = AckPath::new(&transfer_port(), &ChannelId::new(0), 1.into());
    let stored_ack = ctx
        .get_packet_acknowledgement(&ack_path)
        .expect("lookup succeeds")
        .expect("acknowledgement stored");
    let expected =
        compute_ack_commitment(&Acknowledgement::try_from(b"ping".to_vec()).expect("non-empty"));
    assert_eq!(stored_ack, expected);
}

#[rstest]
#[case::unordered(Order::Unordered)]
#[case::ordered(Order::Ordered)]
fn recv_packet_replay_is_a_noop(#[case] ordering: Order) {
    let (mut ctx, _) = ctx_with_channel(State::Open, ordering, height(10));
    let mut router = MockRouter::new_with_dummy(transfer_port());

    let events = dispatch(&mut ctx, &mut router, recv_msg(1)).expect("recv succeeds");
    assert_eq!(events.len(), 2);

    let replay_events = dispatch(&mut ctx, &mut router, recv_msg(1)).expect("replay succeeds");
    assert!(replay_events.is_empty());
}

#[test]
fn recv_packet_ordered_advances_sequence() {
    let (mut ctx, _) = ctx_with_channel(State::Open, Order::Ordered, height(10));
    let mut router = MockRouter::new_with_dummy(transfer_port());

    dispatch(&mut ctx, &mut router, recv_msg(1)).expect("recv succeeds");

    let next_seq_recv = ctx
        .get_next_sequence_recv(&SeqRecvPath::new(&transfer_port(), &ChannelId::new(0)))
        .expect("sequence stored");
    assert_eq!(next_seq_recv, Sequence::from(2));

    // Ordered channels track a cursor, not per-packet receipts.
    let receipt_path = ReceiptPath::new(&transfer_port(), &ChannelId::new(0), 1.into());
    assert!(ctx
        .get_packet_receipt(&receipt_path)
        .expect("lookup succeeds")
        .is_none());
}

#[test]
fn recv_packet_ordered_rejects_sequence_gap() {
    let (mut ctx, _) = ctx_with_channel(State::Open, Order::Ordered, height(10));
    let mut router = MockRouter::new_with_dummy(transfer_port());

    let res = dispatch(&mut ctx, &mut router, recv_msg(5));
    assert!(matches!(
        res,
        Err(ProtocolError::Packet(
            PacketError::InvalidPacketSequence { .. }
        ))
    ));
}

#[test]
fn recv_packet_rejects_frozen_client() {
    let client_id = mock_client_id(0);
    let mut client_state = mock_client_state(height(10));
    client_state.frozen = true;
    let mut ctx = MockContext::new()
        .with_client(&client_id, client_state)
        .with_connection(
            ConnectionId::new(0),
            open_connection_end(&client_id, Duration::ZERO),
        )
        .with_channel(
            transfer_port(),
            ChannelId::new(0),
            channel_end(State::Open, Order::Unordered),
        );
    let mut router = MockRouter::new_with_dummy(transfer_port());

    let res = dispatch(&mut ctx, &mut router, recv_msg(1));
    assert!(matches!(
        res,
        Err(ProtocolError::Client(ClientError::ClientNotActive { .. }))
    ));
}

#[test]
fn acknowledgement_clears_commitment() {
    let (mut ctx, _) = ctx_with_channel(State::Open, Order::Unordered, height(10));
    let mut router = MockRouter::new_with_dummy(transfer_port());
    let capability = capability_of(&ctx);

    send_packet(&mut ctx, &capability, dummy_packet(1)).expect("send succeeds");
    assert_eq!(ctx.packet_commitment_count(), 1);

    let msg = MsgEnvelope::Packet(PacketMsg::Ack(MsgAcknowledgement {
        packet: dummy_packet(1),
        acknowledgement: Acknowledgement::try_from(b"ping".to_vec()).expect("non-empty"),
        proof_acked_on_b: dummy_proof(),
        proof_height_on_b: height(10),
        signer: dummy_signer(),
    }));

    let events = dispatch(&mut ctx, &mut router, msg.clone()).expect("ack succeeds");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], IbcEvent::AcknowledgePacket(_)));
    assert_eq!(ctx.packet_commitment_count(), 0);

    // Clearing the commitment makes any further delivery a no-op.
    let replay_events = dispatch(&mut ctx, &mut router, msg).expect("replay succeeds");
    assert!(replay_events.is_empty());
}

#[test]
fn acknowledgement_rejects_commitment_mismatch() {
    let (mut ctx, _) = ctx_with_channel(State::Open, Order::Unordered, height(10));
    let mut router = MockRouter::new_with_dummy(transfer_port());
    let capability = capability_of(&ctx);

    send_packet(&mut ctx, &capability, dummy_packet(1)).expect("send succeeds");

    let mut packet = dummy_packet(1);
    packet.data = b"tampered".to_vec();
    let msg = MsgEnvelope::Packet(PacketMsg::Ack(MsgAcknowledgement {
        packet,
        acknowledgement: Acknowledgement::try_from(b"ping".to_vec()).expect("non-empty"),
        proof_acked_on_b: dummy_proof(),
        proof_height_on_b: height(10),
        signer: dummy_signer(),
    }));

    let res = dispatch(&mut ctx, &mut router, msg);
    assert!(matches!(
        res,
        Err(ProtocolError::Packet(
            PacketError::IncorrectPacketCommitment { .. }
        ))
    ));
}

/// Sends a packet with a height timeout of 15, then advances the client's
/// view of the counterparty past it.
fn setup_timed_out_packet(
    ctx: &mut MockContext,
    router: &mut MockRouter,
    client_id: &ClientId,
) -> ibc_kernel::channel::packet::Packet {
    let capability = capability_of(ctx);
    let mut packet = dummy_packet(1);
    packet.timeout_height_on_b = TimeoutHeight::At(height(15));
    packet.timeout_timestamp_on_b = TimeoutTimestamp::Never;
    send_packet(ctx, &capability, packet.clone()).expect("send succeeds");

    let header = MockHeader::new(height(20), Timestamp::from_nanoseconds(2_000));
    dispatch(ctx, router, update_client_msg(client_id, header)).expect("update succeeds");

    packet
}

fn timeout_msg(packet: ibc_kernel::channel::packet::Packet) -> MsgEnvelope {
    MsgEnvelope::Packet(PacketMsg::Timeout(MsgTimeout {
        packet,
        next_seq_recv_on_b: Sequence::from(1),
        proof_unreceived_on_b: dummy_proof(),
        proof_height_on_b: height(20),
        signer: dummy_signer(),
    }))
}

#[test]
fn timeout_removes_commitment() {
    let (mut ctx, client_id) = ctx_with_channel(State::Open, Order::Unordered, height(10));
    let mut router = MockRouter::new_with_dummy(transfer_port());
    let packet = setup_timed_out_packet(&mut ctx, &mut router, &client_id);

    let events = dispatch(&mut ctx, &mut router, timeout_msg(packet)).expect("timeout succeeds");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], IbcEvent::TimeoutPacket(_)));
    assert_eq!(ctx.packet_commitment_count(), 0);

    // An unordered channel survives a timeout.
    let path = ChannelEndPath::new(&transfer_port(), &ChannelId::new(0));
    let end = ctx.channel_end(&path).expect("channel stored");
    assert!(end.state_matches(&State::Open));
}

#[test]
fn timeout_closes_ordered_channel() {
    let (mut ctx, client_id) = ctx_with_channel(State::Open, Order::Ordered, height(10));
    let mut router = MockRouter::new_with_dummy(transfer_port());
    let packet = setup_timed_out_packet(&mut ctx, &mut router, &client_id);

    let events = dispatch(&mut ctx, &mut router, timeout_msg(packet)).expect("timeout succeeds");
    assert_eq!(events.len(), 2);
    assert!(matches!(events[0], IbcEvent::TimeoutPacket(_)));
    assert!(matches!(events[1], IbcEvent::ChannelClosed(_)));

    let path = ChannelEndPath::new(&transfer_port(), &ChannelId::new(0));
    let end = ctx.channel_end(&path).expect("channel stored");
    assert!(end.state_matches(&State::Closed));
}

#[test]
fn timeout_before_expiry_is_rejected() {
    let (mut ctx, _) = ctx_with_channel(State::Open, Order::Unordered, height(10));
    let mut router = MockRouter::new_with_dummy(transfer_port());

    let capability = capability_of(&ctx);
    let mut packet = dummy_packet(1);
    packet.timeout_height_on_b = TimeoutHeight::At(height(15));
    packet.timeout_timestamp_on_b = TimeoutTimestamp::Never;
    send_packet(&mut ctx, &capability, packet.clone()).expect("send succeeds");

    let msg = MsgEnvelope::Packet(PacketMsg::Timeout(MsgTimeout {
        packet,
        next_seq_recv_on_b: Sequence::from(1),
        proof_unreceived_on_b: dummy_proof(),
        proof_height_on_b: height(10),
        signer: dummy_signer(),
    }));

    let res = dispatch(&mut ctx, &mut router, msg);
    assert!(matches!(
        res,
        Err(ProtocolError::Packet(
            PacketError::PacketTimeoutNotReached { .. }
        ))
    ));
}

#[test]
fn timeout_on_close_removes_commitment() {
    let (mut ctx, _) = ctx_with_channel(State::Open, Order::Unordered, height(10));
    let mut router = MockRouter::new_with_dummy(transfer_port());
    let capability = capability_of(&ctx);

    send_packet(&mut ctx, &capability, dummy_packet(1)).expect("send succeeds");

    let msg = MsgEnvelope::Packet(PacketMsg::TimeoutOnClose(MsgTimeoutOnClose {
        packet: dummy_packet(1),
        next_seq_recv_on_b: Sequence::from(1),
        proof_unreceived_on_b: dummy_proof(),
        proof_close_on_b: dummy_proof(),
        proof_height_on_b: height(10),
        signer: dummy_signer(),
    }));

    let events = dispatch(&mut ctx, &mut router, msg).expect("timeout succeeds");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], IbcEvent::TimeoutPacket(_)));
    assert_eq!(ctx.packet_commitment_count(), 0);
}

#[test]
fn connection_delay_is_enforced() {
    let client_id = mock_client_id(0);
    let mut ctx = MockContext::new()
        .with_host_height(height(100))
        .with_host_timestamp(Timestamp::from_nanoseconds(600_000_000_000))
        .with_client(&client_id, mock_client_state(height(10)))
        .with_connection(
            ConnectionId::new(0),
            open_connection_end(&client_id, Duration::from_secs(500)),
        )
        .with_channel(
            transfer_port(),
            ChannelId::new(0),
            channel_end(State::Open, Order::Unordered),
        );
    let mut router = MockRouter::new_with_dummy(transfer_port());

    // The proof's consensus state was installed just now; the 500s delay
    // has not elapsed.
    let res = dispatch(&mut ctx, &mut router, recv_msg(1));
    assert!(matches!(
        res,
        Err(ProtocolError::Connection(
            ConnectionError::NotEnoughTimeElapsed { .. }
        ))
    ));

    // Backdate the installation far enough for both the time and the
    // block component of the delay.
    ctx.set_update_meta(
        &client_id,
        height(10),
        Timestamp::from_nanoseconds(1_000),
        height(1),
    );
    let events = dispatch(&mut ctx, &mut router, recv_msg(1)).expect("recv succeeds");
    assert_eq!(events.len(), 2);
}

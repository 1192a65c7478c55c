//! Client lifecycle: creation, header updates, misbehaviour handling.

use ibc_kernel::client::error::ClientError;
use ibc_kernel::client::msgs::{MsgCreateClient, MsgUpdateClient};
use ibc_kernel::client::{ClientStateCommon, ConsensusState, Height};
use ibc_kernel::dispatch;
use ibc_kernel::entrypoint::{ClientMsg, MsgEnvelope};
use ibc_kernel::error::ProtocolError;
use ibc_kernel::events::IbcEvent;
use ibc_kernel::host::identifiers::ClientId;
use ibc_kernel::primitives::Timestamp;
use ibc_testkit::clients::{MockClientMessage, MockConsensusState, MockHeader, MockMisbehaviour};
use ibc_testkit::context::MockContext;
use ibc_testkit::fixtures::{ctx_with_client, dummy_signer, mock_client_id, mock_client_state};
use ibc_testkit::router::MockRouter;

fn height(h: u64) -> Height {
    Height::new(0, h).expect("non-zero height")
}

fn create_client_msg(latest: Height) -> MsgEnvelope {
    let client_state = mock_client_state(latest);
    MsgEnvelope::Client(ClientMsg::CreateClient(MsgCreateClient {
        client_state: client_state.encode_vec(),
        consensus_state: MockConsensusState::new(client_state.latest_header).encode_vec(),
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
fn create_client_assigns_sequential_identifiers() {
    let mut ctx = MockContext::new();
    let mut router = MockRouter::default();

    let events =
        dispatch(&mut ctx, &mut router, create_client_msg(height(10))).expect("create succeeds");
    assert_eq!(events.len(), 1);
    match &events[0] {
        IbcEvent::CreateClient(e) => {
            assert_eq!(e.client_id, mock_client_id(0));
            assert_eq!(e.consensus_height, height(10));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(ctx.client_record(&mock_client_id(0)).is_some());

    dispatch(&mut ctx, &mut router, create_client_msg(height(12))).expect("create succeeds");
    assert!(ctx.client_record(&mock_client_id(1)).is_some());
}

#[test]
fn create_client_rejects_undecodable_state() {
    let mut ctx = MockContext::new();
    let mut router = MockRouter::default();

    let msg = MsgEnvelope::Client(ClientMsg::CreateClient(MsgCreateClient {
        client_state: b"junk".to_vec(),
        consensus_state: b"junk".to_vec(),
        signer: dummy_signer(),
    }));

    let res = dispatch(&mut ctx, &mut router, msg);
    assert!(matches!(
        res,
        Err(ProtocolError::Client(ClientError::InvalidClientState { .. }))
    ));
}

#[test]
fn update_client_advances_latest_height() {
    let (mut ctx, client_id) = ctx_with_client(height(10));
    let mut router = MockRouter::default();

    let header = MockHeader::new(height(20), Timestamp::from_nanoseconds(2_000));
    let events = dispatch(&mut ctx, &mut router, update_client_msg(&client_id, header))
        .expect("update succeeds");

    assert_eq!(events.len(), 1);
    match &events[0] {
        IbcEvent::UpdateClient(e) => {
            assert_eq!(e.client_id, client_id);
            assert_eq!(e.consensus_heights, vec![height(20)]);
        }
        other => panic!("unexpected event: {other:?}"),
    }

    let record = ctx.client_record(&client_id).expect("client exists");
    assert_eq!(record.client_state.latest_height(), height(20));
    assert!(record.consensus_states.contains_key(&height(20)));
    assert!(record.update_metas.contains_key(&height(20)));
}

#[test]
fn update_client_with_old_header_keeps_latest_height() {
    let (mut ctx, client_id) = ctx_with_client(height(10));
    let mut router = MockRouter::default();

    let header = MockHeader::new(height(5), Timestamp::from_nanoseconds(500));
    dispatch(&mut ctx, &mut router, update_client_msg(&client_id, header))
        .expect("update succeeds");

    let record = ctx.client_record(&client_id).expect("client exists");
    assert_eq!(record.client_state.latest_height(), height(10));
    assert!(record.consensus_states.contains_key(&height(5)));
}

#[test]
fn misbehaviour_freezes_client() {
    let (mut ctx, client_id) = ctx_with_client(height(10));
    let mut router = MockRouter::default();

    let misbehaviour = MockMisbehaviour {
        header1: MockHeader::new(height(15), Timestamp::from_nanoseconds(5_000)),
        header2: MockHeader::new(height(15), Timestamp::from_nanoseconds(6_000)),
    };
    let msg = MsgEnvelope::Client(ClientMsg::UpdateClient(MsgUpdateClient {
        client_id: client_id.clone(),
        client_message: MockClientMessage::Misbehaviour(misbehaviour).encode_vec(),
        signer: dummy_signer(),
    }));

    let events = dispatch(&mut ctx, &mut router, msg).expect("misbehaviour submission succeeds");
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], IbcEvent::ClientMisbehaviour(_)));

    let record = ctx.client_record(&client_id).expect("client exists");
    assert!(record.client_state.is_frozen());

    // A frozen client takes no further updates.
    let header = MockHeader::new(height(20), Timestamp::from_nanoseconds(7_000));
    let res = dispatch(&mut ctx, &mut router, update_client_msg(&client_id, header));
    assert!(matches!(
        res,
        Err(ProtocolError::Client(ClientError::ClientNotActive { .. }))
    ));
}

#[test]
fn misbehaviour_headers_must_share_a_height() {
    let (mut ctx, client_id) = ctx_with_client(height(10));
    let mut router = MockRouter::default();

    let misbehaviour = MockMisbehaviour {
        header1: MockHeader::new(height(15), Timestamp::from_nanoseconds(5_000)),
        header2: MockHeader::new(height(16), Timestamp::from_nanoseconds(5_000)),
    };
    let msg = MsgEnvelope::Client(ClientMsg::UpdateClient(MsgUpdateClient {
        client_id,
        client_message: MockClientMessage::Misbehaviour(misbehaviour).encode_vec(),
        signer: dummy_signer(),
    }));

    let res = dispatch(&mut ctx, &mut router, msg);
    assert!(matches!(
        res,
        Err(ProtocolError::Client(ClientError::InvalidClientMessage { .. }))
    ));
}

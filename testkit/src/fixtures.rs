//! Builders for the identifiers, records and messages the integration
//! tests assemble over and over.

use alloc::vec;
use alloc::vec::Vec;
use core::time::Duration;

use ibc_kernel::channel::packet::Packet;
use ibc_kernel::channel::timeout::{TimeoutHeight, TimeoutTimestamp};
use ibc_kernel::channel::version::Version as ChannelVersion;
use ibc_kernel::channel::{
    ChannelEnd, Counterparty as ChannelCounterparty, Order, State as ChannelState,
};
use ibc_kernel::client::Height;
use ibc_kernel::commitment::{CommitmentPrefix, CommitmentProofBytes};
use ibc_kernel::connection::version::Version as ConnectionVersion;
use ibc_kernel::connection::{
    ConnectionEnd, Counterparty as ConnectionCounterparty, State as ConnectionState,
};
use ibc_kernel::host::identifiers::{ChannelId, ClientId, ConnectionId, PortId, Sequence};
use ibc_kernel::primitives::{Signer, Timestamp};

use crate::clients::{MockClientState, MockHeader, MOCK_CLIENT_TYPE};
use crate::context::MockContext;

pub fn dummy_signer() -> Signer {
    Signer::from("cosmos000000000000000000000000000000000relayer")
}

/// Proof bytes the mock client will accept; non-empty by construction.
pub fn dummy_proof() -> CommitmentProofBytes {
    CommitmentProofBytes::try_from(vec![1u8]).expect("non-empty")
}

pub fn mock_client_id(counter: u64) -> ClientId {
    ClientId::new(MOCK_CLIENT_TYPE, counter).expect("valid client id")
}

pub fn transfer_port() -> PortId {
    "transfer".parse().expect("valid port id")
}

pub fn counterparty_prefix() -> CommitmentPrefix {
    CommitmentPrefix::from(b"mock".to_vec())
}

/// A mock client state whose consensus timestamp is far in the past, so
/// packet timeout bounds in tests are comfortably unexpired.
pub fn mock_client_state(latest: Height) -> MockClientState {
    MockClientState::new(MockHeader::new(latest, Timestamp::from_nanoseconds(1_000)))
}

/// A context holding one active mock client with the given latest height.
pub fn ctx_with_client(latest: Height) -> (MockContext, ClientId) {
    let client_id = mock_client_id(0);
    let ctx = MockContext::new().with_client(&client_id, mock_client_state(latest));
    (ctx, client_id)
}

pub fn connection_counterparty(client_id: ClientId, conn_id: Option<ConnectionId>) -> ConnectionCounterparty {
    ConnectionCounterparty::new(client_id, conn_id, counterparty_prefix())
}

/// An open connection over `client_id`, with the counterparty's identifier
/// already assigned.
pub fn open_connection_end(client_id: &ClientId, delay_period: Duration) -> ConnectionEnd {
    ConnectionEnd::new(
        ConnectionState::Open,
        client_id.clone(),
        connection_counterparty(client_id.clone(), Some(ConnectionId::new(1))),
        vec![ConnectionVersion::default()],
        delay_period,
    )
    .expect("valid connection end")
}

/// A channel end over `connection-0` whose counterparty is
/// `transfer/channel-1`.
pub fn channel_end(state: ChannelState, ordering: Order) -> ChannelEnd {
    ChannelEnd::new(
        state,
        ordering,
        ChannelCounterparty::new(transfer_port(), Some(ChannelId::new(1))),
        vec![ConnectionId::new(0)],
        ChannelVersion::new("dummy-1".into()),
    )
    .expect("valid channel end")
}

/// A context with one client, one open connection (`connection-0`) and one
/// channel end `transfer/channel-0` in the given state and ordering.
pub fn ctx_with_channel(
    state: ChannelState,
    ordering: Order,
    client_latest: Height,
) -> (MockContext, ClientId) {
    let (ctx, client_id) = ctx_with_client(client_latest);
    let ctx = ctx
        .with_connection(
            ConnectionId::new(0),
            open_connection_end(&client_id, Duration::ZERO),
        )
        .with_channel(transfer_port(), ChannelId::new(0), channel_end(state, ordering));
    (ctx, client_id)
}

/// A packet from `transfer/channel-0` to `transfer/channel-1` with generous
/// timeout bounds.
pub fn dummy_packet(seq: u64) -> Packet {
    Packet {
        seq_on_a: Sequence::from(seq),
        port_id_on_a: transfer_port(),
        chan_id_on_a: ChannelId::new(0),
        port_id_on_b: transfer_port(),
        chan_id_on_b: ChannelId::new(1),
        data: b"ping".to_vec(),
        timeout_height_on_b: TimeoutHeight::from(Height::new(0, 100_000).expect("non-zero")),
        timeout_timestamp_on_b: TimeoutTimestamp::from(Timestamp::from_nanoseconds(
            1_000_000_000_000,
        )),
    }
}

/// The same packet seen from chain B: source is the counterparty end.
pub fn dummy_packet_inbound(seq: u64) -> Packet {
    let mut packet = dummy_packet(seq);
    packet.chan_id_on_a = ChannelId::new(1);
    packet.chan_id_on_b = ChannelId::new(0);
    packet
}

pub fn dummy_data() -> Vec<u8> {
    b"ping".to_vec()
}

//! Events produced by the channel handshake and packet handlers.

use crate::channel::acknowledgement::Acknowledgement;
use crate::channel::packet::Packet;
use crate::channel::version::Version;
use crate::channel::Order;
use crate::host::identifiers::{ChannelId, ConnectionId, PortId};

/// `chan_open_init` recorded a new channel end in state `Init`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenInit {
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub port_id_on_b: PortId,
    pub conn_id_on_a: ConnectionId,
    pub version_on_a: Version,
}

/// `chan_open_try` recorded a new channel end in state `TryOpen`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenTry {
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub conn_id_on_b: ConnectionId,
    pub version_on_b: Version,
}

/// `chan_open_ack` moved the initiating end to `Open`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenAck {
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub conn_id_on_a: ConnectionId,
}

/// `chan_open_confirm` moved the accepting end to `Open`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenConfirm {
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub conn_id_on_b: ConnectionId,
}

/// `chan_close_init` closed the local end voluntarily.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloseInit {
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub conn_id_on_a: ConnectionId,
}

/// `chan_close_confirm` closed the local end after proving the
/// counterparty closed first.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloseConfirm {
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub conn_id_on_b: ConnectionId,
}

/// A packet was committed for sending. Relayers read the packet from this
/// event; the store holds only its hash.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendPacket {
    pub packet: Packet,
    pub channel_ordering: Order,
}

/// A packet was received and its receipt (or next-sequence bump) recorded.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReceivePacket {
    pub packet: Packet,
    pub channel_ordering: Order,
}

/// The application's acknowledgement was committed on the receiving chain.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteAcknowledgement {
    pub packet: Packet,
    pub acknowledgement: Acknowledgement,
}

/// The sending chain processed the acknowledgement and cleared the packet
/// commitment.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AcknowledgePacket {
    pub packet: Packet,
    pub channel_ordering: Order,
}

/// The sending chain proved non-delivery and cleared the packet
/// commitment.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimeoutPacket {
    pub packet: Packet,
    pub channel_ordering: Order,
}

/// An ordered channel was closed by a packet timeout.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelClosed {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub port_id_on_b: PortId,
    pub channel_id_on_b: Option<ChannelId>,
    pub conn_id: ConnectionId,
    pub channel_ordering: Order,
}

//! Channel handshake and packet relay messages.
//!
//! As with connections, `_on_a` names the chain that initiated the channel
//! (or, for packet messages, the chain the packet was sent from) and
//! `_on_b` its counterparty.

use crate::channel::acknowledgement::Acknowledgement;
use crate::channel::packet::Packet;
use crate::channel::version::Version;
use crate::channel::Order;
use crate::client::Height;
use crate::commitment::CommitmentProofBytes;
use crate::host::identifiers::{ChannelCapability, ChannelId, ConnectionId, PortId, Sequence};
use crate::prelude::*;
use crate::primitives::Signer;

/// Starts the channel handshake on chain A.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelOpenInit {
    pub port_id_on_a: PortId,
    pub connection_hops_on_a: Vec<ConnectionId>,
    pub port_id_on_b: PortId,
    pub ordering: Order,
    /// Proposed application version; the local application may replace it.
    pub version_proposal: Version,
    pub signer: Signer,
}

/// Relays A's `Init` channel record to chain B.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelOpenTry {
    pub port_id_on_b: PortId,
    pub connection_hops_on_b: Vec<ConnectionId>,
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    /// The version A's application settled on in `chan_open_init`.
    pub version_supported_on_a: Version,
    pub proof_chan_end_on_a: CommitmentProofBytes,
    pub proof_height_on_a: Height,
    pub ordering: Order,
    pub signer: Signer,
}

/// Relays B's `TryOpen` channel record back to chain A.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelOpenAck {
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub chan_id_on_b: ChannelId,
    /// The version B's application settled on; becomes the channel version
    /// on both ends.
    pub version_on_b: Version,
    pub proof_chan_end_on_b: CommitmentProofBytes,
    pub proof_height_on_b: Height,
    pub signer: Signer,
}

/// Relays A's `Open` channel record to chain B, completing the handshake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelOpenConfirm {
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub proof_chan_end_on_a: CommitmentProofBytes,
    pub proof_height_on_a: Height,
    pub signer: Signer,
}

/// Voluntarily closes the local channel end. Requires the channel's
/// capability: closure is reserved to the owning application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelCloseInit {
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub capability: ChannelCapability,
    pub signer: Signer,
}

/// Closes the local end after the counterparty proved it closed first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgChannelCloseConfirm {
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub proof_chan_end_on_a: CommitmentProofBytes,
    pub proof_height_on_a: Height,
    pub signer: Signer,
}

/// Delivers a packet to chain B, with proof of its commitment on A.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgRecvPacket {
    pub packet: Packet,
    pub proof_commitment_on_a: CommitmentProofBytes,
    pub proof_height_on_a: Height,
    pub signer: Signer,
}

/// Returns B's acknowledgement to chain A, with proof of its commitment on
/// B.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgAcknowledgement {
    pub packet: Packet,
    pub acknowledgement: Acknowledgement,
    pub proof_acked_on_b: CommitmentProofBytes,
    pub proof_height_on_b: Height,
    pub signer: Signer,
}

/// Proves to chain A that a packet was never delivered to B within its
/// timeout bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgTimeout {
    pub packet: Packet,
    /// B's next receive sequence; proven by membership on ordered
    /// channels.
    pub next_seq_recv_on_b: Sequence,
    /// Ordered: membership proof of `next_seq_recv_on_b`. Unordered:
    /// non-membership proof of the packet's receipt.
    pub proof_unreceived_on_b: CommitmentProofBytes,
    pub proof_height_on_b: Height,
    pub signer: Signer,
}

/// Proves to chain A that the counterparty end closed while a packet was
/// still undelivered, releasing the packet without waiting for its timeout
/// bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgTimeoutOnClose {
    pub packet: Packet,
    pub next_seq_recv_on_b: Sequence,
    pub proof_unreceived_on_b: CommitmentProofBytes,
    /// Membership proof of B's `Closed` channel record.
    pub proof_close_on_b: CommitmentProofBytes,
    pub proof_height_on_b: Height,
    pub signer: Signer,
}

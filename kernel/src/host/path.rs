//! Typed store paths.
//!
//! Every piece of protocol state lives under a well-known key in the host's
//! provable store; counterparty proofs are verified against these same
//! paths. The `Display` impl of each path yields the exact key string, so
//! hosts and light clients agree on the byte layout.

use derive_more::{Display, From};

use crate::host::identifiers::{ChannelId, ClientId, ConnectionId, PortId, Sequence};
use crate::prelude::*;

pub const CLIENT_PREFIX: &str = "clients";
pub const CLIENT_STATE_LEAF: &str = "clientState";
pub const CONSENSUS_STATE_PREFIX: &str = "consensusStates";
pub const CONNECTION_PREFIX: &str = "connections";
pub const CHANNEL_END_PREFIX: &str = "channelEnds";
pub const PORT_PREFIX: &str = "ports";
pub const CHANNEL_PREFIX: &str = "channels";
pub const SEQUENCE_PREFIX: &str = "sequences";
pub const NEXT_SEQ_SEND_PREFIX: &str = "nextSequenceSend";
pub const NEXT_SEQ_RECV_PREFIX: &str = "nextSequenceRecv";
pub const NEXT_SEQ_ACK_PREFIX: &str = "nextSequenceAck";
pub const PACKET_COMMITMENT_PREFIX: &str = "commitments";
pub const PACKET_ACK_PREFIX: &str = "acks";
pub const PACKET_RECEIPT_PREFIX: &str = "receipts";

/// Union of all store paths the protocol reads, writes, or proves against.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, From, Display)]
pub enum Path {
    ClientState(ClientStatePath),
    ClientConsensusState(ClientConsensusStatePath),
    Connection(ConnectionPath),
    ChannelEnd(ChannelEndPath),
    SeqSend(SeqSendPath),
    SeqRecv(SeqRecvPath),
    SeqAck(SeqAckPath),
    Commitment(CommitmentPath),
    Ack(AckPath),
    Receipt(ReceiptPath),
}

/// Key under which a client state is stored: `clients/{client_id}/clientState`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
#[display(fmt = "{CLIENT_PREFIX}/{_0}/{CLIENT_STATE_LEAF}")]
pub struct ClientStatePath(pub ClientId);

impl ClientStatePath {
    pub fn new(client_id: ClientId) -> Self {
        Self(client_id)
    }
}

/// Key under which a client's consensus state for a height is stored:
/// `clients/{client_id}/consensusStates/{revision_number}-{revision_height}`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(
    fmt = "{CLIENT_PREFIX}/{client_id}/{CONSENSUS_STATE_PREFIX}/{revision_number}-{revision_height}"
)]
pub struct ClientConsensusStatePath {
    pub client_id: ClientId,
    pub revision_number: u64,
    pub revision_height: u64,
}

impl ClientConsensusStatePath {
    pub fn new(client_id: ClientId, revision_number: u64, revision_height: u64) -> Self {
        Self {
            client_id,
            revision_number,
            revision_height,
        }
    }
}

/// Key under which a connection end is stored: `connections/{connection_id}`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
#[display(fmt = "{CONNECTION_PREFIX}/{_0}")]
pub struct ConnectionPath(pub ConnectionId);

impl ConnectionPath {
    pub fn new(connection_id: &ConnectionId) -> Self {
        Self(connection_id.clone())
    }
}

/// Key under which a channel end is stored:
/// `channelEnds/ports/{port_id}/channels/{channel_id}`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{CHANNEL_END_PREFIX}/{PORT_PREFIX}/{_0}/{CHANNEL_PREFIX}/{_1}")]
pub struct ChannelEndPath(pub PortId, pub ChannelId);

impl ChannelEndPath {
    pub fn new(port_id: &PortId, channel_id: &ChannelId) -> Self {
        Self(port_id.clone(), channel_id.clone())
    }
}

/// Key of the next-send sequence counter:
/// `nextSequenceSend/ports/{port_id}/channels/{channel_id}`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{NEXT_SEQ_SEND_PREFIX}/{PORT_PREFIX}/{_0}/{CHANNEL_PREFIX}/{_1}")]
pub struct SeqSendPath(pub PortId, pub ChannelId);

impl SeqSendPath {
    pub fn new(port_id: &PortId, channel_id: &ChannelId) -> Self {
        Self(port_id.clone(), channel_id.clone())
    }
}

/// Key of the next-receive sequence counter:
/// `nextSequenceRecv/ports/{port_id}/channels/{channel_id}`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{NEXT_SEQ_RECV_PREFIX}/{PORT_PREFIX}/{_0}/{CHANNEL_PREFIX}/{_1}")]
pub struct SeqRecvPath(pub PortId, pub ChannelId);

impl SeqRecvPath {
    pub fn new(port_id: &PortId, channel_id: &ChannelId) -> Self {
        Self(port_id.clone(), channel_id.clone())
    }
}

/// Key of the next-acknowledge sequence counter (ordered channels only):
/// `nextSequenceAck/ports/{port_id}/channels/{channel_id}`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{NEXT_SEQ_ACK_PREFIX}/{PORT_PREFIX}/{_0}/{CHANNEL_PREFIX}/{_1}")]
pub struct SeqAckPath(pub PortId, pub ChannelId);

impl SeqAckPath {
    pub fn new(port_id: &PortId, channel_id: &ChannelId) -> Self {
        Self(port_id.clone(), channel_id.clone())
    }
}

/// Key under which a sent packet's commitment digest is stored:
/// `commitments/ports/{port_id}/channels/{channel_id}/sequences/{sequence}`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(
    fmt = "{PACKET_COMMITMENT_PREFIX}/{PORT_PREFIX}/{port_id}/{CHANNEL_PREFIX}/{channel_id}/{SEQUENCE_PREFIX}/{sequence}"
)]
pub struct CommitmentPath {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub sequence: Sequence,
}

impl CommitmentPath {
    pub fn new(port_id: &PortId, channel_id: &ChannelId, sequence: Sequence) -> Self {
        Self {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
            sequence,
        }
    }
}

/// Key under which a received packet's acknowledgement digest is stored:
/// `acks/ports/{port_id}/channels/{channel_id}/sequences/{sequence}`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(
    fmt = "{PACKET_ACK_PREFIX}/{PORT_PREFIX}/{port_id}/{CHANNEL_PREFIX}/{channel_id}/{SEQUENCE_PREFIX}/{sequence}"
)]
pub struct AckPath {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub sequence: Sequence,
}

impl AckPath {
    pub fn new(port_id: &PortId, channel_id: &ChannelId, sequence: Sequence) -> Self {
        Self {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
            sequence,
        }
    }
}

/// Key under which a packet receipt is stored:
/// `receipts/ports/{port_id}/channels/{channel_id}/sequences/{sequence}`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(
    fmt = "{PACKET_RECEIPT_PREFIX}/{PORT_PREFIX}/{port_id}/{CHANNEL_PREFIX}/{channel_id}/{SEQUENCE_PREFIX}/{sequence}"
)]
pub struct ReceiptPath {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub sequence: Sequence,
}

impl ReceiptPath {
    pub fn new(port_id: &PortId, channel_id: &ChannelId, sequence: Sequence) -> Self {
        Self {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use super::*;

    #[test]
    fn path_strings_match_the_host_key_layout() {
        let port_id = PortId::from_str("transfer").unwrap();
        let channel_id = ChannelId::new(7);
        let client_id = ClientId::new("07-tendermint", 0).unwrap();

        assert_eq!(
            ClientStatePath::new(client_id.clone()).to_string(),
            "clients/07-tendermint-0/clientState"
        );
        assert_eq!(
            ClientConsensusStatePath::new(client_id, 1, 10).to_string(),
            "clients/07-tendermint-0/consensusStates/1-10"
        );
        assert_eq!(
            ConnectionPath::new(&ConnectionId::new(3)).to_string(),
            "connections/connection-3"
        );
        assert_eq!(
            ChannelEndPath::new(&port_id, &channel_id).to_string(),
            "channelEnds/ports/transfer/channels/channel-7"
        );
        assert_eq!(
            CommitmentPath::new(&port_id, &channel_id, 5.into()).to_string(),
            "commitments/ports/transfer/channels/channel-7/sequences/5"
        );
        assert_eq!(
            ReceiptPath::new(&port_id, &channel_id, 5.into()).to_string(),
            "receipts/ports/transfer/channels/channel-7/sequences/5"
        );
        assert_eq!(
            AckPath::new(&port_id, &channel_id, 5.into()).to_string(),
            "acks/ports/transfer/channels/channel-7/sequences/5"
        );
        assert_eq!(
            SeqSendPath::new(&port_id, &channel_id).to_string(),
            "nextSequenceSend/ports/transfer/channels/channel-7"
        );
    }
}

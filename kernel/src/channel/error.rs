use displaydoc::Display;

use crate::channel::timeout::{TimeoutHeight, TimeoutTimestamp};
use crate::channel::{Counterparty, Order, State};
use crate::client::error::ClientError;
use crate::client::Height;
use crate::host::error::IdentifierError;
use crate::host::identifiers::{ChannelId, ConnectionId, PortId, Sequence};
use crate::prelude::*;
use crate::primitives::Timestamp;

#[derive(Debug, Display)]
pub enum ChannelError {
    /// channel not found: port `{port_id}`, channel `{channel_id}`
    ChannelNotFound {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// channel state mismatch: expected `{expected}`, actual `{actual}`
    InvalidState { expected: State, actual: State },
    /// channel is closed
    ChannelClosed,
    /// the channel's connection `{connection_id}` is not open
    ConnectionNotOpen { connection_id: ConnectionId },
    /// connection hops must contain exactly one connection, found `{actual}`
    InvalidConnectionHopsLength { actual: usize },
    /// the connection does not support `{ordering}` channels
    UnsupportedOrdering { ordering: Order },
    /// counterparty has not assigned a channel identifier yet
    MissingCounterpartyChannelId,
    /// counterparty mismatch: channel was opened against `{actual}`, message names `{expected}`
    InvalidCounterparty {
        expected: Counterparty,
        actual: Counterparty,
    },
    /// capability does not grant authority over port `{port_id}`, channel `{channel_id}`
    UnauthorizedCapability {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// channel end proof verification failed: `{0}`
    VerifyChannelFailed(ClientError),
    /// application callback failed: `{description}`
    AppModule { description: String },
    /// invalid identifier: `{0}`
    InvalidIdentifier(IdentifierError),
}

impl From<IdentifierError> for ChannelError {
    fn from(e: IdentifierError) -> Self {
        Self::InvalidIdentifier(e)
    }
}

#[derive(Debug, Display)]
pub enum PacketError {
    /// packet commitment not found for sequence `{sequence}`
    PacketCommitmentNotFound { sequence: Sequence },
    /// acknowledgement not found for sequence `{sequence}`
    PacketAcknowledgementNotFound { sequence: Sequence },
    /// packet sequence `{given_sequence}` does not match the next expected sequence `{next_sequence}`
    InvalidPacketSequence {
        given_sequence: Sequence,
        next_sequence: Sequence,
    },
    /// packet timeout height `{timeout_height}` is already reached at chain height `{chain_height}`
    LowPacketHeight {
        chain_height: Height,
        timeout_height: TimeoutHeight,
    },
    /// packet timeout timestamp `{timeout_timestamp}` is already reached at chain timestamp `{chain_timestamp}`
    LowPacketTimestamp {
        chain_timestamp: Timestamp,
        timeout_timestamp: TimeoutTimestamp,
    },
    /// packet carries neither a timeout height nor a timeout timestamp
    MissingTimeout,
    /// the relayed packet does not match the stored commitment for sequence `{sequence}`
    IncorrectPacketCommitment { sequence: Sequence },
    /// an acknowledgement already exists for sequence `{sequence}`
    AcknowledgementExists { sequence: Sequence },
    /// acknowledgement cannot be empty
    InvalidAcknowledgement,
    /// packet has not timed out: height bound `{timeout_height}`, timestamp bound `{timeout_timestamp}`
    PacketTimeoutNotReached {
        timeout_height: TimeoutHeight,
        timeout_timestamp: TimeoutTimestamp,
    },
    /// the send sequence counter would overflow
    SequenceOverflow,
    /// packet proof verification failed for sequence `{sequence}`: `{client_error}`
    PacketVerificationFailed {
        sequence: Sequence,
        client_error: ClientError,
    },
    /// application callback failed: `{description}`
    AppModule { description: String },
    /// channel error: `{0}`
    Channel(ChannelError),
}

impl From<ChannelError> for PacketError {
    fn from(e: ChannelError) -> Self {
        Self::Channel(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::VerifyChannelFailed(e) => Some(e),
            Self::InvalidIdentifier(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PacketError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PacketVerificationFailed {
                client_error: e, ..
            } => Some(e),
            Self::Channel(e) => Some(e),
            _ => None,
        }
    }
}

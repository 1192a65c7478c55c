//! Identifier newtypes exposed on the wire, plus the opaque channel
//! capability token.

use core::str::FromStr;

use crate::host::error::IdentifierError;
use crate::host::validate::{
    validate_channel_identifier, validate_client_identifier, validate_client_type,
    validate_connection_identifier, validate_port_identifier, validate_prefix_format,
};
use crate::prelude::*;

/// Type of a light client (e.g. `07-tendermint`), used as the prefix of the
/// client identifiers it is registered under.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    borsh::BorshSerialize,
    borsh::BorshDeserialize,
)]
pub struct ClientType(String);

impl ClientType {
    /// Builds the identifier of the `counter`-th client of this type:
    /// `{client_type}-{counter}`.
    pub fn build_client_id(&self, counter: u64) -> ClientId {
        ClientId::format(&self.0, counter)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ClientType {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_client_type(s).map(|()| Self(s.to_string()))
    }
}

/// Identifier of a light client tracking a counterparty chain.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::Into,
    borsh::BorshSerialize,
    borsh::BorshDeserialize,
)]
pub struct ClientId(String);

impl ClientId {
    /// Builds a new client identifier from a client type and the chain-wide
    /// client counter. Identifiers are deterministic: `{client_type}-{counter}`.
    pub fn new(client_type: &str, counter: u64) -> Result<Self, IdentifierError> {
        let client_type = client_type.trim();
        validate_client_type(client_type).map(|()| Self::format(client_type, counter))
    }

    pub(crate) fn format(client_type: &str, counter: u64) -> Self {
        Self(alloc::format!("{client_type}-{counter}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl FromStr for ClientId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_client_identifier(s).map(|()| Self(s.to_string()))
    }
}

/// Identifier of a connection end on the local chain.
///
/// Generated deterministically from the connection counter: `connection-{n}`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::Into,
    borsh::BorshSerialize,
    borsh::BorshDeserialize,
)]
pub struct ConnectionId(String);

impl ConnectionId {
    pub const PREFIX: &'static str = "connection";

    /// Builds the identifier of the `counter`-th connection of the chain.
    pub fn new(counter: u64) -> Self {
        Self(alloc::format!("{}-{counter}", Self::PREFIX))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ConnectionId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_connection_identifier(s)
            .and_then(|()| validate_prefix_format(Self::PREFIX, s))
            .map(|()| Self(s.to_string()))
    }
}

/// Identifier of a channel end, scoped to a port.
///
/// Generated deterministically from the channel counter: `channel-{n}`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::Into,
    borsh::BorshSerialize,
    borsh::BorshDeserialize,
)]
pub struct ChannelId(String);

impl ChannelId {
    pub const PREFIX: &'static str = "channel";

    /// Builds the identifier of the `counter`-th channel of the chain.
    pub fn new(counter: u64) -> Self {
        Self(alloc::format!("{}-{counter}", Self::PREFIX))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ChannelId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_channel_identifier(s)
            .and_then(|()| validate_prefix_format(Self::PREFIX, s))
            .map(|()| Self(s.to_string()))
    }
}

/// Identifier of an application port (e.g. `transfer`).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::Into,
    borsh::BorshSerialize,
    borsh::BorshDeserialize,
)]
pub struct PortId(String);

impl PortId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl FromStr for PortId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validate_port_identifier(s).map(|()| Self(s.to_string()))
    }
}

/// The sequence number of a packet; enforces ordering among packets from the
/// same source.
///
/// Sequences start at 1 and never wrap: incrementing past `u64::MAX` is a
/// fatal configuration error surfaced as
/// [`SequenceOverflow`](crate::channel::error::PacketError::SequenceOverflow).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    borsh::BorshSerialize,
    borsh::BorshDeserialize,
)]
pub struct Sequence(u64);

impl Sequence {
    /// Gives the sequence number.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The next sequence number, or `None` if the counter is exhausted.
    pub fn increment(&self) -> Option<Sequence> {
        self.0.checked_add(1).map(Sequence)
    }

    /// Encodes the sequence number as big-endian bytes, the format committed
    /// to in the provable store for ordered-channel timeout proofs.
    pub fn to_vec(&self) -> Vec<u8> {
        self.0.to_be_bytes().to_vec()
    }
}

impl From<u64> for Sequence {
    fn from(seq: u64) -> Self {
        Sequence(seq)
    }
}

impl From<Sequence> for u64 {
    fn from(s: Sequence) -> u64 {
        s.0
    }
}

impl FromStr for Sequence {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>()
            .map(Self)
            .map_err(|_| IdentifierError::InvalidStringAsSequence {
                value: s.to_string(),
            })
    }
}

impl core::fmt::Display for Sequence {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(f, "{}", self.0)
    }
}

/// Unforgeable authorization token handed to the application module that
/// owns a channel end.
///
/// The host mints one when a channel is initialized and demands it back on
/// `send_packet` and `chan_close_init`. The kernel never inspects the
/// representation; it only round-trips the bytes to the host for
/// authentication.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelCapability(Vec<u8>);

impl ChannelCapability {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for ChannelCapability {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for ChannelCapability {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn client_id_is_deterministic() {
        let client_type = ClientType::from_str("07-tendermint").unwrap();
        assert_eq!(client_type.build_client_id(0).as_str(), "07-tendermint-0");
    }

    #[rstest]
    #[case("connection-0")]
    #[case("connection-123")]
    fn valid_connection_ids(#[case] id: &str) {
        assert!(ConnectionId::from_str(id).is_ok());
    }

    #[rstest]
    #[case("connection")]
    #[case("connection-01")]
    #[case("chan-0")]
    fn invalid_connection_ids(#[case] id: &str) {
        assert!(ConnectionId::from_str(id).is_err());
    }

    #[test]
    fn sequence_increment_detects_exhaustion() {
        assert_eq!(Sequence::from(1).increment(), Some(Sequence::from(2)));
        assert_eq!(Sequence::from(u64::MAX).increment(), None);
    }
}

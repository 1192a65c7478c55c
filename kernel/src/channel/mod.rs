//! Channel handshake and packet lifecycle.
//!
//! A channel is a port-to-port lane over an open connection. Like
//! connections it opens through a four-step handshake; unlike them it can
//! close, and it carries packets whose commitments, receipts and
//! acknowledgements are the protocol's provable obligations.

pub mod acknowledgement;
pub mod commitment;
pub mod error;
pub mod events;
pub mod handler;
pub mod msgs;
pub mod packet;
pub mod timeout;
pub mod version;

use core::fmt::{Display, Error as FmtError, Formatter};

use crate::channel::error::ChannelError;
use crate::channel::version::Version;
use crate::host::identifiers::{ChannelId, ConnectionId, PortId};
use crate::prelude::*;

/// Delivery discipline of a channel, fixed at handshake time.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    borsh::BorshSerialize,
    borsh::BorshDeserialize,
)]
pub enum Order {
    /// Packets are delivered in any order, each exactly once.
    Unordered,
    /// Packets are delivered exactly in the order they were sent; a
    /// timeout closes the channel.
    Ordered,
}

impl Order {
    /// The feature string a connection version must carry to support
    /// channels of this ordering.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unordered => "ORDER_UNORDERED",
            Self::Ordered => "ORDER_ORDERED",
        }
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

/// The lifecycle state of a channel end.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    borsh::BorshSerialize,
    borsh::BorshDeserialize,
)]
pub enum State {
    /// The local end has proposed the channel.
    Init,
    /// The counterparty proposed and this end has verified the proposal.
    TryOpen,
    /// Both ends are verified; packets flow.
    Open,
    /// Terminal. No packet may be sent or received; timeouts may still be
    /// processed against the other, still-open end.
    Closed,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::TryOpen => "TRYOPEN",
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

/// The counterparty of a channel end: its port, and its channel identifier
/// once assigned.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct Counterparty {
    pub port_id: PortId,
    pub channel_id: Option<ChannelId>,
}

impl Counterparty {
    pub fn new(port_id: PortId, channel_id: Option<ChannelId>) -> Self {
        Self {
            port_id,
            channel_id,
        }
    }

    pub fn port_id(&self) -> &PortId {
        &self.port_id
    }

    pub fn channel_id(&self) -> Option<&ChannelId> {
        self.channel_id.as_ref()
    }
}

impl Display for Counterparty {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match &self.channel_id {
            Some(channel_id) => write!(f, "{}/{channel_id}", self.port_id),
            None => write!(f, "{}/(unassigned)", self.port_id),
        }
    }
}

/// One end of a channel, as committed to the host store.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct ChannelEnd {
    state: State,
    ordering: Order,
    remote: Counterparty,
    connection_hops: Vec<ConnectionId>,
    version: Version,
}

impl ChannelEnd {
    /// Only single-hop channels are supported: `connection_hops` must hold
    /// exactly one connection identifier.
    pub fn new(
        state: State,
        ordering: Order,
        remote: Counterparty,
        connection_hops: Vec<ConnectionId>,
        version: Version,
    ) -> Result<Self, ChannelError> {
        if connection_hops.len() != 1 {
            return Err(ChannelError::InvalidConnectionHopsLength {
                actual: connection_hops.len(),
            });
        }

        Ok(Self {
            state,
            ordering,
            remote,
            connection_hops,
            version,
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn ordering(&self) -> &Order {
        &self.ordering
    }

    pub fn counterparty(&self) -> &Counterparty {
        &self.remote
    }

    pub fn connection_hops(&self) -> &[ConnectionId] {
        &self.connection_hops
    }

    /// The connection this channel runs over.
    pub fn connection_id(&self) -> &ConnectionId {
        // Invariant from `new`: hops has exactly one element.
        &self.connection_hops[0]
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn state_matches(&self, other: &State) -> bool {
        self.state.eq(other)
    }

    pub fn verify_state_matches(&self, expected: &State) -> Result<(), ChannelError> {
        if !self.state_matches(expected) {
            return Err(ChannelError::InvalidState {
                expected: *expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.state_matches(&State::Open)
    }

    /// Closure is the only terminal transition; everything that mutates a
    /// channel must reject a closed one.
    pub fn verify_not_closed(&self) -> Result<(), ChannelError> {
        if self.state_matches(&State::Closed) {
            return Err(ChannelError::ChannelClosed);
        }
        Ok(())
    }

    /// A packet names its destination; it must be the counterparty this
    /// channel was opened against.
    pub fn verify_counterparty_matches(&self, expected: &Counterparty) -> Result<(), ChannelError> {
        if !self.remote.eq(expected) {
            return Err(ChannelError::InvalidCounterparty {
                expected: expected.clone(),
                actual: self.remote.clone(),
            });
        }
        Ok(())
    }

    pub fn order_matches(&self, other: &Order) -> bool {
        self.ordering.eq(other)
    }

    pub fn set_state(&mut self, new_state: State) {
        self.state = new_state;
    }

    pub fn set_version(&mut self, new_version: Version) {
        self.version = new_version;
    }

    pub fn set_counterparty_channel_id(&mut self, channel_id: ChannelId) {
        self.remote.channel_id = Some(channel_id);
    }

    /// The canonical byte encoding of this record, i.e. the value the
    /// counterparty proves membership of during the handshake.
    pub fn encode_vec(&self) -> Vec<u8> {
        borsh::to_vec(self).expect("writing a channel end to a Vec never fails")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel_end(state: State) -> ChannelEnd {
        ChannelEnd::new(
            state,
            Order::Unordered,
            Counterparty::new("transfer".parse().unwrap(), None),
            vec!["connection-0".parse().unwrap()],
            Version::empty(),
        )
        .unwrap()
    }

    #[test]
    fn multi_hop_channels_are_rejected() {
        let res = ChannelEnd::new(
            State::Init,
            Order::Ordered,
            Counterparty::new("transfer".parse().unwrap(), None),
            vec!["connection-0".parse().unwrap(), "connection-1".parse().unwrap()],
            Version::empty(),
        );
        assert!(matches!(
            res,
            Err(ChannelError::InvalidConnectionHopsLength { actual: 2 })
        ));
    }

    #[test]
    fn closed_channels_reject_mutation() {
        assert!(channel_end(State::Open).verify_not_closed().is_ok());
        assert!(matches!(
            channel_end(State::Closed).verify_not_closed(),
            Err(ChannelError::ChannelClosed)
        ));
    }

    #[test]
    fn state_mismatch_is_reported() {
        assert!(matches!(
            channel_end(State::Init).verify_state_matches(&State::Open),
            Err(ChannelError::InvalidState { .. })
        ));
    }
}

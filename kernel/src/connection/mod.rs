//! Connection handshake types and handlers.
//!
//! A connection binds one light client on each chain into a verified pair.
//! It is established by a four-step handshake (`conn_open_init`,
//! `conn_open_try`, `conn_open_ack`, `conn_open_confirm`) and afterwards
//! carries any number of channels, all of whose proofs are checked through
//! the connection's client and delayed by its `delay_period`.

pub mod delay;
pub mod error;
pub mod events;
pub mod handler;
pub mod msgs;
pub mod version;

use core::time::Duration;
use core::fmt::{Display, Error as FmtError, Formatter};

use crate::commitment::CommitmentPrefix;
use crate::connection::error::ConnectionError;
use crate::connection::version::Version;
use crate::host::identifiers::{ClientId, ConnectionId};
use crate::prelude::*;

/// The lifecycle state of a connection end.
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
    /// The local end has proposed the connection.
    Init,
    /// The counterparty proposed and this end has verified the proposal.
    TryOpen,
    /// Both ends have verified each other; channels may now be opened.
    Open,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::TryOpen => "TRYOPEN",
            Self::Open => "OPEN",
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

/// The counterparty of a connection end: its client of this chain, its
/// connection identifier once known, and the prefix its proofs commit
/// under.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct Counterparty {
    client_id: ClientId,
    /// `None` until the counterparty has assigned its identifier, i.e. on
    /// the `Init` end before `conn_open_ack`.
    pub connection_id: Option<ConnectionId>,
    prefix: CommitmentPrefix,
}

impl Counterparty {
    pub fn new(
        client_id: ClientId,
        connection_id: Option<ConnectionId>,
        prefix: CommitmentPrefix,
    ) -> Self {
        Self {
            client_id,
            connection_id,
            prefix,
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn connection_id(&self) -> Option<&ConnectionId> {
        self.connection_id.as_ref()
    }

    pub fn prefix(&self) -> &CommitmentPrefix {
        &self.prefix
    }
}

/// One end of a connection, as committed to the host store.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct ConnectionEnd {
    state: State,
    client_id: ClientId,
    counterparty: Counterparty,
    versions: Vec<Version>,
    // Stored as nanoseconds so the record has a canonical encoding.
    delay_period_nanos: u64,
}

impl ConnectionEnd {
    pub fn new(
        state: State,
        client_id: ClientId,
        counterparty: Counterparty,
        versions: Vec<Version>,
        delay_period: Duration,
    ) -> Result<Self, ConnectionError> {
        if versions.is_empty() {
            return Err(ConnectionError::EmptyVersions);
        }

        let delay_period_nanos = u64::try_from(delay_period.as_nanos())
            .map_err(|_| ConnectionError::DelayPeriodOverflow)?;

        Ok(Self {
            state,
            client_id,
            counterparty,
            versions,
            delay_period_nanos,
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn counterparty(&self) -> &Counterparty {
        &self.counterparty
    }

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn delay_period(&self) -> Duration {
        Duration::from_nanos(self.delay_period_nanos)
    }

    pub fn state_matches(&self, other: &State) -> bool {
        self.state.eq(other)
    }

    pub fn verify_state_matches(&self, expected: &State) -> Result<(), ConnectionError> {
        if !self.state_matches(expected) {
            return Err(ConnectionError::InvalidState {
                expected: *expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.state_matches(&State::Open)
    }

    pub fn set_state(&mut self, new_state: State) {
        self.state = new_state;
    }

    pub fn set_version(&mut self, new_version: Version) {
        self.versions = vec![new_version];
    }

    pub fn set_counterparty(&mut self, new_counterparty: Counterparty) {
        self.counterparty = new_counterparty;
    }

    /// The canonical byte encoding of this record, i.e. the value the
    /// counterparty proves membership of during the handshake.
    pub fn encode_vec(&self) -> Vec<u8> {
        borsh::to_vec(self).expect("writing a connection end to a Vec never fails")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::version;

    fn counterparty() -> Counterparty {
        Counterparty::new(
            "07-tendermint-0".parse().unwrap(),
            None,
            CommitmentPrefix::from(b"ibc".to_vec()),
        )
    }

    #[test]
    fn connection_end_requires_a_version() {
        let res = ConnectionEnd::new(
            State::Init,
            "07-tendermint-0".parse().unwrap(),
            counterparty(),
            vec![],
            Duration::ZERO,
        );
        assert!(matches!(res, Err(ConnectionError::EmptyVersions)));
    }

    #[test]
    fn state_mismatch_is_reported() {
        let end = ConnectionEnd::new(
            State::Init,
            "07-tendermint-0".parse().unwrap(),
            counterparty(),
            version::compatibles(),
            Duration::from_secs(5),
        )
        .unwrap();

        assert!(end.verify_state_matches(&State::Init).is_ok());
        assert!(matches!(
            end.verify_state_matches(&State::Open),
            Err(ConnectionError::InvalidState { .. })
        ));
        assert_eq!(end.delay_period(), Duration::from_secs(5));
    }

    #[test]
    fn encoding_is_deterministic() {
        let end = ConnectionEnd::new(
            State::Open,
            "07-tendermint-0".parse().unwrap(),
            counterparty(),
            version::compatibles(),
            Duration::ZERO,
        )
        .unwrap();

        assert_eq!(end.encode_vec(), end.clone().encode_vec());
    }
}

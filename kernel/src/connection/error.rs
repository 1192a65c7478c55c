use displaydoc::Display;

use crate::client::error::ClientError;
use crate::client::Height;
use crate::connection::version::Version;
use crate::connection::State;
use crate::host::error::IdentifierError;
use crate::host::identifiers::ConnectionId;
use crate::prelude::*;
use crate::primitives::{Timestamp, TimestampError};

#[derive(Debug, Display)]
pub enum ConnectionError {
    /// connection not found: `{connection_id}`
    ConnectionNotFound { connection_id: ConnectionId },
    /// connection state mismatch: expected `{expected}`, actual `{actual}`
    InvalidState { expected: State, actual: State },
    /// version negotiation failed: no common version
    VersionMismatch,
    /// version `{version}` is not supported
    VersionNotSupported { version: Version },
    /// feature `{feature}` is not supported
    FeatureNotSupported { feature: String },
    /// a connection end must carry at least one version
    EmptyVersions,
    /// delay period exceeds the representable range
    DelayPeriodOverflow,
    /// counterparty has not assigned a connection identifier yet
    MissingCounterpartyConnectionId,
    /// consensus height `{target_height}` is not yet reached by the host chain at `{current_height}`
    InvalidConsensusHeight {
        target_height: Height,
        current_height: Height,
    },
    /// connection end proof verification failed: `{0}`
    VerifyConnectionState(ClientError),
    /// client state verification failed: `{client_error}`
    ClientStateVerificationFailure { client_error: ClientError },
    /// consensus state verification failed at height `{height}`: `{client_error}`
    ConsensusStateVerificationFailure {
        height: Height,
        client_error: ClientError,
    },
    /// connection delay: host time `{current_host_time}` is before the earliest valid time `{earliest_valid_time}`
    NotEnoughTimeElapsed {
        current_host_time: Timestamp,
        earliest_valid_time: Timestamp,
    },
    /// connection delay: host height `{current_host_height}` is before the earliest valid height `{earliest_valid_height}`
    NotEnoughBlocksElapsed {
        current_host_height: Height,
        earliest_valid_height: Height,
    },
    /// timestamp overflow: `{0}`
    TimestampOverflow(TimestampError),
    /// invalid identifier: `{0}`
    InvalidIdentifier(IdentifierError),
}

impl From<IdentifierError> for ConnectionError {
    fn from(e: IdentifierError) -> Self {
        Self::InvalidIdentifier(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::VerifyConnectionState(e)
            | Self::ClientStateVerificationFailure { client_error: e }
            | Self::ConsensusStateVerificationFailure {
                client_error: e, ..
            } => Some(e),
            Self::TimestampOverflow(e) => Some(e),
            Self::InvalidIdentifier(e) => Some(e),
            _ => None,
        }
    }
}

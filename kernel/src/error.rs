//! The top-level error type returned by every handler entrypoint.

use derive_more::From;
use displaydoc::Display;

use crate::channel::error::{ChannelError, PacketError};
use crate::client::error::ClientError;
use crate::connection::error::ConnectionError;
use crate::prelude::*;
use crate::router::RouterError;

/// Aggregates the errors of every protocol layer so that host contexts
/// and handlers can share a single error channel.
#[derive(Debug, Display, From)]
pub enum ProtocolError {
    /// client error: `{0}`
    Client(ClientError),
    /// connection error: `{0}`
    Connection(ConnectionError),
    /// channel error: `{0}`
    Channel(ChannelError),
    /// packet error: `{0}`
    Packet(PacketError),
    /// routing error: `{0}`
    Router(RouterError),
}

// Client implementations frequently call back into the host context and
// need to surface those failures through their own error type.
impl From<ProtocolError> for ClientError {
    fn from(e: ProtocolError) -> Self {
        match e {
            ProtocolError::Client(e) => e,
            _ => ClientError::ClientSpecific {
                description: e.to_string(),
            },
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Client(e) => Some(e),
            Self::Connection(e) => Some(e),
            Self::Channel(e) => Some(e),
            Self::Packet(e) => Some(e),
            Self::Router(e) => Some(e),
        }
    }
}

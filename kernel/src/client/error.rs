//! The client-layer error type.
//!
//! Two variants deserve care from callers: [`ClientError::ConsensusStateNotFound`]
//! is transient: the relayer has not yet installed a consensus state for
//! the proof height, and the same message may succeed after a client update.
//! [`ClientError::InvalidProof`] is a permanent rejection of the message
//! that carried the proof. Conflating the two breaks relayer retry logic.

use displaydoc::Display;

use crate::client::{Height, Status};
use crate::host::error::IdentifierError;
use crate::host::identifiers::ClientId;
use crate::prelude::*;

#[derive(Debug, Display)]
pub enum ClientError {
    /// client `{client_id}` not found
    ClientNotFound { client_id: ClientId },
    /// client is not active; status: `{status}`
    ClientNotActive { status: Status },
    /// consensus state for client `{client_id}` at height `{height}` not found
    ConsensusStateNotFound { client_id: ClientId, height: Height },
    /// invalid proof: `{description}`
    InvalidProof { description: String },
    /// proof height `{proof_height}` exceeds latest client height `{latest_height}`
    InsufficientProofHeight {
        proof_height: Height,
        latest_height: Height,
    },
    /// height cannot be zero
    ZeroHeight,
    /// invalid client state: `{description}`
    InvalidClientState { description: String },
    /// invalid client message: `{description}`
    InvalidClientMessage { description: String },
    /// invalid identifier: `{0}`
    InvalidIdentifier(IdentifierError),
    /// client-specific error: `{description}`
    ClientSpecific { description: String },
}

impl From<IdentifierError> for ClientError {
    fn from(err: IdentifierError) -> Self {
        Self::InvalidIdentifier(err)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::InvalidIdentifier(e) => Some(e),
            _ => None,
        }
    }
}

use core::fmt::{Display, Error as FmtError, Formatter};

use crate::client::error::ClientError;

/// Status of a client, as reported by the concrete light-client
/// implementation. Only `Active` clients may verify proofs or take part in
/// handshakes and packet flow.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// The client is up to date and operational.
    Active,
    /// Misbehaviour was proven; the client is permanently disabled short of
    /// an out-of-band recovery.
    Frozen,
    /// The client's latest consensus state is outside its trusting period.
    Expired,
}

impl Status {
    pub fn is_active(&self) -> bool {
        *self == Status::Active
    }

    pub fn is_frozen(&self) -> bool {
        *self == Status::Frozen
    }

    /// Errors unless the status is `Active`.
    pub fn verify_is_active(&self) -> Result<(), ClientError> {
        match self {
            Self::Active => Ok(()),
            &status => Err(ClientError::ClientNotActive { status }),
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Frozen => write!(f, "FROZEN"),
            Self::Expired => write!(f, "EXPIRED"),
        }
    }
}

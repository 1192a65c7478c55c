//! Packet timeout bounds.
//!
//! A packet carries a height bound and a timestamp bound on the
//! destination chain; either may be unset, but not both. A bound is
//! inclusive: the packet has timed out once the destination reaches the
//! bound exactly.

use core::fmt::{Display, Error as FmtError, Formatter};

use crate::client::Height;
use crate::primitives::Timestamp;

/// The height on the destination chain past which a packet may no longer
/// be received.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    borsh::BorshSerialize,
    borsh::BorshDeserialize,
)]
pub enum TimeoutHeight {
    #[default]
    Never,
    At(Height),
}

impl TimeoutHeight {
    pub fn is_set(&self) -> bool {
        matches!(self, Self::At(_))
    }

    /// Whether a chain at `height` is past this bound.
    pub fn has_expired(&self, height: Height) -> bool {
        match self {
            Self::Never => false,
            Self::At(timeout_height) => height >= *timeout_height,
        }
    }

    /// The revision number committed for an unset bound is zero.
    pub fn commitment_revision_number(&self) -> u64 {
        match self {
            Self::Never => 0,
            Self::At(height) => height.revision_number(),
        }
    }

    pub fn commitment_revision_height(&self) -> u64 {
        match self {
            Self::Never => 0,
            Self::At(height) => height.revision_height(),
        }
    }
}

impl From<Height> for TimeoutHeight {
    fn from(height: Height) -> Self {
        Self::At(height)
    }
}

impl Display for TimeoutHeight {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::Never => write!(f, "no timeout height"),
            Self::At(height) => write!(f, "{height}"),
        }
    }
}

/// The destination-chain timestamp past which a packet may no longer be
/// received.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    borsh::BorshSerialize,
    borsh::BorshDeserialize,
)]
pub enum TimeoutTimestamp {
    #[default]
    Never,
    At(Timestamp),
}

impl TimeoutTimestamp {
    pub fn is_set(&self) -> bool {
        matches!(self, Self::At(_))
    }

    /// Whether a chain whose clock reads `timestamp` is past this bound.
    pub fn has_expired(&self, timestamp: &Timestamp) -> bool {
        match self {
            Self::Never => false,
            Self::At(timeout_timestamp) => timestamp >= timeout_timestamp,
        }
    }

    /// The nanosecond value committed for an unset bound is zero.
    pub fn nanoseconds(&self) -> u64 {
        match self {
            Self::Never => 0,
            Self::At(timestamp) => timestamp.nanoseconds(),
        }
    }
}

impl From<Timestamp> for TimeoutTimestamp {
    fn from(timestamp: Timestamp) -> Self {
        Self::At(timestamp)
    }
}

impl Display for TimeoutTimestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match self {
            Self::Never => write!(f, "no timeout timestamp"),
            Self::At(timestamp) => write!(f, "{timestamp}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn height_bound_is_inclusive() {
        let bound = TimeoutHeight::from(Height::new(0, 10).unwrap());
        assert!(!bound.has_expired(Height::new(0, 9).unwrap()));
        assert!(bound.has_expired(Height::new(0, 10).unwrap()));
        assert!(bound.has_expired(Height::new(0, 11).unwrap()));
    }

    #[test]
    fn timestamp_bound_is_inclusive() {
        let bound = TimeoutTimestamp::from(Timestamp::from_nanoseconds(100));
        assert!(!bound.has_expired(&Timestamp::from_nanoseconds(99)));
        assert!(bound.has_expired(&Timestamp::from_nanoseconds(100)));
    }

    #[test]
    fn never_never_expires() {
        assert!(!TimeoutHeight::Never.has_expired(Height::new(u64::MAX, u64::MAX).unwrap()));
        assert!(!TimeoutTimestamp::Never.has_expired(&Timestamp::from_nanoseconds(u64::MAX)));
    }
}

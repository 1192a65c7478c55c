//! Primitive types shared by every protocol layer.

use core::fmt::{Display, Error as FmtError, Formatter};
use core::ops::Add;
use core::time::Duration;

use displaydoc::Display as DisplayDoc;

use crate::prelude::*;

/// A chain timestamp, expressed as nanoseconds since the Unix epoch.
///
/// Host chains expose their block time through this type; packet timeout
/// bounds are compared against it. The protocol never produces timestamps,
/// it only reads and compares them.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, borsh::BorshSerialize, borsh::BorshDeserialize,
)]
pub struct Timestamp {
    nanoseconds: u64,
}

impl Timestamp {
    /// Builds a timestamp from the given number of nanoseconds since the
    /// Unix epoch.
    pub fn from_nanoseconds(nanoseconds: u64) -> Self {
        Self { nanoseconds }
    }

    /// The timestamp as nanoseconds since the Unix epoch.
    pub fn nanoseconds(&self) -> u64 {
        self.nanoseconds
    }
}

impl Add<Duration> for Timestamp {
    type Output = Result<Timestamp, TimestampError>;

    fn add(self, rhs: Duration) -> Self::Output {
        let nanos = u64::try_from(rhs.as_nanos())
            .ok()
            .and_then(|d| self.nanoseconds.checked_add(d))
            .ok_or(TimestampError::Overflow)?;
        Ok(Self { nanoseconds: nanos })
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.nanoseconds)
    }
}

/// Errors arising from timestamp arithmetic.
#[derive(Debug, DisplayDoc, PartialEq, Eq)]
pub enum TimestampError {
    /// timestamp overflowed
    Overflow,
}

#[cfg(feature = "std")]
impl std::error::Error for TimestampError {}

/// The address that signed a protocol message.
///
/// Opaque to the kernel; the host decides what constitutes a valid signer
/// via [`validate_message_signer`](crate::host::ValidationContext::validate_message_signer).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    derive_more::Display,
    derive_more::From,
    derive_more::Into,
)]
pub struct Signer(String);

impl Signer {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Signer {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for Signer {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_add_duration() {
        let t = Timestamp::from_nanoseconds(100);
        let later = (t + Duration::from_nanos(42)).unwrap();
        assert_eq!(later.nanoseconds(), 142);
    }

    #[test]
    fn timestamp_add_overflows() {
        let t = Timestamp::from_nanoseconds(u64::MAX);
        assert_eq!(t + Duration::from_nanos(1), Err(TimestampError::Overflow));
    }
}

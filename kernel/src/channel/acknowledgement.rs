//! The opaque acknowledgement an application returns on packet receipt.

use crate::channel::error::PacketError;
use crate::prelude::*;

/// Application-defined acknowledgement bytes. Guaranteed non-empty: an
/// empty acknowledgement would commit to the same value as "no
/// acknowledgement written".
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Acknowledgement(Vec<u8>);

impl Acknowledgement {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Acknowledgement {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for Acknowledgement {
    type Error = PacketError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            Err(PacketError::InvalidAcknowledgement)
        } else {
            Ok(Self(bytes))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_acknowledgement_is_rejected() {
        assert!(Acknowledgement::try_from(Vec::new()).is_err());
        assert!(Acknowledgement::try_from(b"ok".to_vec()).is_ok());
    }
}

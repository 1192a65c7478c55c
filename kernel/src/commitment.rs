//! Commitment types: the root a light client tracks, the store prefix of a
//! counterparty, and opaque proof bytes.

use displaydoc::Display;

use crate::prelude::*;

/// The root of a chain's provable store at some height, as tracked by a
/// light client. All membership and non-membership proofs are checked
/// against a root.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct CommitmentRoot(Vec<u8>);

impl CommitmentRoot {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for CommitmentRoot {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl core::fmt::Debug for CommitmentRoot {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(f, "CommitmentRoot({})", hex::encode(&self.0))
    }
}

/// The key prefix under which a chain stores its protocol state, advertised
/// to counterparties during the connection handshake so their proofs target
/// the right subtree.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct CommitmentPrefix(Vec<u8>);

impl CommitmentPrefix {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for CommitmentPrefix {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

/// Opaque proof bytes produced by a counterparty chain and interpreted only
/// by the light client registered for it. Guaranteed non-empty.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, PartialEq, Eq)]
pub struct CommitmentProofBytes(Vec<u8>);

impl CommitmentProofBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl TryFrom<Vec<u8>> for CommitmentProofBytes {
    type Error = CommitmentError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            Err(CommitmentError::EmptyProof)
        } else {
            Ok(Self(bytes))
        }
    }
}

impl core::fmt::Debug for CommitmentProofBytes {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(f, "CommitmentProofBytes({})", hex::encode(&self.0))
    }
}

#[derive(Debug, Display, PartialEq, Eq)]
pub enum CommitmentError {
    /// proof cannot be empty
    EmptyProof,
    /// commitment root cannot be empty
    EmptyRoot,
}

#[cfg(feature = "std")]
impl std::error::Error for CommitmentError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_proof_is_rejected() {
        assert_eq!(
            CommitmentProofBytes::try_from(Vec::new()),
            Err(CommitmentError::EmptyProof)
        );
        assert!(CommitmentProofBytes::try_from(vec![1u8]).is_ok());
    }
}

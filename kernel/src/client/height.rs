//! The revision-aware chain height.

use core::cmp::Ordering;

use crate::client::error::ClientError;
use crate::prelude::*;

/// Height of a chain: the number of blocks since genesis within a revision,
/// plus the revision number itself (bumped on hard upgrades). Heights order
/// lexicographically by (revision_number, revision_height).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, PartialEq, Eq, Hash, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct Height {
    revision_number: u64,
    revision_height: u64,
}

impl Height {
    pub fn new(revision_number: u64, revision_height: u64) -> Result<Self, ClientError> {
        if revision_height == 0 {
            return Err(ClientError::ZeroHeight);
        }

        Ok(Self {
            revision_number,
            revision_height,
        })
    }

    /// The smallest valid height of a revision.
    pub fn min(revision_number: u64) -> Self {
        Self {
            revision_number,
            revision_height: 1,
        }
    }

    pub fn revision_number(&self) -> u64 {
        self.revision_number
    }

    pub fn revision_height(&self) -> u64 {
        self.revision_height
    }

    pub fn add(&self, delta: u64) -> Height {
        Height {
            revision_number: self.revision_number,
            revision_height: self.revision_height + delta,
        }
    }

    pub fn increment(&self) -> Height {
        self.add(1)
    }
}

impl PartialOrd for Height {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Height {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.revision_number, self.revision_height)
            .cmp(&(other.revision_number, other.revision_height))
    }
}

impl core::fmt::Debug for Height {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        f.debug_struct("Height")
            .field("revision", &self.revision_number)
            .field("height", &self.revision_height)
            .finish()
    }
}

impl core::fmt::Display for Height {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_height_is_rejected() {
        assert!(Height::new(0, 0).is_err());
        assert!(Height::new(0, 1).is_ok());
    }

    #[test]
    fn revision_number_dominates_ordering() {
        let a = Height::new(1, 100).unwrap();
        let b = Height::new(2, 1).unwrap();
        assert!(a < b);
        assert!(a < a.increment());
    }
}

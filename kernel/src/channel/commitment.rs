//! Packet and acknowledgement commitments.
//!
//! The store never holds packet data or acknowledgements directly, only
//! fixed-size hashes of them. The layouts here are consensus-critical:
//! both ends must compute bit-identical commitments or every proof fails.

use sha2::{Digest, Sha256};

use crate::channel::acknowledgement::Acknowledgement;
use crate::channel::timeout::{TimeoutHeight, TimeoutTimestamp};
use crate::prelude::*;

/// The hash committed under a packet's commitment path while the packet is
/// in flight.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct PacketCommitment(Vec<u8>);

impl PacketCommitment {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for PacketCommitment {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl core::fmt::Debug for PacketCommitment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(f, "PacketCommitment({})", hex::encode(&self.0))
    }
}

/// The hash committed under the acknowledgement path once a packet has
/// been received and acknowledged.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct AcknowledgementCommitment(Vec<u8>);

impl AcknowledgementCommitment {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for AcknowledgementCommitment {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl core::fmt::Debug for AcknowledgementCommitment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(f, "AcknowledgementCommitment({})", hex::encode(&self.0))
    }
}

fn hash(data: impl AsRef<[u8]>) -> Vec<u8> {
    Sha256::digest(data).to_vec()
}

/// Commitment layout, big-endian throughout:
///
/// `sha256(timeout_timestamp_nanos (8) || timeout_revision_number (8) ||
/// timeout_revision_height (8) || sha256(data))`
///
/// Unset timeout bounds contribute zeroes.
pub fn compute_packet_commitment(
    packet_data: &[u8],
    timeout_height: &TimeoutHeight,
    timeout_timestamp: &TimeoutTimestamp,
) -> PacketCommitment {
    let mut hash_input = [0; 8 * 3 + 32];

    hash_input[..8].copy_from_slice(&timeout_timestamp.nanoseconds().to_be_bytes());
    hash_input[8..16].copy_from_slice(&timeout_height.commitment_revision_number().to_be_bytes());
    hash_input[16..24].copy_from_slice(&timeout_height.commitment_revision_height().to_be_bytes());
    hash_input[24..].copy_from_slice(&hash(packet_data));

    hash(hash_input).into()
}

/// `sha256(ack)`.
pub fn compute_ack_commitment(ack: &Acknowledgement) -> AcknowledgementCommitment {
    hash(ack.as_ref()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Height;
    use crate::primitives::Timestamp;

    #[test]
    fn packet_commitment_is_stable() {
        let commitment = || {
            compute_packet_commitment(
                b"data",
                &TimeoutHeight::At(Height::new(1, 20).unwrap()),
                &TimeoutTimestamp::At(Timestamp::from_nanoseconds(1_000)),
            )
        };
        assert_eq!(commitment(), commitment());
        assert_eq!(commitment().as_bytes().len(), 32);
    }

    #[test]
    fn timeout_bounds_are_part_of_the_commitment() {
        let base = compute_packet_commitment(
            b"data",
            &TimeoutHeight::At(Height::new(1, 20).unwrap()),
            &TimeoutTimestamp::Never,
        );
        let other_height = compute_packet_commitment(
            b"data",
            &TimeoutHeight::At(Height::new(1, 21).unwrap()),
            &TimeoutTimestamp::Never,
        );
        let other_ts = compute_packet_commitment(
            b"data",
            &TimeoutHeight::At(Height::new(1, 20).unwrap()),
            &TimeoutTimestamp::At(Timestamp::from_nanoseconds(1)),
        );
        assert_ne!(base, other_height);
        assert_ne!(base, other_ts);
    }

    #[test]
    fn ack_commitment_is_the_sha256_of_the_ack() {
        let ack = Acknowledgement::try_from(b"result".to_vec()).unwrap();
        let commitment = compute_ack_commitment(&ack);
        assert_eq!(
            commitment.as_bytes(),
            Sha256::digest(b"result").as_slice()
        );
    }
}

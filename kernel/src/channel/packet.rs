//! The packet and its receipt.

use crate::channel::timeout::{TimeoutHeight, TimeoutTimestamp};
use crate::client::Height;
use crate::host::identifiers::{ChannelId, PortId, Sequence};
use crate::prelude::*;
use crate::primitives::Timestamp;

/// A datagram in flight from chain A to chain B.
///
/// The sending chain commits to the hash of (data, timeout bounds) under
/// the packet's sequence; everything else a handler needs travels with the
/// packet itself, relayed by an untrusted party and checked against that
/// commitment.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct Packet {
    pub seq_on_a: Sequence,
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub data: Vec<u8>,
    pub timeout_height_on_b: TimeoutHeight,
    pub timeout_timestamp_on_b: TimeoutTimestamp,
}

impl Packet {
    /// Whether the packet can no longer be received on chain B, judged at
    /// the given height and timestamp of B.
    pub fn timed_out(&self, dst_chain_ts: &Timestamp, dst_chain_height: Height) -> bool {
        self.timeout_height_on_b.has_expired(dst_chain_height)
            || self.timeout_timestamp_on_b.has_expired(dst_chain_ts)
    }
}

/// Marker stored under the receipt path of an unordered channel when a
/// packet is first received. Its only information is its presence.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub enum Receipt {
    Ok,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(height: TimeoutHeight, timestamp: TimeoutTimestamp) -> Packet {
        Packet {
            seq_on_a: 1.into(),
            port_id_on_a: "transfer".parse().unwrap(),
            chan_id_on_a: "channel-0".parse().unwrap(),
            port_id_on_b: "transfer".parse().unwrap(),
            chan_id_on_b: "channel-1".parse().unwrap(),
            data: b"ping".to_vec(),
            timeout_height_on_b: height,
            timeout_timestamp_on_b: timestamp,
        }
    }

    #[test]
    fn either_bound_times_the_packet_out() {
        let h10 = Height::new(0, 10).unwrap();
        let t100 = Timestamp::from_nanoseconds(100);

        let by_height = packet(h10.into(), TimeoutTimestamp::Never);
        assert!(by_height.timed_out(&Timestamp::from_nanoseconds(0), h10));
        assert!(!by_height.timed_out(&Timestamp::from_nanoseconds(u64::MAX), Height::new(0, 9).unwrap()));

        let by_time = packet(TimeoutHeight::Never, t100.into());
        assert!(by_time.timed_out(&t100, Height::new(0, 1).unwrap()));
        assert!(!by_time.timed_out(&Timestamp::from_nanoseconds(99), Height::new(0, 1).unwrap()));
    }
}

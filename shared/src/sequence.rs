use crate::types::{OwnerEpoch, Sequence};

/// Half the sequence space. A sequence less than this far ahead of another
/// counts as newer, which keeps the order stable across the u16 wrap.
const HALF_RANGE: Sequence = 1 << 15;

/// Ordering key of a snapshot: the owner epoch it was produced under, then
/// its wrapping sequence within that epoch.
///
/// A later epoch always wins, whatever its sequence, so snapshots from a
/// previous owner that arrive late can never overwrite the new owner's state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotStamp {
    pub epoch: OwnerEpoch,
    pub sequence: Sequence,
}

impl SnapshotStamp {
    pub fn new(epoch: OwnerEpoch, sequence: Sequence) -> Self {
        Self { epoch, sequence }
    }

    pub fn is_newer_than(&self, other: &SnapshotStamp) -> bool {
        if self.epoch != other.epoch {
            return self.epoch > other.epoch;
        }
        let ahead = self.sequence.wrapping_sub(other.sequence);
        ahead != 0 && ahead < HALF_RANGE
    }
}

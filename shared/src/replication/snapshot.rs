use crate::{
    entity::net_entity::NetEntity,
    replication::continuous_state::ContinuousState,
    sequence::SnapshotStamp,
    types::{OwnerEpoch, Sequence, Tick},
};

/// The continuous state of one entity as of an owner tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub entity: NetEntity,
    pub epoch: OwnerEpoch,
    pub sequence: Sequence,
    pub tick: Tick,
    pub state: ContinuousState,
}

impl Snapshot {
    pub fn stamp(&self) -> SnapshotStamp {
        SnapshotStamp::new(self.epoch, self.sequence)
    }
}

/// Allocates snapshot sequences for one owned entity.
pub struct SnapshotSender {
    entity: NetEntity,
    next_sequence: Sequence,
}

impl SnapshotSender {
    /// Continue the entity's stream after the last sequence this peer applied,
    /// so a takeover at the same epoch is still ordered after the old owner.
    pub fn new(entity: NetEntity, last_applied: Option<Sequence>) -> Self {
        Self {
            entity,
            next_sequence: last_applied.map_or(0, |sequence| sequence.wrapping_add(1)),
        }
    }

    pub fn entity(&self) -> NetEntity {
        self.entity
    }

    pub fn next_snapshot(&mut self, epoch: OwnerEpoch, tick: Tick, state: ContinuousState) -> Snapshot {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        Snapshot {
            entity: self.entity,
            epoch,
            sequence,
            tick,
            state,
        }
    }
}

/// Accepts snapshots for one remote entity in stamp order.
#[derive(Default)]
pub struct SnapshotReceiver {
    last_applied: Option<SnapshotStamp>,
}

impl SnapshotReceiver {
    pub fn new() -> Self {
        Self { last_applied: None }
    }

    /// Returns true and records the stamp if the snapshot is newer than
    /// anything applied so far. Older or duplicate snapshots are dropped.
    pub fn accept(&mut self, snapshot: &Snapshot) -> bool {
        let stamp = snapshot.stamp();
        if let Some(last) = &self.last_applied {
            if !stamp.is_newer_than(last) {
                return false;
            }
        }
        self.last_applied = Some(stamp);
        true
    }

    /// Record a snapshot this peer produced itself, so that a later hand-back
    /// keeps the ordering.
    pub fn record_sent(&mut self, snapshot: &Snapshot) {
        self.last_applied = Some(snapshot.stamp());
    }

    pub fn last_sequence(&self) -> Option<Sequence> {
        self.last_applied.map(|stamp| stamp.sequence)
    }

    pub fn last_stamp(&self) -> Option<SnapshotStamp> {
        self.last_applied
    }
}

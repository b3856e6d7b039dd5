use log::debug;

use crate::{entity::net_entity::NetEntity, types::PeerId};

/// A payload that replaces every earlier payload for the same entity in the
/// same `channel`, unless one of those ranks higher.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferSlot {
    pub channel: &'static str,
    pub rank: u32,
}

impl BufferSlot {
    pub fn new(channel: &'static str, rank: u32) -> Self {
        Self { channel, rank }
    }
}

struct BufferedEntry {
    entity: NetEntity,
    origin: PeerId,
    slot: Option<BufferSlot>,
    payload: Vec<u8>,
}

/// Reliable-buffered payloads retained for late joiners, in the order the
/// relay first delivered them.
pub struct BufferedEventLog {
    entries: Vec<BufferedEntry>,
}

impl BufferedEventLog {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entity: NetEntity, origin: PeerId, payload: Vec<u8>) {
        self.entries.push(BufferedEntry {
            entity,
            origin,
            slot: None,
            payload,
        });
    }

    /// Retain `payload` in place of the earlier payloads it supersedes.
    /// Returns false, retaining nothing, if a higher ranked payload for the
    /// same slot is already retained.
    pub fn push_in_slot(
        &mut self,
        entity: NetEntity,
        origin: PeerId,
        slot: BufferSlot,
        payload: Vec<u8>,
    ) -> bool {
        let same_slot = |entry: &BufferedEntry| {
            entry.entity == entity
                && entry
                    .slot
                    .is_some_and(|retained| retained.channel == slot.channel)
        };
        let outranked = self.entries.iter().any(|entry| {
            same_slot(entry) && entry.slot.is_some_and(|retained| retained.rank > slot.rank)
        });
        if outranked {
            debug!("ignoring outranked {} payload for {}", slot.channel, entity);
            return false;
        }

        self.entries.retain(|entry| !same_slot(entry));
        self.entries.push(BufferedEntry {
            entity,
            origin,
            slot: Some(slot),
            payload,
        });
        true
    }

    /// Remove every retained payload about `entity`. Returns how many were
    /// dropped.
    pub fn purge(&mut self, entity: &NetEntity) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.entity != *entity);
        let purged = before - self.entries.len();
        if purged > 0 {
            debug!("purged {} buffered payloads for {}", purged, entity);
        }
        purged
    }

    /// Retained payloads with the peer that sent each, oldest first.
    pub fn replay(&self) -> impl Iterator<Item = (PeerId, &[u8])> {
        self.entries
            .iter()
            .map(|entry| (entry.origin, entry.payload.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for BufferedEventLog {
    fn default() -> Self {
        Self::new()
    }
}

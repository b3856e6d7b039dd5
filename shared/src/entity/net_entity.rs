use std::fmt;

use bitcode::{Decode, Encode};

use crate::types::PeerId;

const SPAWNER_SHIFT: u32 = 32;
const COUNTER_MASK: u64 = (1 << SPAWNER_SHIFT) - 1;

/// Global network identity of a replicated entity, stable for its lifetime.
///
/// Scene entities live in the low 2^32 range. Entities spawned at runtime
/// carry the spawning peer in the high bits so ids never collide without any
/// coordination between peers.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Encode, Decode)]
pub struct NetEntity(u64);

impl NetEntity {
    pub const fn scene(index: u32) -> Self {
        NetEntity(index as u64)
    }

    pub fn spawned(spawner: PeerId, counter: u32) -> Self {
        let spawner = u64::from(spawner.to_u16()) + 1;
        NetEntity((spawner << SPAWNER_SHIFT) | u64::from(counter))
    }

    pub fn from_u64(value: u64) -> Self {
        NetEntity(value)
    }

    pub fn to_u64(&self) -> u64 {
        self.0
    }

    pub fn is_scene(&self) -> bool {
        self.0 >> SPAWNER_SHIFT == 0
    }

    /// The peer that allocated this id, for runtime-spawned entities.
    pub fn spawner(&self) -> Option<PeerId> {
        let high = self.0 >> SPAWNER_SHIFT;
        if high == 0 {
            return None;
        }
        u16::try_from(high - 1).ok().map(PeerId::new)
    }

    pub fn counter(&self) -> u32 {
        (self.0 & COUNTER_MASK) as u32
    }
}

impl fmt::Display for NetEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.spawner() {
            Some(spawner) => write!(f, "entity({}:{})", spawner.to_u16(), self.counter()),
            None => write!(f, "entity(scene:{})", self.counter()),
        }
    }
}

/// Hands out ids for entities the local peer spawns at runtime.
pub struct NetEntityAllocator {
    spawner: PeerId,
    next_counter: u32,
}

impl NetEntityAllocator {
    pub fn new(spawner: PeerId) -> Self {
        Self {
            spawner,
            next_counter: 0,
        }
    }

    pub fn allocate(&mut self) -> NetEntity {
        let entity = NetEntity::spawned(self.spawner, self.next_counter);
        self.next_counter = self.next_counter.wrapping_add(1);
        entity
    }
}

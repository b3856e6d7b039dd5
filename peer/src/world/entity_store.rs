use std::collections::BTreeMap;

use catacomb_shared::{EntityError, EntityKind, NetEntity};

use crate::world::entity_record::EntityRecord;

/// Every entity this peer knows about, iterated in id order so that
/// coordinator decisions are the same on every peer.
pub struct EntityStore {
    records: BTreeMap<NetEntity, EntityRecord>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    pub fn try_insert(&mut self, entity: NetEntity, record: EntityRecord) -> Result<(), EntityError> {
        if self.records.contains_key(&entity) {
            return Err(EntityError::EntityAlreadyExists { entity });
        }
        self.records.insert(entity, record);
        Ok(())
    }

    pub fn remove(&mut self, entity: &NetEntity) -> Option<EntityRecord> {
        self.records.remove(entity)
    }

    pub fn contains(&self, entity: &NetEntity) -> bool {
        self.records.contains_key(entity)
    }

    pub fn get(&self, entity: &NetEntity) -> Option<&EntityRecord> {
        self.records.get(entity)
    }

    pub fn get_mut(&mut self, entity: &NetEntity) -> Option<&mut EntityRecord> {
        self.records.get_mut(entity)
    }

    pub fn try_get(&self, entity: &NetEntity, operation: &'static str) -> Result<&EntityRecord, EntityError> {
        self.records
            .get(entity)
            .ok_or(EntityError::EntityNotFound {
                entity: *entity,
                operation,
            })
    }

    pub fn try_get_mut(
        &mut self,
        entity: &NetEntity,
        operation: &'static str,
    ) -> Result<&mut EntityRecord, EntityError> {
        self.records
            .get_mut(entity)
            .ok_or(EntityError::EntityNotFound {
                entity: *entity,
                operation,
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NetEntity, &EntityRecord)> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&NetEntity, &mut EntityRecord)> {
        self.records.iter_mut()
    }

    pub fn entities_of_kind(&self, kind: EntityKind) -> Vec<NetEntity> {
        self.records
            .iter()
            .filter(|(_, record)| record.kind() == kind)
            .map(|(entity, _)| *entity)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new()
    }
}

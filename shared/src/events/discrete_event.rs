use bitcode::{Decode, Encode};

use crate::{entity::net_entity::NetEntity, events::transition::Transition, types::PeerId};

/// A transition as broadcast by the entity's owner.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct DiscreteEvent {
    pub entity: NetEntity,
    pub transition: Transition,
    pub origin: PeerId,
}

impl DiscreteEvent {
    pub fn new(entity: NetEntity, transition: Transition, origin: PeerId) -> Self {
        Self {
            entity,
            transition,
            origin,
        }
    }

    pub fn is_buffered(&self) -> bool {
        self.transition.is_buffered()
    }
}

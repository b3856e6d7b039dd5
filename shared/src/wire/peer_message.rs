use crate::{
    entity::{entity_kind::EntityKind, net_entity::NetEntity},
    events::{BufferSlot, DiscreteEvent, DiscreteState},
    ownership::{OwnerChange, OwnershipDenial},
    replication::{ContinuousState, Snapshot},
    transport::Delivery,
    types::PeerId,
    wire::{encoded::EncodedMessage, error::WireError},
};

/// Everything needed to create an entity on a peer that has never seen it.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnRecord {
    pub entity: NetEntity,
    pub kind: EntityKind,
    pub owner: Option<PeerId>,
    pub discrete: DiscreteState,
    pub continuous: ContinuousState,
}

/// The single message type exchanged between peers.
#[derive(Clone, Debug, PartialEq)]
pub enum PeerMessage {
    Snapshot(Snapshot),
    Event(DiscreteEvent),
    RequestOwnership { entity: NetEntity },
    OwnerChanged(OwnerChange),
    OwnershipDenied(OwnershipDenial),
    Spawn(SpawnRecord),
    Despawn { entity: NetEntity },
}

impl PeerMessage {
    pub fn to_bytes(&self) -> Vec<u8> {
        bitcode::encode(&EncodedMessage::from(self))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.is_empty() {
            return Err(WireError::EmptyPayload);
        }
        bitcode::decode::<EncodedMessage>(bytes)
            .map(PeerMessage::from)
            .map_err(|error| WireError::Malformed {
                length: bytes.len(),
                reason: error.to_string(),
            })
    }

    /// The entity this message is about.
    pub fn entity(&self) -> NetEntity {
        match self {
            PeerMessage::Snapshot(snapshot) => snapshot.entity,
            PeerMessage::Event(event) => event.entity,
            PeerMessage::RequestOwnership { entity } => *entity,
            PeerMessage::OwnerChanged(change) => change.entity,
            PeerMessage::OwnershipDenied(denial) => denial.entity,
            PeerMessage::Spawn(record) => record.entity,
            PeerMessage::Despawn { entity } => *entity,
        }
    }

    pub fn delivery(&self) -> Delivery {
        match self {
            PeerMessage::Snapshot(_) => Delivery::Unreliable,
            PeerMessage::Event(event) if event.is_buffered() => Delivery::ReliableBuffered,
            PeerMessage::Event(_) => Delivery::Reliable,
            PeerMessage::RequestOwnership { .. } | PeerMessage::OwnershipDenied(_) => {
                Delivery::Reliable
            }
            PeerMessage::OwnerChanged(_) | PeerMessage::Spawn(_) | PeerMessage::Despawn { .. } => {
                Delivery::ReliableBuffered
            }
        }
    }

    /// The slot a buffered message occupies in a relay's log, if it
    /// supersedes earlier messages about the same entity.
    pub fn buffer_slot(&self) -> Option<BufferSlot> {
        match self {
            PeerMessage::OwnerChanged(change) => Some(BufferSlot::new("owner", change.epoch)),
            PeerMessage::Event(event) => event.transition.buffer_slot(),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PeerMessage::Snapshot(_) => "Snapshot",
            PeerMessage::Event(_) => "Event",
            PeerMessage::RequestOwnership { .. } => "RequestOwnership",
            PeerMessage::OwnerChanged(_) => "OwnerChanged",
            PeerMessage::OwnershipDenied(_) => "OwnershipDenied",
            PeerMessage::Spawn(_) => "Spawn",
            PeerMessage::Despawn { .. } => "Despawn",
        }
    }
}

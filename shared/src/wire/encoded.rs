//! Encodable mirrors of the message types that carry `glam` transforms.
//! Transforms travel as plain float arrays; everything else is encoded as is.

use bitcode::{Decode, Encode};

use crate::{
    entity::{entity_kind::EntityKind, net_entity::NetEntity},
    events::{DiscreteEvent, DiscreteState},
    math::{Quat, Vec3},
    ownership::{OwnerChange, OwnershipDenial},
    replication::{ContinuousChannels, ContinuousState, Snapshot},
    types::{OwnerEpoch, PeerId, Sequence, Tick},
    wire::peer_message::{PeerMessage, SpawnRecord},
};

#[derive(Encode, Decode)]
pub(crate) struct EncodedState {
    position: [f32; 3],
    rotation: [f32; 4],
    channels: ContinuousChannels,
}

impl From<&ContinuousState> for EncodedState {
    fn from(state: &ContinuousState) -> Self {
        Self {
            position: state.position.to_array(),
            rotation: state.rotation.to_array(),
            channels: state.channels,
        }
    }
}

impl From<EncodedState> for ContinuousState {
    fn from(state: EncodedState) -> Self {
        Self {
            position: Vec3::from_array(state.position),
            rotation: Quat::from_array(state.rotation),
            channels: state.channels,
        }
    }
}

#[derive(Encode, Decode)]
pub(crate) struct EncodedSnapshot {
    entity: NetEntity,
    epoch: OwnerEpoch,
    sequence: Sequence,
    tick: Tick,
    state: EncodedState,
}

#[derive(Encode, Decode)]
pub(crate) struct EncodedSpawn {
    entity: NetEntity,
    kind: EntityKind,
    owner: Option<PeerId>,
    discrete: DiscreteState,
    continuous: EncodedState,
}

#[derive(Encode, Decode)]
pub(crate) enum EncodedMessage {
    Snapshot(EncodedSnapshot),
    Event(DiscreteEvent),
    RequestOwnership { entity: NetEntity },
    OwnerChanged(OwnerChange),
    OwnershipDenied(OwnershipDenial),
    Spawn(EncodedSpawn),
    Despawn { entity: NetEntity },
}

impl From<&PeerMessage> for EncodedMessage {
    fn from(message: &PeerMessage) -> Self {
        match message {
            PeerMessage::Snapshot(snapshot) => EncodedMessage::Snapshot(EncodedSnapshot {
                entity: snapshot.entity,
                epoch: snapshot.epoch,
                sequence: snapshot.sequence,
                tick: snapshot.tick,
                state: EncodedState::from(&snapshot.state),
            }),
            PeerMessage::Event(event) => EncodedMessage::Event(event.clone()),
            PeerMessage::RequestOwnership { entity } => {
                EncodedMessage::RequestOwnership { entity: *entity }
            }
            PeerMessage::OwnerChanged(change) => EncodedMessage::OwnerChanged(*change),
            PeerMessage::OwnershipDenied(denial) => EncodedMessage::OwnershipDenied(*denial),
            PeerMessage::Spawn(record) => EncodedMessage::Spawn(EncodedSpawn {
                entity: record.entity,
                kind: record.kind,
                owner: record.owner,
                discrete: record.discrete.clone(),
                continuous: EncodedState::from(&record.continuous),
            }),
            PeerMessage::Despawn { entity } => EncodedMessage::Despawn { entity: *entity },
        }
    }
}

impl From<EncodedMessage> for PeerMessage {
    fn from(message: EncodedMessage) -> Self {
        match message {
            EncodedMessage::Snapshot(snapshot) => PeerMessage::Snapshot(Snapshot {
                entity: snapshot.entity,
                epoch: snapshot.epoch,
                sequence: snapshot.sequence,
                tick: snapshot.tick,
                state: snapshot.state.into(),
            }),
            EncodedMessage::Event(event) => PeerMessage::Event(event),
            EncodedMessage::RequestOwnership { entity } => PeerMessage::RequestOwnership { entity },
            EncodedMessage::OwnerChanged(change) => PeerMessage::OwnerChanged(change),
            EncodedMessage::OwnershipDenied(denial) => PeerMessage::OwnershipDenied(denial),
            EncodedMessage::Spawn(record) => PeerMessage::Spawn(SpawnRecord {
                entity: record.entity,
                kind: record.kind,
                owner: record.owner,
                discrete: record.discrete,
                continuous: record.continuous.into(),
            }),
            EncodedMessage::Despawn { entity } => PeerMessage::Despawn { entity },
        }
    }
}

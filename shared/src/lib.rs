//! # Catacomb Shared
//! Common functionality shared by every catacomb peer: entity ownership,
//! snapshot replication, discrete transitions, the locomotion state machine
//! and the wire format they travel in.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod entity;
mod events;
mod locomotion;
mod math;
mod ownership;
mod replication;
mod sequence;
mod transport;
mod types;
mod wire;

pub use entity::{
    entity_kind::{EntityKind, LeavePolicy},
    error::EntityError,
    net_entity::{NetEntity, NetEntityAllocator},
};
pub use events::{
    BufferSlot, BufferedEventLog, Cue, DiscreteEvent, DiscreteState, DoorState, ElevatorState,
    ItemCustody, ItemState, LeverState, ObstacleState, PlacedRune, PlacedSymbol, PuzzleState,
    RuneSlotState, SymbolTableState, Transition, TransitionError,
};
pub use locomotion::{
    CharacterMotor, GroundContact, JumpPhase, LocomotionConfig, LocomotionController,
    LocomotionInput, LocomotionState, MotorResult, PlaneGround, PresentationTag,
};
pub use math::{Bounds, Quat, Vec3};
pub use ownership::{
    OwnerChange, OwnershipDenial, OwnershipError, OwnershipRecord, OwnershipRegistry,
    OwnershipStatus, PeerLeftOutcome, PendingRequest, RequestOutcome, RoutedRequest,
    SessionRoster,
};
pub use replication::{
    AvatarChannels, ContinuousChannels, ContinuousState, Interpolator, ReplicationConfig,
    Snapshot, SnapshotReceiver, SnapshotSender,
};
pub use sequence::SnapshotStamp;
pub use transport::{
    Delivery, PacketReceiver, PacketSender, Target, TransportError, TransportEvent,
};
pub use types::{OwnerEpoch, PeerId, Sequence, Tick};
pub use wire::{PeerMessage, SpawnRecord, WireError};

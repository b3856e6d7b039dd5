//! # Catacomb Peer
//! A session participant that keeps doors, levers, rune slots, items,
//! obstacles and avatars consistent with up to three other peers. Each
//! entity is simulated by exactly one owner; everyone else applies the
//! owner's discrete transitions and interpolates its snapshots.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod avatar;
mod coordinator;
mod error;
mod events;
mod intent;
mod interaction;
mod obstacle;
mod peer;
mod peer_config;
mod scene;
mod session;
mod world;

pub use catacomb_shared as shared;

pub use coordinator::{evaluate_elevator, evaluate_puzzle, evaluate_symbol_table, CoordinatorQueue};
pub use error::PeerError;
pub use events::{
    CoordinatorChangedEvent, CueEvent, DespawnEntityEvent, ErrorEvent,
    InteractionUnavailableEvent, OwnershipDeniedEvent, OwnershipExpiredEvent,
    OwnershipGrantedEvent, OwnershipLostEvent, PeerEvent, PeerEvents, PeerJoinedEvent,
    PeerLeftEvent, PresentationChangedEvent, PresentationState, SessionSignal,
    SessionSignalEvent, SpawnEntityEvent,
};
pub use intent::Intent;
pub use interaction::{plan, prompt, Interaction, InteractionPlan};
pub use obstacle::ObstacleRunner;
pub use peer::Peer;
pub use peer_config::PeerConfig;
pub use scene::{
    ConfigError, ElevatorConfig, KillZone, ObstacleMotion, PuzzleConfig, SceneDefinition,
    SceneEntity, SymbolLayout, SymbolPuzzleConfig, ValidatedScene,
};
pub use session::{Inventory, SessionContext};
pub use world::{EntityRecord, EntityStore};

use thiserror::Error;

use catacomb_shared::{
    EntityError, NetEntity, OwnershipError, TransitionError, TransportError, WireError,
};

use crate::scene::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeerError {
    #[error("Wire error: {0}")]
    Wire(#[from] WireError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Entity error: {0}")]
    Entity(#[from] EntityError),

    #[error("Ownership error: {0}")]
    Ownership(#[from] OwnershipError),

    #[error("Transition error on {entity}: {source}")]
    Transition {
        entity: NetEntity,
        #[source]
        source: TransitionError,
    },

    #[error("Scene configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The operation needs the local peer to own the entity
    #[error("{entity} is not owned by this peer - operation '{operation}' requires ownership")]
    NotOwner {
        entity: NetEntity,
        operation: &'static str,
    },

    /// Each peer controls at most one avatar
    #[error("An avatar was already spawned as {entity}")]
    AvatarAlreadySpawned { entity: NetEntity },

    /// Only the session coordinator may do this
    #[error("This peer is not the session coordinator - operation '{operation}' requires it")]
    NotCoordinator { operation: &'static str },

    /// The spawned state does not belong to the requested kind, or the kind
    /// has its own spawn path
    #[error("Cannot spawn a {kind} from {state} state")]
    InvalidSpawn {
        kind: &'static str,
        state: &'static str,
    },
}

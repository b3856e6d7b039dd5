use thiserror::Error;

use crate::entity::net_entity::NetEntity;

/// Errors raised by the ownership registry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OwnershipError {
    /// Entity has no ownership record
    #[error("{entity} is not registered for ownership - operation '{operation}' requires registration")]
    EntityNotRegistered {
        entity: NetEntity,
        operation: &'static str,
    },

    /// Entity already has an ownership record
    #[error("{entity} is already registered for ownership")]
    EntityAlreadyRegistered { entity: NetEntity },

    /// The roster is empty, so no peer can act for session-owned entities
    #[error("no connected peer can coordinate the session")]
    NoCoordinator,
}

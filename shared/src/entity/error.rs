use thiserror::Error;

use crate::entity::net_entity::NetEntity;

/// Errors that can occur while looking up or registering replicated entities
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// Entity was not found during lookup
    #[error("{entity} does not exist - operation '{operation}' requires it")]
    EntityNotFound {
        entity: NetEntity,
        operation: &'static str,
    },

    /// Entity already exists when trying to spawn
    #[error("{entity} already exists and cannot be spawned again")]
    EntityAlreadyExists { entity: NetEntity },

    /// Entity exists but has a different kind than the operation expects
    #[error("{entity} is a {actual}, expected {expected}")]
    UnexpectedKind {
        entity: NetEntity,
        expected: &'static str,
        actual: &'static str,
    },
}

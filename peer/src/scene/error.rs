use thiserror::Error;

use catacomb_shared::NetEntity;

/// Faults found while loading a scene. None of them abort loading: the
/// offending dependent is skipped and the rest of the scene is used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Two scene entries share one id
    #[error("{entity} is defined more than once in the scene")]
    DuplicateEntity { entity: NetEntity },

    /// A coordinator lists a dependent the scene does not define
    #[error("{owner} lists {role} {dependent}, which is not in the scene")]
    MissingDependent {
        owner: NetEntity,
        dependent: NetEntity,
        role: &'static str,
    },

    /// A referenced entity has the wrong kind for its role
    #[error("{entity} is a {actual} but is used as a {expected}")]
    UnexpectedKind {
        entity: NetEntity,
        expected: &'static str,
        actual: &'static str,
    },

    /// A puzzle asks for more lever activations than it has levers
    #[error("{puzzle} requires {required} levers but only has {available}, clamping")]
    LeverThresholdClamped {
        puzzle: NetEntity,
        required: usize,
        available: usize,
    },

    /// A symbol puzzle has nothing to choose from
    #[error("{table} has no symbol layouts")]
    NoSymbolLayouts { table: NetEntity },
}

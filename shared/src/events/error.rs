use thiserror::Error;

/// Reasons a transition could not be applied to a discrete state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The transition targets a different kind of entity
    #[error("transition '{transition}' cannot apply to a {kind}")]
    KindMismatch {
        transition: &'static str,
        kind: &'static str,
    },

    /// The entity's current state forbids the transition
    #[error("transition '{transition}' rejected: {reason}")]
    Rejected {
        transition: &'static str,
        reason: &'static str,
    },
}

use bitcode::{Decode, Encode};

/// Top level locomotion state. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LocomotionState {
    Idle,
    Walking,
    Running,
    Crouching,
    Sliding,
    Jumping,
}

/// Sub-phase of `Jumping`. Always `None` outside it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum JumpPhase {
    None,
    Takeoff,
    InAir,
    Landing,
}

/// What remote peers animate for an avatar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum PresentationTag {
    Idle,
    Walking,
    Running,
    Crouching,
    Sliding,
    Jumping,
    JumpTakeoff,
    JumpInAir,
    JumpLanding,
}

impl PresentationTag {
    pub fn from_state(state: LocomotionState, phase: JumpPhase) -> Self {
        match state {
            LocomotionState::Idle => PresentationTag::Idle,
            LocomotionState::Walking => PresentationTag::Walking,
            LocomotionState::Running => PresentationTag::Running,
            LocomotionState::Crouching => PresentationTag::Crouching,
            LocomotionState::Sliding => PresentationTag::Sliding,
            LocomotionState::Jumping => match phase {
                JumpPhase::None => PresentationTag::Jumping,
                JumpPhase::Takeoff => PresentationTag::JumpTakeoff,
                JumpPhase::InAir => PresentationTag::JumpInAir,
                JumpPhase::Landing => PresentationTag::JumpLanding,
            },
        }
    }
}

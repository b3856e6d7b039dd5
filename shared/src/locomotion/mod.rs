mod config;
mod controller;
mod input;
mod motor;
mod state;

pub use config::LocomotionConfig;
pub use controller::LocomotionController;
pub use input::LocomotionInput;
pub use motor::{CharacterMotor, GroundContact, MotorResult, PlaneGround};
pub use state::{JumpPhase, LocomotionState, PresentationTag};

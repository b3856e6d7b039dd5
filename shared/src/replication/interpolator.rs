use crate::{
    math::{Quat, Vec3},
    replication::{config::ReplicationConfig, continuous_state::ContinuousState},
};

/// Smooths a remote entity's presented transform toward the latest accepted
/// snapshot. Non-transform channels snap to the target immediately.
#[derive(Clone, Debug)]
pub struct Interpolator {
    presented: ContinuousState,
    target: ContinuousState,
}

impl Interpolator {
    pub fn new(initial: ContinuousState) -> Self {
        Self {
            presented: initial,
            target: initial,
        }
    }

    pub fn set_target(&mut self, target: ContinuousState) {
        self.presented.channels = target.channels;
        self.target = target;
    }

    /// Jump straight to `state`, used for the local owner and on spawn.
    pub fn snap_to(&mut self, state: ContinuousState) {
        self.presented = state;
        self.target = state;
    }

    pub fn step(&mut self, dt: f32, config: &ReplicationConfig) {
        let position_t = (config.position_rate * dt).clamp(0.0, 1.0);
        let rotation_t = (config.rotation_rate * dt).clamp(0.0, 1.0);
        self.presented.position = self.presented.position.lerp(self.target.position, position_t);
        self.presented.rotation = self.presented.rotation.slerp(self.target.rotation, rotation_t);
    }

    pub fn presented(&self) -> &ContinuousState {
        &self.presented
    }

    pub fn target(&self) -> &ContinuousState {
        &self.target
    }

    pub fn position(&self) -> Vec3 {
        self.presented.position
    }

    pub fn rotation(&self) -> Quat {
        self.presented.rotation
    }
}

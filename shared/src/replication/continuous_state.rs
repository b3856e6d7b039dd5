use bitcode::{Decode, Encode};

use crate::{
    locomotion::{JumpPhase, PresentationTag},
    math::{Quat, Vec3},
};

#[derive(Clone, Copy, Debug, PartialEq, Encode, Decode)]
pub struct AvatarChannels {
    pub pitch: f32,
    pub vertical_velocity: f32,
    pub sliding_slope: bool,
    pub tag: PresentationTag,
    pub jump_phase: JumpPhase,
}

impl Default for AvatarChannels {
    fn default() -> Self {
        Self {
            pitch: 0.0,
            vertical_velocity: 0.0,
            sliding_slope: false,
            tag: PresentationTag::Idle,
            jump_phase: JumpPhase::None,
        }
    }
}

/// Per-kind channels streamed alongside the transform.
#[derive(Clone, Copy, Debug, PartialEq, Encode, Decode)]
pub enum ContinuousChannels {
    Static,
    Avatar(AvatarChannels),
    Obstacle { moving: bool },
}

/// Everything about an entity that changes every tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContinuousState {
    pub position: Vec3,
    pub rotation: Quat,
    pub channels: ContinuousChannels,
}

impl ContinuousState {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            channels: ContinuousChannels::Static,
        }
    }

    pub fn with_channels(mut self, channels: ContinuousChannels) -> Self {
        self.channels = channels;
        self
    }

    pub fn avatar(&self) -> Option<&AvatarChannels> {
        match &self.channels {
            ContinuousChannels::Avatar(avatar) => Some(avatar),
            _ => None,
        }
    }

    pub fn presentation_tag(&self) -> Option<PresentationTag> {
        self.avatar().map(|avatar| avatar.tag)
    }
}

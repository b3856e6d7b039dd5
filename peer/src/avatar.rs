use catacomb_shared::{
    CharacterMotor, ContinuousState, LocomotionConfig, LocomotionController, LocomotionInput,
    NetEntity, PresentationTag, Vec3,
};

struct Death {
    respawn_at: Vec3,
    remaining: f32,
}

/// The avatar this peer spawned and simulates.
pub struct LocalAvatar {
    entity: NetEntity,
    controller: LocomotionController,
    motor: Box<dyn CharacterMotor + Send>,
    input: LocomotionInput,
    tag: PresentationTag,
    death: Option<Death>,
}

impl LocalAvatar {
    pub fn new(
        entity: NetEntity,
        config: LocomotionConfig,
        position: Vec3,
        motor: Box<dyn CharacterMotor + Send>,
    ) -> Self {
        let controller = LocomotionController::new(config, position, 0.0);
        let tag = controller.presentation_tag();
        Self {
            entity,
            controller,
            motor,
            input: LocomotionInput::default(),
            tag,
            death: None,
        }
    }

    pub fn entity(&self) -> NetEntity {
        self.entity
    }

    pub fn controller(&self) -> &LocomotionController {
        &self.controller
    }

    /// Replace the input for the coming ticks. Press edges are consumed by
    /// the next tick, held buttons persist.
    pub fn set_input(&mut self, input: LocomotionInput) {
        self.input = input;
    }

    pub fn is_dead(&self) -> bool {
        self.death.is_some()
    }

    /// Freeze the avatar until it respawns at `respawn_at` after `delay`
    /// seconds. Returns false if it was already dead.
    pub fn kill(&mut self, respawn_at: Vec3, delay: f32) -> bool {
        if self.death.is_some() {
            return false;
        }
        self.death = Some(Death {
            respawn_at,
            remaining: delay,
        });
        true
    }

    /// Count a death down. Returns true on the tick the avatar respawns.
    pub fn advance_death(&mut self, dt: f32) -> bool {
        let Some(death) = self.death.as_mut() else {
            return false;
        };
        if death.remaining > 0.0 {
            death.remaining -= dt;
            return false;
        }
        self.controller.respawn(death.respawn_at);
        self.death = None;
        true
    }

    /// Returns the new presentation tag when it changed. A dead avatar
    /// ignores input and does not move.
    pub fn tick(&mut self, dt: f32) -> Option<PresentationTag> {
        if self.death.is_some() {
            return None;
        }
        self.controller.tick(&self.input, dt, self.motor.as_mut());
        self.input.jump_pressed = false;
        self.input.crouch_pressed = false;
        self.input.yaw_delta = 0.0;
        self.input.pitch_delta = 0.0;

        let tag = self.controller.presentation_tag();
        if tag == self.tag {
            return None;
        }
        self.tag = tag;
        Some(tag)
    }

    pub fn continuous_state(&self) -> ContinuousState {
        self.controller.continuous_state()
    }
}

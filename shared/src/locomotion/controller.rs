use log::trace;

use crate::{
    locomotion::{
        config::LocomotionConfig,
        input::LocomotionInput,
        motor::CharacterMotor,
        state::{JumpPhase, LocomotionState, PresentationTag},
    },
    math::{Quat, Vec3},
    replication::{AvatarChannels, ContinuousChannels, ContinuousState},
};

struct SlideMotion {
    direction: Vec3,
    speed: f32,
    timer: f32,
}

/// Locomotion for one avatar, run only by the peer that owns it.
///
/// Each tick evaluates at most one top level transition, then integrates
/// gravity and movement through the supplied `CharacterMotor`.
pub struct LocomotionController {
    config: LocomotionConfig,
    state: LocomotionState,
    jump_phase: JumpPhase,
    phase_timer: f32,

    position: Vec3,
    yaw: f32,
    pitch: f32,
    vertical_velocity: f32,

    grounded: bool,
    grounded_timer: f32,
    time_since_landing: f32,
    ground_normal: Vec3,
    sliding_slope: bool,

    sprint_duration: f32,
    slide: Option<SlideMotion>,

    speed_multiplier: f32,
    collider_height: f32,
    camera_offset: f32,
}

impl LocomotionController {
    pub fn new(config: LocomotionConfig, position: Vec3, yaw: f32) -> Self {
        let collider_height = config.standing_height;
        let time_since_landing = config.jump_cooldown;
        Self {
            config,
            state: LocomotionState::Idle,
            jump_phase: JumpPhase::None,
            phase_timer: 0.0,
            position,
            yaw,
            pitch: 0.0,
            vertical_velocity: 0.0,
            grounded: false,
            grounded_timer: 0.0,
            time_since_landing,
            ground_normal: Vec3::Y,
            sliding_slope: false,
            sprint_duration: 0.0,
            slide: None,
            speed_multiplier: 1.0,
            collider_height,
            camera_offset: 0.0,
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn state(&self) -> LocomotionState {
        self.state
    }

    pub fn jump_phase(&self) -> JumpPhase {
        self.jump_phase
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_sliding_slope(&self) -> bool {
        self.sliding_slope
    }

    pub fn collider_height(&self) -> f32 {
        self.collider_height
    }

    pub fn camera_offset(&self) -> f32 {
        self.camera_offset
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn presentation_tag(&self) -> PresentationTag {
        PresentationTag::from_state(self.state, self.jump_phase)
    }

    /// Whether a jump pressed this tick would start.
    pub fn can_jump(&self) -> bool {
        self.grounded
            && !self.sliding_slope
            && self.time_since_landing >= self.config.jump_cooldown
    }

    /// Move the avatar without simulating, e.g. when a spawn point is assigned.
    pub fn teleport(&mut self, position: Vec3) {
        self.position = position;
        self.vertical_velocity = 0.0;
    }

    /// Teleport and drop back to `Idle` with no jump phase, standing and
    /// with no slide or sprint in progress.
    pub fn respawn(&mut self, position: Vec3) {
        self.change_state(LocomotionState::Idle);
        self.jump_phase = JumpPhase::None;
        self.phase_timer = 0.0;
        self.sprint_duration = 0.0;
        self.sliding_slope = false;
        self.grounded = false;
        self.grounded_timer = 0.0;
        self.time_since_landing = self.config.jump_cooldown;
        self.teleport(position);
    }

    pub fn continuous_state(&self) -> ContinuousState {
        ContinuousState {
            position: self.position,
            rotation: self.heading(),
            channels: ContinuousChannels::Avatar(AvatarChannels {
                pitch: self.pitch,
                vertical_velocity: self.vertical_velocity,
                sliding_slope: self.sliding_slope,
                tag: self.presentation_tag(),
                jump_phase: self.jump_phase,
            }),
        }
    }

    pub fn tick(&mut self, input: &LocomotionInput, dt: f32, motor: &mut dyn CharacterMotor) {
        self.yaw = (self.yaw + input.yaw_delta).rem_euclid(360.0);
        self.pitch = (self.pitch + input.pitch_delta)
            .clamp(-self.config.max_pitch, self.config.max_pitch);

        self.time_since_landing += dt;
        if self.grounded {
            self.grounded_timer += dt;
        } else {
            self.grounded_timer = 0.0;
        }

        if let Some(next) = self.evaluate(input, dt) {
            self.change_state(next);
        }

        let finished_slide = if self.state == LocomotionState::Sliding {
            self.integrate_slide(dt, motor)
        } else {
            self.integrate(input, dt, motor);
            false
        };

        if finished_slide {
            self.change_state(LocomotionState::Idle);
        }
    }

    fn evaluate(&mut self, input: &LocomotionInput, dt: f32) -> Option<LocomotionState> {
        let moving = self.is_moving(input);
        let jump = input.jump_pressed && self.can_jump();

        match self.state {
            LocomotionState::Idle | LocomotionState::Walking => {
                if jump {
                    Some(LocomotionState::Jumping)
                } else if input.crouch_pressed {
                    Some(LocomotionState::Crouching)
                } else if input.sprint_held && moving {
                    Some(LocomotionState::Running)
                } else if moving && self.state == LocomotionState::Idle {
                    Some(LocomotionState::Walking)
                } else if !moving && self.state == LocomotionState::Walking {
                    Some(LocomotionState::Idle)
                } else {
                    None
                }
            }
            LocomotionState::Running => {
                self.sprint_duration += dt;
                if jump {
                    Some(LocomotionState::Jumping)
                } else if input.crouch_pressed {
                    if self.sprint_duration >= self.config.slide_unlock_time {
                        Some(LocomotionState::Sliding)
                    } else {
                        Some(LocomotionState::Crouching)
                    }
                } else if !input.sprint_held && moving {
                    Some(LocomotionState::Walking)
                } else if !moving {
                    Some(LocomotionState::Idle)
                } else {
                    None
                }
            }
            LocomotionState::Crouching => {
                if input.crouch_pressed {
                    Some(self.standing_state(input))
                } else if jump {
                    Some(LocomotionState::Jumping)
                } else {
                    None
                }
            }
            LocomotionState::Sliding => {
                if jump {
                    Some(LocomotionState::Jumping)
                } else {
                    None
                }
            }
            LocomotionState::Jumping => {
                self.update_jump_phase(dt);
                if self.jump_phase != JumpPhase::None {
                    return None;
                }
                if input.crouch_held {
                    Some(LocomotionState::Crouching)
                } else {
                    Some(self.standing_state(input))
                }
            }
        }
    }

    fn standing_state(&self, input: &LocomotionInput) -> LocomotionState {
        let moving = self.is_moving(input);
        if input.sprint_held && moving {
            LocomotionState::Running
        } else if moving {
            LocomotionState::Walking
        } else {
            LocomotionState::Idle
        }
    }

    fn update_jump_phase(&mut self, dt: f32) {
        self.phase_timer += dt;
        let next = match self.jump_phase {
            JumpPhase::None => return,
            JumpPhase::Takeoff
                if self.phase_timer >= self.config.takeoff_duration || !self.grounded =>
            {
                JumpPhase::InAir
            }
            JumpPhase::InAir
                if self.grounded
                    && self.grounded_timer >= self.config.min_grounded_for_landing =>
            {
                JumpPhase::Landing
            }
            JumpPhase::Landing if self.phase_timer >= self.config.landing_duration => {
                JumpPhase::None
            }
            _ => return,
        };
        self.jump_phase = next;
        self.phase_timer = 0.0;
    }

    fn change_state(&mut self, next: LocomotionState) {
        if next == self.state {
            return;
        }
        trace!("locomotion {:?} -> {:?}", self.state, next);
        self.exit_state();
        self.state = next;
        self.enter_state();
    }

    fn exit_state(&mut self) {
        match self.state {
            LocomotionState::Crouching | LocomotionState::Sliding => {
                self.speed_multiplier = 1.0;
                self.collider_height = self.config.standing_height;
                self.camera_offset = 0.0;
                self.slide = None;
            }
            LocomotionState::Running => {
                self.sprint_duration = 0.0;
            }
            LocomotionState::Jumping => {
                self.jump_phase = JumpPhase::None;
                self.phase_timer = 0.0;
            }
            LocomotionState::Idle | LocomotionState::Walking => {}
        }
    }

    fn enter_state(&mut self) {
        match self.state {
            LocomotionState::Crouching => {
                self.speed_multiplier = self.config.crouch_speed_multiplier;
                self.collider_height = self.config.crouch_height;
                self.camera_offset = self.config.crouch_camera_offset;
            }
            LocomotionState::Sliding => {
                self.collider_height = self.config.crouch_height;
                self.camera_offset = self.config.crouch_camera_offset;
                self.slide = Some(SlideMotion {
                    direction: self.heading() * Vec3::Z,
                    speed: self.config.slide_base_speed,
                    timer: self.config.flat_slide_duration,
                });
            }
            LocomotionState::Running => {
                self.sprint_duration = 0.0;
            }
            LocomotionState::Jumping => {
                self.vertical_velocity = self.config.jump_velocity();
                self.jump_phase = JumpPhase::Takeoff;
                self.phase_timer = 0.0;
            }
            LocomotionState::Idle | LocomotionState::Walking => {}
        }
    }

    fn heading(&self) -> Quat {
        Quat::from_rotation_y(self.yaw.to_radians())
    }

    fn is_moving(&self, input: &LocomotionInput) -> bool {
        Vec3::new(input.move_x, 0.0, input.move_z).length() > self.config.movement_epsilon
    }

    /// Input direction in world space, scaled down while airborne.
    fn move_vector(&self, input: &LocomotionInput) -> Vec3 {
        let local = Vec3::new(input.move_x, 0.0, input.move_z).clamp_length_max(1.0);
        let world = self.heading() * local;
        if self.grounded {
            world
        } else {
            world * self.config.air_control
        }
    }

    fn current_speed(&self) -> f32 {
        let base = if self.state == LocomotionState::Running {
            self.config.sprint_speed
        } else {
            self.config.walk_speed
        };
        base * self.speed_multiplier
    }

    fn apply_gravity(&mut self, dt: f32) {
        if self.grounded && self.vertical_velocity < 0.0 {
            self.vertical_velocity = self.config.ground_stick_velocity;
        }
        self.vertical_velocity += self.config.effective_gravity() * dt;
        self.vertical_velocity = self.vertical_velocity.max(-self.config.max_fall_speed);
    }

    fn downhill(&self) -> Vec3 {
        let downhill = Vec3::NEG_Y.reject_from(self.ground_normal);
        Vec3::new(downhill.x, 0.0, downhill.z).normalize_or_zero()
    }

    fn integrate(&mut self, input: &LocomotionInput, dt: f32, motor: &mut dyn CharacterMotor) {
        self.apply_gravity(dt);

        let horizontal = if self.sliding_slope {
            self.downhill() * self.config.steep_slope_slide_speed
        } else {
            let movement = self.move_vector(input) * self.current_speed();
            if self.grounded {
                movement.reject_from(self.ground_normal)
            } else {
                movement
            }
        };

        let velocity = horizontal + Vec3::Y * self.vertical_velocity;
        self.move_through(velocity * dt, motor);
    }

    /// Returns true when the slide has run out.
    fn integrate_slide(&mut self, dt: f32, motor: &mut dyn CharacterMotor) -> bool {
        let angle = self.ground_normal.angle_between(Vec3::Y).to_degrees();
        let on_slope = self.grounded
            && angle >= self.config.slide_min_angle
            && angle <= self.config.slide_max_angle;

        let config = &self.config;
        let Some(slide) = self.slide.as_mut() else {
            return true;
        };

        if on_slope {
            let span = (config.slide_max_angle - config.slide_min_angle).max(f32::EPSILON);
            let factor = ((angle - config.slide_min_angle) / span).clamp(0.0, 1.0);
            slide.speed = (slide.speed + factor * config.slide_slope_acceleration * dt)
                .clamp(config.slide_base_speed, config.slide_max_speed);
        } else {
            slide.speed = (slide.speed - config.slide_flat_deceleration * dt).max(0.0);
            slide.timer -= dt;
        }

        let finished = !on_slope
            && (slide.timer <= 0.0 || slide.speed <= config.slide_end_speed || !self.grounded);
        let velocity = slide.direction * slide.speed + Vec3::Y * self.vertical_velocity;

        self.move_through(velocity * dt, motor);
        self.apply_gravity(dt);
        finished
    }

    fn move_through(&mut self, displacement: Vec3, motor: &mut dyn CharacterMotor) {
        let result = motor.move_by(self.position, displacement, self.collider_height);
        self.position = result.position;

        let was_grounded = self.grounded;
        self.grounded = result.contact.grounded;
        if !self.grounded {
            return;
        }

        self.ground_normal = result.contact.normal;
        self.sliding_slope =
            self.ground_normal.angle_between(Vec3::Y).to_degrees() > self.config.max_slope_angle;
        if !was_grounded {
            self.time_since_landing = 0.0;
            if self.vertical_velocity < 0.0 {
                self.vertical_velocity = self.config.ground_stick_velocity;
            }
        }
    }
}

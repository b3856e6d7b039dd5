/// Contains config properties which will be used by the locomotion state
/// machine. Distances are in meters, durations in seconds and angles in
/// degrees.
#[derive(Clone, Debug)]
pub struct LocomotionConfig {
    pub walk_speed: f32,
    pub sprint_speed: f32,
    /// Apex height of a jump from flat ground
    pub jump_height: f32,
    /// Base gravity, negative is down
    pub gravity: f32,
    pub gravity_multiplier: f32,
    /// Terminal fall speed, positive
    pub max_fall_speed: f32,
    /// Ground steeper than this sets the sliding-on-slope flag
    pub max_slope_angle: f32,
    /// Fraction of horizontal input applied while airborne
    pub air_control: f32,
    pub standing_height: f32,
    pub crouch_height: f32,
    pub crouch_speed_multiplier: f32,
    pub crouch_camera_offset: f32,
    /// How long a sprint must last before crouching turns into a slide
    pub slide_unlock_time: f32,
    pub takeoff_duration: f32,
    pub landing_duration: f32,
    /// Grounded time required before an in-air jump counts as landed
    pub min_grounded_for_landing: f32,
    /// Time after landing before another jump may start
    pub jump_cooldown: f32,
    /// Input magnitudes at or below this count as no movement
    pub movement_epsilon: f32,
    pub slide_base_speed: f32,
    pub slide_max_speed: f32,
    pub flat_slide_duration: f32,
    pub slide_slope_acceleration: f32,
    pub slide_end_speed: f32,
    pub slide_min_angle: f32,
    pub slide_max_angle: f32,
    pub slide_flat_deceleration: f32,
    /// Downhill drift speed while the sliding-on-slope flag is set
    pub steep_slope_slide_speed: f32,
    /// Vertical velocity held while grounded so the motor keeps contact
    pub ground_stick_velocity: f32,
    pub max_pitch: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: 5.0,
            sprint_speed: 8.0,
            jump_height: 8.0,
            gravity: -20.0,
            gravity_multiplier: 1.0,
            max_fall_speed: 30.0,
            max_slope_angle: 45.0,
            air_control: 0.5,
            standing_height: 2.0,
            crouch_height: 1.0,
            crouch_speed_multiplier: 0.5,
            crouch_camera_offset: -0.5,
            slide_unlock_time: 1.0,
            takeoff_duration: 0.2,
            landing_duration: 0.3,
            min_grounded_for_landing: 0.1,
            jump_cooldown: 0.2,
            movement_epsilon: 0.01,
            slide_base_speed: 15.0,
            slide_max_speed: 40.0,
            flat_slide_duration: 0.8,
            slide_slope_acceleration: 12.0,
            slide_end_speed: 1.5,
            slide_min_angle: 5.0,
            slide_max_angle: 45.0,
            slide_flat_deceleration: 6.0,
            steep_slope_slide_speed: 6.0,
            ground_stick_velocity: -0.5,
            max_pitch: 90.0,
        }
    }
}

impl LocomotionConfig {
    pub fn effective_gravity(&self) -> f32 {
        self.gravity * self.gravity_multiplier
    }

    /// Initial upward speed that reaches `jump_height` under gravity.
    pub fn jump_velocity(&self) -> f32 {
        (2.0 * self.jump_height * self.effective_gravity().abs()).sqrt()
    }
}

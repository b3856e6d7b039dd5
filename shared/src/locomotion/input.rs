/// One tick of player input, already polled by the host application.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocomotionInput {
    /// Strafe axis, -1 (left) to 1 (right)
    pub move_x: f32,
    /// Forward axis, -1 (back) to 1 (forward)
    pub move_z: f32,
    pub jump_pressed: bool,
    /// Crouch toggle edge
    pub crouch_pressed: bool,
    pub crouch_held: bool,
    pub sprint_held: bool,
    pub yaw_delta: f32,
    pub pitch_delta: f32,
}

impl LocomotionInput {
    pub fn forward() -> Self {
        Self {
            move_z: 1.0,
            ..Default::default()
        }
    }

    pub fn with_sprint(mut self) -> Self {
        self.sprint_held = true;
        self
    }

    pub fn with_jump(mut self) -> Self {
        self.jump_pressed = true;
        self
    }

    pub fn with_crouch(mut self) -> Self {
        self.crouch_pressed = true;
        self
    }
}

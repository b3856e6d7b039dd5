use crate::math::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundContact {
    pub grounded: bool,
    /// Normal of the last ground touched, `Vec3::Y` when unknown
    pub normal: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotorResult {
    pub position: Vec3,
    pub contact: GroundContact,
}

/// The character-collision primitive locomotion moves through.
pub trait CharacterMotor {
    fn move_by(&mut self, from: Vec3, displacement: Vec3, height: f32) -> MotorResult;
}

/// Contact closer than this to the ground counts as grounded.
const GROUND_SKIN: f32 = 0.01;

/// An infinite plane of ground. Headless peers and tests use it in place of
/// a physics engine.
#[derive(Clone, Copy, Debug)]
pub struct PlaneGround {
    origin: Vec3,
    normal: Vec3,
}

impl PlaneGround {
    pub fn flat(height: f32) -> Self {
        Self {
            origin: Vec3::new(0.0, height, 0.0),
            normal: Vec3::Y,
        }
    }

    /// A plane through `origin` rising along +z at `angle` degrees.
    pub fn inclined(origin: Vec3, angle: f32) -> Self {
        let radians = angle.to_radians();
        Self {
            origin,
            normal: Vec3::new(0.0, radians.cos(), -radians.sin()),
        }
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl CharacterMotor for PlaneGround {
    fn move_by(&mut self, from: Vec3, displacement: Vec3, _height: f32) -> MotorResult {
        let mut position = from + displacement;
        let distance = (position - self.origin).dot(self.normal);
        if distance > GROUND_SKIN {
            return MotorResult {
                position,
                contact: GroundContact {
                    grounded: false,
                    normal: self.normal,
                },
            };
        }

        if distance < 0.0 {
            position = position - self.normal * distance;
        }
        MotorResult {
            position,
            contact: GroundContact {
                grounded: true,
                normal: self.normal,
            },
        }
    }
}

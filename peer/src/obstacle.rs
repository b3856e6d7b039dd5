use catacomb_shared::Vec3;

use crate::scene::ObstacleMotion;

/// Back-and-forth motion of one obstacle along its direction. Only the
/// owner steps it; everyone else follows its snapshots.
pub struct ObstacleRunner {
    origin: Vec3,
    direction: Vec3,
    distance: f32,
    speed: f32,
    offset: f32,
    heading: f32,
    delay: f32,
}

impl ObstacleRunner {
    pub fn new(origin: Vec3, motion: &ObstacleMotion, rng: &mut fastrand::Rng) -> Self {
        let delay = match motion.random_delay {
            Some((min, max)) if max > min => min + rng.f32() * (max - min),
            Some((min, _)) => min,
            None => motion.start_delay,
        };
        Self {
            origin,
            direction: motion.direction.normalize_or_zero(),
            distance: motion.distance.max(0.0),
            speed: motion.speed,
            offset: 0.0,
            heading: 1.0,
            delay: delay.max(0.0),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.origin + self.direction * self.offset
    }

    pub fn step(&mut self, dt: f32, moving: bool) -> Vec3 {
        if !moving {
            return self.position();
        }
        if self.delay > 0.0 {
            self.delay -= dt;
            return self.position();
        }

        self.offset += self.heading * self.speed * dt;
        if self.offset >= self.distance {
            self.offset = self.distance;
            self.heading = -1.0;
        } else if self.offset <= 0.0 {
            self.offset = 0.0;
            self.heading = 1.0;
        }
        self.position()
    }

    /// Continue from a replicated position after taking ownership.
    pub fn sync_from(&mut self, position: Vec3) {
        self.offset = (position - self.origin)
            .dot(self.direction)
            .clamp(0.0, self.distance);
        self.delay = 0.0;
    }
}

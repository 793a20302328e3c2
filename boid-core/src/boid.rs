use rand::Rng;

use crate::vector::Vector2D;

/// Initial velocity components are drawn from `-INITIAL_VELOCITY_RANGE..=INITIAL_VELOCITY_RANGE`.
pub const INITIAL_VELOCITY_RANGE: f32 = 100.0;

/// A single boid entity
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Boid {
    pub position: Vector2D,
    /// Units per second.
    pub velocity: Vector2D,
}

impl Boid {
    pub fn new(position: Vector2D, velocity: Vector2D) -> Self {
        Self { position, velocity }
    }

    /// A boid somewhere inside `width` x `height`, moving at up to
    /// [`INITIAL_VELOCITY_RANGE`] on each axis.
    pub fn random<R: Rng>(rng: &mut R, width: f32, height: f32) -> Self {
        let position = Vector2D::new(rng.gen_range(0.0..=width), rng.gen_range(0.0..=height));
        let velocity = Vector2D::new(
            rng.gen_range(-INITIAL_VELOCITY_RANGE..=INITIAL_VELOCITY_RANGE),
            rng.gen_range(-INITIAL_VELOCITY_RANGE..=INITIAL_VELOCITY_RANGE),
        );
        Self::new(position, velocity)
    }

    /// Clamps each velocity component independently to `[-limit, limit]`.
    /// A NaN component is zeroed.
    pub fn clamp_velocity(&mut self, limit: f32) {
        let limit = if limit.is_nan() { 0.0 } else { limit.abs() };
        let clamp = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(-limit, limit) };
        self.velocity = Vector2D::new(clamp(self.velocity.x), clamp(self.velocity.y));
    }

    /// Teleports the boid to the opposite edge once it leaves `[0, width]` x `[0, height]`.
    pub fn wrap_edges(&mut self, width: f32, height: f32) {
        if self.position.x > width {
            self.position.x = 0.0;
        } else if self.position.x < 0.0 {
            self.position.x = width;
        }

        if self.position.y > height {
            self.position.y = 0.0;
        } else if self.position.y < 0.0 {
            self.position.y = height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_boid_creation() {
        let pos = Vector2D::new(10.0, 20.0);
        let vel = Vector2D::new(1.0, 1.0);
        let boid = Boid::new(pos, vel);

        assert_eq!(boid.position.x, 10.0);
        assert_eq!(boid.position.y, 20.0);
        assert_eq!(boid.velocity.x, 1.0);
        assert_eq!(boid.velocity.y, 1.0);
    }

    #[test]
    fn test_boid_wrap_edges() {
        let mut boid = Boid::new(Vector2D::new(-1.0, -1.0), Vector2D::zero());
        boid.wrap_edges(100.0, 100.0);
        assert_eq!(boid.position, Vector2D::new(100.0, 100.0));

        let mut boid = Boid::new(Vector2D::new(101.0, 50.0), Vector2D::zero());
        boid.wrap_edges(100.0, 100.0);
        assert_eq!(boid.position, Vector2D::new(0.0, 50.0));

        let mut boid = Boid::new(Vector2D::new(100.0, 0.0), Vector2D::zero());
        boid.wrap_edges(100.0, 100.0);
        assert_eq!(boid.position, Vector2D::new(100.0, 0.0));
    }

    #[test]
    fn test_clamp_velocity() {
        let mut boid = Boid::new(Vector2D::zero(), Vector2D::new(350.0, -20.0));
        boid.clamp_velocity(200.0);
        assert_eq!(boid.velocity, Vector2D::new(200.0, -20.0));

        boid.velocity = Vector2D::new(f32::NAN, f32::NEG_INFINITY);
        boid.clamp_velocity(200.0);
        assert_eq!(boid.velocity, Vector2D::new(0.0, -200.0));
    }

    #[test]
    fn test_random_boid_within_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let boid = Boid::random(&mut rng, 900.0, 570.0);
            assert!((0.0..=900.0).contains(&boid.position.x));
            assert!((0.0..=570.0).contains(&boid.position.y));
            assert!(boid.velocity.x.abs() <= INITIAL_VELOCITY_RANGE);
            assert!(boid.velocity.y.abs() <= INITIAL_VELOCITY_RANGE);
        }
    }
}

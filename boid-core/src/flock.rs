use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::behavior;
use crate::boid::Boid;
use crate::config::{FlockConfig, ParamValue};
use crate::environment::{Environment, Marker, MarkerId, MarkerKind, World};
use crate::error::{FlockError, Result};
use crate::integrator;
use crate::vector::Vector2D;

/// Boid population plus everything it reacts to.
///
/// `step` is two-phase: every boid is evaluated against the same pre-frame
/// population, and the new states replace the old ones only after all of them
/// are computed. Results therefore do not depend on iteration order.
///
/// All randomness (initial placement, jitter, explode) comes from `R`, so a
/// seeded generator gives reproducible runs.
#[derive(Debug, Clone)]
pub struct Flock<R = StdRng> {
    boids: Vec<Boid>,
    environment: Environment,
    pub config: FlockConfig,
    rng: R,
    frame: u64,
}

impl Flock<StdRng> {
    /// `count` random boids with the default tuning and an entropy-seeded RNG.
    pub fn new(world: World, count: usize) -> Self {
        Self::with_rng(world, count, FlockConfig::default(), StdRng::from_entropy())
    }

    pub fn with_seed(world: World, count: usize, config: FlockConfig, seed: u64) -> Self {
        Self::with_rng(world, count, config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Flock<R> {
    pub fn with_rng(world: World, count: usize, config: FlockConfig, mut rng: R) -> Self {
        let boids = (0..count)
            .map(|_| Boid::random(&mut rng, world.width, world.height))
            .collect();
        Self::from_boids(world, boids, config, rng)
    }

    /// Starts from an explicit population instead of random placement.
    pub fn from_boids(world: World, boids: Vec<Boid>, config: FlockConfig, rng: R) -> Self {
        log::debug!(
            "flock created: {} boids in {}x{}",
            boids.len(),
            world.width,
            world.height
        );
        Self {
            boids,
            environment: Environment::new(world),
            config,
            rng,
            frame: 0,
        }
    }

    /// Advances every boid by one frame of `dt` seconds.
    ///
    /// A negative or non-finite `dt` is rejected and nothing changes.
    pub fn step(&mut self, dt: f32) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(FlockError::InvalidTimeStep(dt));
        }

        let world = self.environment.world();
        let snapshot = &self.boids;
        let mut next = Vec::with_capacity(snapshot.len());

        for (index, boid) in snapshot.iter().enumerate() {
            let others = snapshot
                .iter()
                .enumerate()
                .filter(move |(other, _)| *other != index)
                .map(|(_, other)| other);
            let adjustments = behavior::evaluate(
                boid,
                others,
                &self.environment,
                &self.config,
                &mut self.rng,
            );
            next.push(integrator::integrate(
                boid,
                &adjustments,
                &self.config,
                world,
                dt,
            ));
        }

        self.boids = next;
        self.frame += 1;
        log::trace!("frame {} done (dt={})", self.frame, dt);
        Ok(())
    }

    pub fn place_attractor(&mut self, position: Vector2D) -> MarkerId {
        self.place(MarkerKind::Attractor, position)
    }

    pub fn remove_attractor(&mut self, id: MarkerId) -> Result<()> {
        self.remove(MarkerKind::Attractor, id)
    }

    pub fn place_detractor(&mut self, position: Vector2D) -> MarkerId {
        self.place(MarkerKind::Detractor, position)
    }

    pub fn remove_detractor(&mut self, id: MarkerId) -> Result<()> {
        self.remove(MarkerKind::Detractor, id)
    }

    fn place(&mut self, kind: MarkerKind, position: Vector2D) -> MarkerId {
        let id = self.environment.place(kind, position);
        log::debug!("placed {} {} at ({}, {})", kind, id, position.x, position.y);
        id
    }

    fn remove(&mut self, kind: MarkerKind, id: MarkerId) -> Result<()> {
        let marker = self.environment.remove(kind, id)?;
        log::debug!(
            "removed {} {} at ({}, {})",
            kind,
            id,
            marker.position.x,
            marker.position.y
        );
        Ok(())
    }

    /// Sets every velocity component to the positive or negative speed limit,
    /// each chosen independently with equal odds.
    pub fn explode(&mut self) {
        let speed = self.config.speed_limit();
        for boid in self.boids.iter_mut() {
            let mut pick = || if self.rng.gen_bool(0.5) { speed } else { -speed };
            boid.velocity = Vector2D::new(pick(), pick());
        }
        log::debug!("exploded {} boids at speed {}", self.boids.len(), speed);
    }

    /// Updates one named parameter; see [`FlockConfig::set`].
    pub fn set_parameter(&mut self, name: &str, value: ParamValue) -> Result<()> {
        self.config.set_by_name(name, value)?;
        log::debug!("parameter {} set to {:?}", name, value);
        Ok(())
    }

    /// Scatters the same number of boids randomly again and clears every
    /// attractor and detractor.
    pub fn reset(&mut self) {
        let world = self.environment.world();
        let count = self.boids.len();
        self.boids = (0..count)
            .map(|_| Boid::random(&mut self.rng, world.width, world.height))
            .collect();
        self.environment.clear();
        self.frame = 0;
        log::debug!("flock reset with {} boids", count);
    }
}

impl<R> Flock<R> {
    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn attractors(&self) -> &[Marker] {
        self.environment.attractors()
    }

    pub fn detractors(&self) -> &[Marker] {
        self.environment.detractors()
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn world(&self) -> World {
        self.environment.world()
    }

    pub fn config(&self) -> &FlockConfig {
        &self.config
    }

    /// Number of frames stepped since creation or the last [`Flock::reset`].
    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> FlockConfig {
        FlockConfig {
            center_of_mass_distance: 0.0,
            distance_unit: 0.0,
            match_velocity_distance: 0.0,
            jitter: 0.0,
            ..FlockConfig::default()
        }
    }

    #[test]
    fn test_flock_creation() {
        let flock = Flock::new(World::new(800.0, 600.0).unwrap(), 50);
        assert_eq!(flock.boids().len(), 50);
        assert_eq!(flock.world().width, 800.0);
        assert_eq!(flock.world().height, 600.0);
        assert_eq!(flock.frame(), 0);
    }

    #[test]
    fn test_flock_update() {
        let mut flock = Flock::with_seed(World::default(), 10, FlockConfig::default(), 9);
        let initial_positions: Vec<_> = flock.boids().iter().map(|b| b.position).collect();

        flock.step(1.0 / 60.0).unwrap();

        let changed = flock
            .boids()
            .iter()
            .zip(initial_positions.iter())
            .any(|(b, &initial)| b.position != initial);
        assert!(changed);
        assert_eq!(flock.frame(), 1);
    }

    #[test]
    fn test_invalid_time_step_is_rejected() {
        let mut flock = Flock::with_seed(World::default(), 5, FlockConfig::default(), 1);
        let before = flock.boids().to_vec();

        assert_eq!(flock.step(-0.1), Err(FlockError::InvalidTimeStep(-0.1)));
        assert!(flock.step(f32::NAN).is_err());
        assert!(flock.step(f32::INFINITY).is_err());

        assert_eq!(flock.boids(), before.as_slice());
        assert_eq!(flock.frame(), 0);
    }

    #[test]
    fn test_markers_affect_the_next_frame() {
        let boid = Boid::new(Vector2D::new(100.0, 100.0), Vector2D::zero());
        let mut flock = Flock::from_boids(
            World::default(),
            vec![boid],
            quiet_config(),
            StdRng::seed_from_u64(0),
        );

        let id = flock.place_attractor(Vector2D::new(150.0, 100.0));
        flock.step(0.0).unwrap();
        assert!(flock.boids()[0].velocity.x > 0.0);

        flock.remove_attractor(id).unwrap();
        assert!(flock.attractors().is_empty());
        assert_eq!(flock.remove_attractor(id), Err(FlockError::UnknownMarker(id)));

        let id = flock.place_detractor(Vector2D::new(150.0, 100.0));
        assert_eq!(flock.detractors().len(), 1);
        flock.remove_detractor(id).unwrap();
        assert!(flock.detractors().is_empty());
    }

    #[test]
    fn test_explode_uses_speed_limit() {
        let mut flock = Flock::with_seed(World::default(), 30, FlockConfig::default(), 4);
        flock.explode();
        for boid in flock.boids() {
            assert_eq!(boid.velocity.x.abs(), 200.0);
            assert_eq!(boid.velocity.y.abs(), 200.0);
        }
    }

    #[test]
    fn test_set_parameter() {
        let mut flock = Flock::with_seed(World::default(), 1, FlockConfig::default(), 4);
        flock
            .set_parameter("max_speed", ParamValue::Number(75.0))
            .unwrap();
        assert_eq!(flock.config().max_speed, 75.0);
        assert!(flock
            .set_parameter("speed", ParamValue::Number(1.0))
            .is_err());
    }

    #[test]
    fn test_reset() {
        let mut flock = Flock::with_seed(World::default(), 12, FlockConfig::default(), 5);
        flock.place_attractor(Vector2D::new(1.0, 1.0));
        flock.place_detractor(Vector2D::new(2.0, 2.0));
        flock.step(0.1).unwrap();
        let before = flock.boids().to_vec();

        flock.reset();

        assert_eq!(flock.boids().len(), 12);
        assert_ne!(flock.boids(), before.as_slice());
        assert!(flock.attractors().is_empty());
        assert!(flock.detractors().is_empty());
        assert_eq!(flock.frame(), 0);
    }
}

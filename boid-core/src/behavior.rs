//! Flocking rules.
//!
//! Each rule turns one boid plus read-only context into a velocity adjustment.
//! The `others` iterators must yield the pre-frame state of every other boid;
//! nothing here mutates a boid.

use rand::Rng;

use crate::boid::Boid;
use crate::config::{safe_divisor, FlockConfig};
use crate::environment::{Environment, Marker, World};
use crate::vector::Vector2D;

/// One adjustment per rule, as evaluated for a single boid in a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Adjustments {
    pub cohesion: Vector2D,
    pub separation: Vector2D,
    pub alignment: Vector2D,
    pub wall_avoidance: Vector2D,
    pub attraction: Vector2D,
    pub detraction: Vector2D,
    pub jitter: Vector2D,
    pub wind: Vector2D,
}

impl Adjustments {
    pub fn total(&self) -> Vector2D {
        [
            self.cohesion,
            self.separation,
            self.alignment,
            self.wall_avoidance,
            self.attraction,
            self.detraction,
            self.jitter,
            self.wind,
        ]
        .into_iter()
        .sum()
    }
}

/// Runs every rule for `boid`. Any rule whose result is not finite (only
/// possible with non-finite config values) contributes zero instead.
pub fn evaluate<'a, I, R>(
    boid: &Boid,
    others: I,
    env: &Environment,
    config: &FlockConfig,
    rng: &mut R,
) -> Adjustments
where
    I: Iterator<Item = &'a Boid> + Clone,
    R: Rng,
{
    let adjustments = Adjustments {
        cohesion: cohesion(boid, others.clone(), config),
        separation: separation(boid, others.clone(), config),
        alignment: alignment(boid, others, config),
        wall_avoidance: if config.wrap_around {
            Vector2D::zero()
        } else {
            wall_avoidance(boid, env.world(), config)
        },
        attraction: attraction(boid, env.attractors(), config),
        detraction: detraction(boid, env.detractors(), config),
        jitter: jitter(rng, config),
        wind: wind(config),
    };

    Adjustments {
        cohesion: sanitize("cohesion", adjustments.cohesion),
        separation: sanitize("separation", adjustments.separation),
        alignment: sanitize("alignment", adjustments.alignment),
        wall_avoidance: sanitize("wall_avoidance", adjustments.wall_avoidance),
        attraction: sanitize("attraction", adjustments.attraction),
        detraction: sanitize("detraction", adjustments.detraction),
        jitter: sanitize("jitter", adjustments.jitter),
        wind: sanitize("wind", adjustments.wind),
    }
}

fn sanitize(rule: &str, adjustment: Vector2D) -> Vector2D {
    if !adjustment.is_finite() {
        log::warn!("{} produced {:?}, using zero", rule, adjustment);
    }
    adjustment.finite_or_zero()
}

/// Steers toward the average position of neighbors within
/// `center_of_mass_distance`.
pub fn cohesion<'a, I>(boid: &Boid, others: I, config: &FlockConfig) -> Vector2D
where
    I: Iterator<Item = &'a Boid>,
{
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for other in others {
        if boid.position.distance(&other.position) < config.center_of_mass_distance {
            sum += other.position;
            count += 1;
        }
    }

    if count == 0 {
        return Vector2D::zero();
    }

    let divisor = safe_divisor(config.center_of_mass_percent);
    (sum / count as f32 - boid.position).divide_components(divisor, divisor)
}

/// Pushes away from every neighbor closer than `distance_unit`, harder the
/// further apart they are inside that radius.
pub fn separation<'a, I>(boid: &Boid, others: I, config: &FlockConfig) -> Vector2D
where
    I: Iterator<Item = &'a Boid>,
{
    let crowding: Vector2D = others
        .filter(|other| boid.position.distance(&other.position) < config.distance_unit)
        .map(|other| other.position - boid.position)
        .sum();

    (-crowding).scale(config.distance_percent / 100.0)
}

/// Matches the average velocity of neighbors within `match_velocity_distance`.
pub fn alignment<'a, I>(boid: &Boid, others: I, config: &FlockConfig) -> Vector2D
where
    I: Iterator<Item = &'a Boid>,
{
    let mut sum = Vector2D::zero();
    let mut count = 0;

    for other in others {
        if boid.position.distance(&other.position) < config.match_velocity_distance {
            sum += other.velocity;
            count += 1;
        }
    }

    if count == 0 {
        return Vector2D::zero();
    }

    let divisor = safe_divisor(config.match_velocity_percent);
    (sum / count as f32 - boid.velocity).divide_components(divisor, divisor)
}

/// Linear push back toward the interior for a boid within `wall_distance` of
/// an edge. The push equals how far the boid is past the margin line.
pub fn wall_avoidance(boid: &Boid, world: World, config: &FlockConfig) -> Vector2D {
    let margin = config.wall_distance;
    let Vector2D { x, y } = boid.position;
    let high = |position: f32, extent: f32| {
        (position > extent - margin).then(|| (extent - margin) - position)
    };
    let low = |position: f32| (position < margin).then(|| margin - position);

    // When the margins overlap, the left edge wins on x and the bottom
    // (high) edge wins on y.
    let push_x = low(x).or_else(|| high(x, world.width)).unwrap_or(0.0);
    let push_y = high(y, world.height).or_else(|| low(y)).unwrap_or(0.0);

    Vector2D::new(push_x, push_y)
}

/// Pulls toward the single nearest attractor closer than
/// `attractor_distance`. Equal distances resolve to the earlier attractor.
pub fn attraction(boid: &Boid, attractors: &[Marker], config: &FlockConfig) -> Vector2D {
    let mut nearest: Option<(&Marker, f32)> = None;

    for attractor in attractors {
        let distance = boid.position.distance(&attractor.position);
        if distance >= config.attractor_distance {
            continue;
        }
        if nearest.map_or(true, |(_, best)| distance < best) {
            nearest = Some((attractor, distance));
        }
    }

    match nearest {
        Some((attractor, _)) => {
            let divisor = safe_divisor(config.attractor_percent);
            (attractor.position - boid.position).divide_components(divisor, divisor)
        }
        None => Vector2D::zero(),
    }
}

/// Pushes away from every detractor within `detractor_distance`. Each push
/// points from the detractor to the boid and grows linearly from zero at the
/// edge of the radius.
pub fn detraction(boid: &Boid, detractors: &[Marker], config: &FlockConfig) -> Vector2D {
    if detractors.is_empty() {
        return Vector2D::zero();
    }

    let range = config.detractor_distance;
    let mut sum = Vector2D::zero();

    for detractor in detractors {
        let distance = boid.position.distance(&detractor.position);
        if distance > range {
            continue;
        }
        let away = (boid.position - detractor.position).normalize();
        sum += away * (range - distance);
    }

    let divisor = safe_divisor(config.detractor_percent);
    sum.divide_components(divisor, divisor)
}

/// Uniform noise in `[-jitter, jitter]` on each axis.
pub fn jitter<R: Rng>(rng: &mut R, config: &FlockConfig) -> Vector2D {
    let amount = config.jitter.abs();
    if amount == 0.0 || !amount.is_finite() {
        return Vector2D::zero();
    }

    // Scaled unit samples instead of `gen_range` so huge magnitudes cannot
    // overflow the range width.
    let x = rng.gen::<f32>() * 2.0 - 1.0;
    let y = rng.gen::<f32>() * 2.0 - 1.0;
    Vector2D::new(x * amount, y * amount)
}

/// Constant push of `wind_power` toward `wind_direction` degrees.
pub fn wind(config: &FlockConfig) -> Vector2D {
    if config.wind_power == 0.0 {
        return Vector2D::zero();
    }
    Vector2D::from_angle(config.wind_direction.to_radians(), config.wind_power)
}

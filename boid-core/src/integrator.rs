use crate::behavior::Adjustments;
use crate::boid::Boid;
use crate::config::FlockConfig;
use crate::environment::World;

/// Produces the next state of `boid` from its rule adjustments.
///
/// Velocity is clamped per axis to the speed limit before the position moves
/// by `velocity * dt`. With `wrap_around` the boid teleports across edges;
/// otherwise nothing keeps it inside the world except wall avoidance.
pub fn integrate(
    boid: &Boid,
    adjustments: &Adjustments,
    config: &FlockConfig,
    world: World,
    dt: f32,
) -> Boid {
    let mut next = *boid;
    next.velocity += adjustments.total();
    next.clamp_velocity(config.speed_limit());

    let moved = next.position + next.velocity * dt;
    if moved.is_finite() {
        next.position = moved;
    } else {
        log::warn!(
            "position overflow at {:?} (dt={}), keeping previous position",
            boid.position,
            dt
        );
    }

    if config.wrap_around {
        next.wrap_edges(world.width, world.height);
    }

    next
}

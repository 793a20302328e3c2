//! Flocking simulation core.
//!
//! A [`Flock`] owns the boids, the attractor/detractor [`Environment`] and the
//! [`FlockConfig`]. Renderers and input handlers live outside this crate: they
//! read [`Flock::boids`] and call the mutation entry points between frames.

pub mod behavior;
pub mod boid;
pub mod config;
pub mod environment;
pub mod error;
pub mod flock;
pub mod integrator;
pub mod vector;

pub use behavior::Adjustments;
pub use boid::Boid;
pub use config::{safe_divisor, FlockConfig, ParamValue, Parameter};
pub use environment::{Environment, Marker, MarkerId, MarkerKind, World};
pub use error::{FlockError, Result};
pub use flock::Flock;
pub use vector::Vector2D;

/// Re-exported so callers can build the RNG `Flock::with_rng` expects
/// without depending on `rand` themselves.
pub use rand;

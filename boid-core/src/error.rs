use thiserror::Error;

use crate::environment::MarkerId;

/// Errors returned by [`crate::Flock`] entry points.
///
/// Rule evaluation itself never fails; these only cover bad input from the
/// outside (time steps, parameter events, stale marker handles).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FlockError {
    #[error("time step must be finite and non-negative, got {0}")]
    InvalidTimeStep(f32),

    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),

    #[error("invalid value for `{name}`: {reason}")]
    InvalidParameterValue { name: &'static str, reason: String },

    #[error("no marker with id {0}")]
    UnknownMarker(MarkerId),

    #[error("world dimensions must be finite and positive, got {width}x{height}")]
    InvalidWorld { width: f32, height: f32 },
}

pub type Result<T, E = FlockError> = core::result::Result<T, E>;

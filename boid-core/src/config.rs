use core::fmt;
use core::ops::RangeInclusive;
use core::str::FromStr;

use crate::error::{FlockError, Result};

/// Smallest divisor any `(101 - percent)` style rule formula will use.
pub const MIN_DIVISOR: f32 = 1.0;

/// Tunable parameters for the flocking rules.
///
/// Every field can be changed between frames by an external control surface,
/// either directly or by name through [`FlockConfig::set`]. Values outside the
/// ranges reported by [`Parameter::range`] are accepted; the rule engine
/// floors its divisors and discards non-finite results instead of failing.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct FlockConfig {
    /// Cohesion: neighbors closer than this pull the boid toward their center.
    pub center_of_mass_distance: f32,
    pub center_of_mass_percent: f32,
    /// Separation: neighbors closer than this push the boid away.
    pub distance_unit: f32,
    pub distance_percent: f32,
    /// Alignment: neighbors closer than this pull the velocity toward theirs.
    pub match_velocity_distance: f32,
    pub match_velocity_percent: f32,
    pub attractor_distance: f32,
    pub attractor_percent: f32,
    pub detractor_distance: f32,
    pub detractor_percent: f32,
    /// Per-axis velocity limit, in units per second.
    pub max_speed: f32,
    pub jitter: f32,
    /// Margin from each edge inside which wall avoidance starts steering.
    pub wall_distance: f32,
    /// Degrees, counter-clockwise from the positive x axis.
    pub wind_direction: f32,
    pub wind_power: f32,
    pub wrap_around: bool,
}

impl Default for FlockConfig {
    fn default() -> Self {
        Self {
            center_of_mass_distance: 265.0,
            center_of_mass_percent: 17.0,
            distance_unit: 23.0,
            distance_percent: 49.0,
            match_velocity_distance: 42.0,
            match_velocity_percent: 68.0,
            attractor_distance: 200.0,
            attractor_percent: 93.0,
            detractor_distance: 200.0,
            detractor_percent: 93.0,
            max_speed: 200.0,
            jitter: 4.0,
            wall_distance: 0.0,
            wind_direction: 0.0,
            wind_power: 0.0,
            wrap_around: false,
        }
    }
}

/// Maps a steering percentage onto the divisor used by the cohesion,
/// alignment, attractor and detractor formulas.
///
/// `percent` in `[0, 100]` gives a divisor in `[1, 101]`. Anything that would
/// produce a divisor below [`MIN_DIVISOR`] (including NaN) is floored to it.
pub fn safe_divisor(percent: f32) -> f32 {
    let divisor = 101.0 - percent;
    if divisor.is_nan() {
        MIN_DIVISOR
    } else {
        divisor.clamp(MIN_DIVISOR, f32::MAX)
    }
}

impl FlockConfig {
    /// The speed limit as the integrator and `explode` apply it.
    pub fn speed_limit(&self) -> f32 {
        if self.max_speed.is_nan() {
            0.0
        } else {
            self.max_speed.abs().min(f32::MAX)
        }
    }

    pub fn get(&self, parameter: Parameter) -> ParamValue {
        use Parameter::*;
        let number = match parameter {
            CenterOfMassDistance => self.center_of_mass_distance,
            CenterOfMassPercent => self.center_of_mass_percent,
            DistanceUnit => self.distance_unit,
            DistancePercent => self.distance_percent,
            MatchVelocityDistance => self.match_velocity_distance,
            MatchVelocityPercent => self.match_velocity_percent,
            AttractorDistance => self.attractor_distance,
            AttractorPercent => self.attractor_percent,
            DetractorDistance => self.detractor_distance,
            DetractorPercent => self.detractor_percent,
            MaxSpeed => self.max_speed,
            Jitter => self.jitter,
            WallDistance => self.wall_distance,
            WindDirection => self.wind_direction,
            WindPower => self.wind_power,
            WrapAround => return ParamValue::Flag(self.wrap_around),
        };
        ParamValue::Number(number)
    }

    /// Updates one parameter. Numbers are stored as given (no range clamping)
    /// but must be finite, and the value kind must match the parameter.
    pub fn set(&mut self, parameter: Parameter, value: ParamValue) -> Result<()> {
        let invalid = |reason: String| FlockError::InvalidParameterValue {
            name: parameter.name(),
            reason,
        };

        if parameter == Parameter::WrapAround {
            return match value {
                ParamValue::Flag(flag) => {
                    self.wrap_around = flag;
                    Ok(())
                }
                ParamValue::Number(_) => Err(invalid("expected a boolean".to_string())),
            };
        }

        let number = match value {
            ParamValue::Flag(_) => return Err(invalid("expected a number".to_string())),
            ParamValue::Number(n) if !n.is_finite() => {
                return Err(invalid(format!("{} is not finite", n)))
            }
            ParamValue::Number(n) => n,
        };

        if let Some(slot) = self.number_slot(parameter) {
            *slot = number;
        }
        Ok(())
    }

    fn number_slot(&mut self, parameter: Parameter) -> Option<&mut f32> {
        use Parameter::*;
        let slot = match parameter {
            CenterOfMassDistance => &mut self.center_of_mass_distance,
            CenterOfMassPercent => &mut self.center_of_mass_percent,
            DistanceUnit => &mut self.distance_unit,
            DistancePercent => &mut self.distance_percent,
            MatchVelocityDistance => &mut self.match_velocity_distance,
            MatchVelocityPercent => &mut self.match_velocity_percent,
            AttractorDistance => &mut self.attractor_distance,
            AttractorPercent => &mut self.attractor_percent,
            DetractorDistance => &mut self.detractor_distance,
            DetractorPercent => &mut self.detractor_percent,
            MaxSpeed => &mut self.max_speed,
            Jitter => &mut self.jitter,
            WallDistance => &mut self.wall_distance,
            WindDirection => &mut self.wind_direction,
            WindPower => &mut self.wind_power,
            WrapAround => return None,
        };
        Some(slot)
    }

    /// Same as [`FlockConfig::set`] but looks the parameter up by name.
    pub fn set_by_name(&mut self, name: &str, value: ParamValue) -> Result<()> {
        let parameter: Parameter = name.parse()?;
        self.set(parameter, value)
    }

    /// Pulls every numeric field back into its control-panel range.
    pub fn clamp_to_ranges(&mut self) {
        for parameter in Parameter::ALL {
            if let (Some(range), Some(slot)) = (parameter.range(), self.number_slot(parameter)) {
                *slot = if slot.is_nan() {
                    *range.start()
                } else {
                    slot.clamp(*range.start(), *range.end())
                };
            }
        }
    }
}

/// A value carried by a parameter-change event.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum ParamValue {
    Number(f32),
    Flag(bool),
}

impl From<f32> for ParamValue {
    fn from(value: f32) -> Self {
        ParamValue::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Flag(value)
    }
}

/// The fixed set of tunable parameters, addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    CenterOfMassDistance,
    CenterOfMassPercent,
    DistanceUnit,
    DistancePercent,
    MatchVelocityDistance,
    MatchVelocityPercent,
    AttractorDistance,
    AttractorPercent,
    DetractorDistance,
    DetractorPercent,
    MaxSpeed,
    Jitter,
    WallDistance,
    WindDirection,
    WindPower,
    WrapAround,
}

impl Parameter {
    pub const ALL: [Parameter; 16] = [
        Parameter::CenterOfMassDistance,
        Parameter::CenterOfMassPercent,
        Parameter::DistanceUnit,
        Parameter::DistancePercent,
        Parameter::MatchVelocityDistance,
        Parameter::MatchVelocityPercent,
        Parameter::AttractorDistance,
        Parameter::AttractorPercent,
        Parameter::DetractorDistance,
        Parameter::DetractorPercent,
        Parameter::MaxSpeed,
        Parameter::Jitter,
        Parameter::WallDistance,
        Parameter::WindDirection,
        Parameter::WindPower,
        Parameter::WrapAround,
    ];

    /// Snake-case name, identical to the serialized field name in [`FlockConfig`].
    pub fn name(self) -> &'static str {
        use Parameter::*;
        match self {
            CenterOfMassDistance => "center_of_mass_distance",
            CenterOfMassPercent => "center_of_mass_percent",
            DistanceUnit => "distance_unit",
            DistancePercent => "distance_percent",
            MatchVelocityDistance => "match_velocity_distance",
            MatchVelocityPercent => "match_velocity_percent",
            AttractorDistance => "attractor_distance",
            AttractorPercent => "attractor_percent",
            DetractorDistance => "detractor_distance",
            DetractorPercent => "detractor_percent",
            MaxSpeed => "max_speed",
            Jitter => "jitter",
            WallDistance => "wall_distance",
            WindDirection => "wind_direction",
            WindPower => "wind_power",
            WrapAround => "wrap_around",
        }
    }

    /// Slider range offered by the control panel. `None` for the boolean flag.
    pub fn range(self) -> Option<RangeInclusive<f32>> {
        use Parameter::*;
        let range = match self {
            CenterOfMassDistance | MatchVelocityDistance => 0.0..=500.0,
            AttractorDistance | DetractorDistance => 0.0..=500.0,
            CenterOfMassPercent | DistancePercent | MatchVelocityPercent => 0.0..=100.0,
            AttractorPercent | DetractorPercent => 0.0..=100.0,
            DistanceUnit => 0.0..=200.0,
            MaxSpeed => 0.0..=1000.0,
            Jitter => 0.0..=100.0,
            WallDistance => 0.0..=362.0,
            WindDirection => 0.0..=360.0,
            WindPower => 0.0..=15.0,
            WrapAround => return None,
        };
        Some(range)
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Parameter {
    type Err = FlockError;

    fn from_str(s: &str) -> Result<Self> {
        Parameter::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| FlockError::UnknownParameter(s.to_string()))
    }
}

use crate::{DriverParams, LoadError};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The settings of a simulation run.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct SimConfig {
    /// The fixed integration time step in s.
    pub time_step: f64,
    /// The simulated time after which a run stops, in s. Must be finite.
    pub max_time: f64,
    /// The length of the road in m. Only used for rendering.
    pub road_length: f64,
    /// The driver parameters of vehicles with "default" driver options.
    pub default_driver: DriverParams,
    /// The position at spawn of vehicles which do not specify one, in m.
    pub initial_position: f64,
    /// The velocity at spawn of vehicles which do not specify one, in m/s.
    pub initial_velocity: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_step: 0.05,     // s
            max_time: 120.0,     // s
            road_length: 1000.0, // m
            default_driver: DriverParams::default(),
            initial_position: 0.0,
            initial_velocity: 0.0,
        }
    }
}

impl SimConfig {
    /// Checks that the configuration can drive a simulation.
    pub fn validate(&self) -> Result<(), LoadError> {
        let invalid = |reason: String| Err(LoadError::InvalidConfig(reason));
        if !(self.time_step.is_finite() && self.time_step > 0.0) {
            return invalid(format!("timeStep must be positive, got {}", self.time_step));
        }
        if !(self.max_time.is_finite() && self.max_time >= 0.0) {
            return invalid(format!(
                "maxTime must be a non-negative number, got {}",
                self.max_time
            ));
        }
        if !(self.road_length.is_finite() && self.road_length > 0.0) {
            return invalid(format!(
                "roadLength must be positive, got {}",
                self.road_length
            ));
        }
        if !(self.initial_position.is_finite() && self.initial_velocity.is_finite()) {
            return invalid("initial position and velocity must be finite".into());
        }
        self.default_driver
            .validate()
            .map_err(|reason| LoadError::InvalidConfig(format!("defaultDriver: {}", reason)))
    }
}

//! Loading of traffic data and configuration from JSON.
//!
//! Traffic data is an array of vehicles, front of the lane first:
//!
//! ```json
//! [
//!     {
//!         "spawnTime": 10,
//!         "driverOpts": "default",
//!         "rogueBehaviour": [
//!             { "implementTime": 10, "rogueOpts": [["desiredVelocity", 12.5], ["safeTimeHeadway", 3]] },
//!             { "implementTime": 200, "rogueOpts": [["resetDriverOpts", 0]] }
//!         ]
//!     }
//! ]
//! ```
//!
//! `driverOpts` is either `"default"` or an object holding all five driver parameters,
//! and optionally `initialPosition` and `initialVelocity`. `implementTime` is relative
//! to the vehicle's spawn time.

use crate::{BehaviourSpec, DriverParams, LoadError, ParamChange, SimConfig, VehicleSpec};
use serde::Deserialize;
use std::path::Path;

/// The name of the driver options preset which uses the configured defaults.
pub const DEFAULT_PRESET: &str = "default";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VehicleRecord {
    spawn_time: f64,
    driver_opts: DriverOptsRecord,
    #[serde(default)]
    rogue_behaviour: Vec<BehaviourRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DriverOptsRecord {
    Preset(String),
    Custom(CustomDriverOpts),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomDriverOpts {
    #[serde(flatten)]
    params: DriverParams,
    initial_position: Option<f64>,
    initial_velocity: Option<f64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BehaviourRecord {
    implement_time: f64,
    rogue_opts: Vec<(String, f64)>,
}

impl VehicleRecord {
    fn into_spec(self, index: usize, config: &SimConfig) -> Result<VehicleSpec, LoadError> {
        let (driver, pos, vel) = match self.driver_opts {
            DriverOptsRecord::Preset(name) if name == DEFAULT_PRESET => (
                config.default_driver,
                config.initial_position,
                config.initial_velocity,
            ),
            DriverOptsRecord::Preset(name) => return Err(LoadError::UnknownPreset { index, name }),
            DriverOptsRecord::Custom(opts) => (
                opts.params,
                opts.initial_position.unwrap_or(config.initial_position),
                opts.initial_velocity.unwrap_or(config.initial_velocity),
            ),
        };
        let behaviours = self
            .rogue_behaviour
            .into_iter()
            .map(|record| BehaviourSpec {
                offset: record.implement_time,
                changes: record
                    .rogue_opts
                    .iter()
                    .map(|(name, value)| ParamChange::new(name, *value))
                    .collect(),
            })
            .collect();
        let spec = VehicleSpec {
            spawn_time: self.spawn_time,
            driver,
            initial_pos: pos,
            initial_vel: vel,
            behaviours,
        };
        spec.validate(index)?;
        Ok(spec)
    }
}

/// Parses traffic data, resolving `"default"` driver options against `config`.
pub fn parse_traffic_list(json: &str, config: &SimConfig) -> Result<Vec<VehicleSpec>, LoadError> {
    let records: Vec<VehicleRecord> = serde_json::from_str(json)?;
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.into_spec(index, config))
        .collect()
}

/// Reads traffic data from a file. See [parse_traffic_list].
pub fn load_traffic_list(
    path: impl AsRef<Path>,
    config: &SimConfig,
) -> Result<Vec<VehicleSpec>, LoadError> {
    let specs = parse_traffic_list(&read(path.as_ref())?, config)?;
    log::info!("loaded {} vehicles from {}", specs.len(), path.as_ref().display());
    Ok(specs)
}

/// Parses a configuration. Missing settings take their default values.
pub fn parse_config(json: &str) -> Result<SimConfig, LoadError> {
    let config: SimConfig = serde_json::from_str(json)?;
    config.validate()?;
    Ok(config)
}

/// Reads a configuration from a file. See [parse_config].
pub fn load_config(path: impl AsRef<Path>) -> Result<SimConfig, LoadError> {
    parse_config(&read(path.as_ref())?)
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

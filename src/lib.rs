//! A single lane traffic simulation.
//!
//! Vehicles spawn at scheduled times, follow the vehicle ahead of them using the
//! Intelligent Driver Model, and may have their driver parameters changed at
//! scheduled times ("rogue behaviour"). The equations of motion are integrated
//! with a fixed step fourth order Runge-Kutta scheme.

pub use config::SimConfig;
pub use error::LoadError;
pub use integrate::{Integrator, Kinematics};
pub use record::{Frame, Recorder};
pub use render::StripRenderer;
pub use simulation::Simulation;
pub use snapshot::{Snapshot, TickObserver, VehicleState};
pub use vehicle::{
    BehaviourParam, BehaviourSpec, DriverParams, Leader, ParamChange, ParamChanges, Vehicle,
    VehicleSpec, RESET_DRIVER_OPTS,
};

mod config;
mod error;
#[cfg(feature = "serde")]
pub mod input;
pub mod integrate;
mod record;
mod render;
mod simulation;
mod snapshot;
mod vehicle;

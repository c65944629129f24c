pub use self::acceleration::Leader;
pub use self::behaviour::{
    BehaviourParam, BehaviourSpec, ParamChange, ParamChanges, RESET_DRIVER_OPTS,
};
use self::behaviour::BehaviourQueue;
use crate::LoadError;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod acceleration;
mod behaviour;

/// The parameters of a driver's car following behaviour.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct DriverParams {
    /// The velocity the driver tries to reach in free flow, in m/s.
    pub desired_velocity: f64,
    /// The desired time gap to the vehicle ahead in s.
    pub safe_time_headway: f64,
    /// The maximum acceleration in m/s<sup>2</sup>.
    pub max_acceleration: f64,
    /// The comfortable deceleration in m/s<sup>2</sup>, a positive number.
    pub desired_deceleration: f64,
    /// The minimum gap kept to a stopped vehicle ahead, in m.
    pub jam_distance: f64,
}

impl Default for DriverParams {
    fn default() -> Self {
        Self {
            desired_velocity: 13.4,    // 30mph
            safe_time_headway: 3.3,    // s
            max_acceleration: 4.3,     // m/s^2
            desired_deceleration: 2.3, // m/s^2
            jam_distance: 1.5,         // m
        }
    }
}

impl DriverParams {
    /// Checks that the parameters describe a physically meaningful driver.
    pub fn validate(&self) -> Result<(), String> {
        check_positive("desiredVelocity", self.desired_velocity)?;
        check_positive("maxAcceleration", self.max_acceleration)?;
        check_positive("desiredDeceleration", self.desired_deceleration)?;
        check_non_negative("safeTimeHeadway", self.safe_time_headway)?;
        check_non_negative("jamDistance", self.jam_distance)
    }
}

fn check_positive(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(format!("{} must be positive, got {}", name, value))
    }
}

fn check_non_negative(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{} must not be negative, got {}", name, value))
    }
}

/// Checks that a behaviour sets a driver parameter to a value it could have at spawn.
fn check_change(change: &ParamChange) -> Result<(), String> {
    let name = change.param.name();
    match change.param {
        BehaviourParam::DesiredVelocity
        | BehaviourParam::MaxAcceleration
        | BehaviourParam::DesiredDeceleration => check_positive(name, change.value),
        BehaviourParam::SafeTimeHeadway | BehaviourParam::JamDistance => {
            check_non_negative(name, change.value)
        }
        BehaviourParam::Reset | BehaviourParam::Unknown(_) => Ok(()),
    }
}

/// The attributes of a vehicle to be simulated.
#[derive(Clone, Debug, PartialEq)]
pub struct VehicleSpec {
    /// The simulated time at which the vehicle enters the road, in s.
    pub spawn_time: f64,
    /// The driver parameters at spawn.
    pub driver: DriverParams,
    /// The position at spawn in m.
    pub initial_pos: f64,
    /// The velocity at spawn in m/s.
    pub initial_vel: f64,
    /// Scheduled changes in the driver's behaviour.
    pub behaviours: Vec<BehaviourSpec>,
}

impl VehicleSpec {
    /// Creates a vehicle starting from rest at the beginning of the road.
    pub fn new(spawn_time: f64, driver: DriverParams) -> Self {
        Self {
            spawn_time,
            driver,
            initial_pos: 0.0,
            initial_vel: 0.0,
            behaviours: vec![],
        }
    }

    /// Sets the position and velocity of the vehicle at spawn.
    pub fn with_initial_state(mut self, pos: f64, vel: f64) -> Self {
        self.initial_pos = pos;
        self.initial_vel = vel;
        self
    }

    /// Schedules a change in behaviour.
    pub fn with_behaviour(mut self, behaviour: BehaviourSpec) -> Self {
        self.behaviours.push(behaviour);
        self
    }

    /// Checks the spec, reporting errors against the vehicle at `index`.
    pub fn validate(&self, index: usize) -> Result<(), LoadError> {
        let invalid = |reason: String| LoadError::InvalidVehicle { index, reason };
        if !(self.spawn_time.is_finite() && self.spawn_time >= 0.0) {
            return Err(invalid(format!(
                "spawnTime must be a non-negative number, got {}",
                self.spawn_time
            )));
        }
        if !(self.initial_pos.is_finite() && self.initial_vel.is_finite()) {
            return Err(invalid("initial position and velocity must be finite".into()));
        }
        self.driver.validate().map_err(invalid)?;
        for behaviour in &self.behaviours {
            if !behaviour.offset.is_finite() {
                return Err(invalid(format!(
                    "implementTime must be finite, got {}",
                    behaviour.offset
                )));
            }
            for change in &behaviour.changes {
                check_change(change)
                    .map_err(|reason| invalid(format!("rogueOpts: {}", reason)))?;
            }
        }
        Ok(())
    }
}

/// A simulated vehicle.
#[derive(Clone, Debug)]
pub struct Vehicle {
    /// The vehicle's place in the lane; 0 is the front.
    index: usize,
    /// The simulated time at which the vehicle spawns.
    spawn_time: f64,
    /// Whether the vehicle has spawned. Never reverts.
    spawned: bool,
    /// The position along the road in m.
    pos: f64,
    /// The velocity in m/s.
    vel: f64,
    /// The driver parameters given at construction.
    driver_opts: DriverParams,
    /// The driver parameters currently in effect.
    params: DriverParams,
    /// Behaviours not yet applied.
    pending: BehaviourQueue,
    /// The number of parameter changes discarded for naming no parameter.
    discarded: usize,
}

impl Vehicle {
    /// Creates a new vehicle.
    pub(crate) fn new(index: usize, spec: &VehicleSpec) -> Self {
        Self {
            index,
            spawn_time: spec.spawn_time,
            spawned: false,
            pos: spec.initial_pos,
            vel: spec.initial_vel,
            driver_opts: spec.driver,
            params: spec.driver,
            pending: BehaviourQueue::new(spec.spawn_time, &spec.behaviours),
            discarded: 0,
        }
    }

    /// The vehicle's place in the lane; the vehicle ahead has index `index - 1`.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The simulated time at which the vehicle spawns, in s.
    pub fn spawn_time(&self) -> f64 {
        self.spawn_time
    }

    /// Whether the vehicle is on the road.
    pub fn is_spawned(&self) -> bool {
        self.spawned
    }

    /// The position along the road in m.
    pub fn pos(&self) -> f64 {
        self.pos
    }

    /// The velocity in m/s.
    pub fn vel(&self) -> f64 {
        self.vel
    }

    /// The driver parameters currently in effect.
    pub fn params(&self) -> &DriverParams {
        &self.params
    }

    /// The driver parameters the vehicle was created with.
    pub fn driver_opts(&self) -> &DriverParams {
        &self.driver_opts
    }

    /// The absolute implementation times of the behaviours not yet applied, in ascending order.
    pub fn pending_behaviours(&self) -> impl Iterator<Item = f64> + '_ {
        self.pending.times()
    }

    /// The number of parameter changes which were discarded because
    /// they did not name a driver parameter.
    pub fn discarded_params(&self) -> usize {
        self.discarded
    }

    /// Spawns the vehicle and applies any behaviours which have come into effect.
    ///
    /// # Parameters
    /// * `now` - The current simulated time in s
    pub(crate) fn on_tick(&mut self, now: f64) {
        self.update_spawn(now);
        if self.spawned {
            self.update_behaviours(now);
        }
    }

    /// Sets the vehicle's position and velocity.
    pub(crate) fn set_state(&mut self, pos: f64, vel: f64) {
        self.pos = pos;
        self.vel = vel;
    }

    fn update_spawn(&mut self, now: f64) {
        if !self.spawned && self.spawn_time <= now {
            self.spawned = true;
            log::debug!("vehicle {} spawned at t={:.2}", self.index, now);
        }
    }

    fn update_behaviours(&mut self, now: f64) {
        while let Some(behaviour) = self.pending.pop_due(now) {
            log::debug!(
                "vehicle {}: applying behaviour scheduled for t={:.2} at t={:.2}",
                self.index,
                behaviour.implement_time,
                now
            );
            for change in &behaviour.changes {
                self.apply(change);
            }
        }
    }

    fn apply(&mut self, change: &ParamChange) {
        let params = &mut self.params;
        match &change.param {
            BehaviourParam::DesiredVelocity => params.desired_velocity = change.value,
            BehaviourParam::SafeTimeHeadway => params.safe_time_headway = change.value,
            BehaviourParam::MaxAcceleration => params.max_acceleration = change.value,
            BehaviourParam::DesiredDeceleration => params.desired_deceleration = change.value,
            BehaviourParam::JamDistance => params.jam_distance = change.value,
            BehaviourParam::Reset => *params = self.driver_opts,
            BehaviourParam::Unknown(name) => {
                self.discarded += 1;
                log::warn!(
                    "vehicle {}: ignoring change to unknown parameter '{}'",
                    self.index,
                    name
                );
            }
        }
    }
}

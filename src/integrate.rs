//! Fourth order Runge-Kutta integration of the car following equations.

use crate::vehicle::{DriverParams, Leader};
use crate::Vehicle;

/// The position and velocity of a vehicle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Kinematics {
    /// The position in m.
    pub pos: f64,
    /// The velocity in m/s.
    pub vel: f64,
}

/// Advances the vehicles of a lane by fixed time steps.
///
/// Every vehicle's next state is computed from the same pre-step state of the lane,
/// and only written back once all vehicles have been processed.
#[derive(Clone, Debug)]
pub struct Integrator {
    /// The time step in s.
    dt: f64,
    /// The next state of each vehicle, or `None` if it is not spawned.
    next: Vec<Option<Kinematics>>,
}

impl Integrator {
    /// Creates an integrator with time step `dt` in seconds.
    pub fn new(dt: f64) -> Self {
        Self { dt, next: vec![] }
    }

    /// The time step in s.
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Integrates the positions and velocities of all spawned vehicles.
    pub fn step(&mut self, vehicles: &mut [Vehicle]) {
        self.compute(vehicles);
        self.commit(vehicles);
    }

    /// Computes the next state of every vehicle into the scratch buffer.
    fn compute(&mut self, vehicles: &[Vehicle]) {
        self.next.clear();
        self.next.extend(vehicles.iter().enumerate().map(|(idx, vehicle)| {
            if !vehicle.is_spawned() {
                return None;
            }
            let leader = leader_of(vehicles, idx);
            let state = Kinematics {
                pos: vehicle.pos(),
                vel: vehicle.vel(),
            };
            Some(rk4(state, leader, vehicle.params(), self.dt))
        }));
    }

    /// Writes the scratch buffer back to the vehicles.
    fn commit(&mut self, vehicles: &mut [Vehicle]) {
        for (vehicle, next) in vehicles.iter_mut().zip(self.next.drain(..)) {
            if let Some(next) = next {
                vehicle.set_state(next.pos, next.vel);
            }
        }
    }
}

/// Gets the leader of the vehicle at `idx`: the vehicle immediately ahead in the lane,
/// or a free flow leader if that vehicle does not exist or has not spawned.
pub fn leader_of(vehicles: &[Vehicle], idx: usize) -> Leader {
    let own_vel = vehicles[idx].vel();
    idx.checked_sub(1)
        .map(|ahead| &vehicles[ahead])
        .filter(|ahead| ahead.is_spawned())
        .map(|ahead| Leader {
            pos: ahead.pos(),
            vel: ahead.vel(),
        })
        .unwrap_or_else(|| Leader::free_flow(own_vel))
}

/// Performs a single Runge-Kutta step of `dx/dt = v`, `dv/dt = acc(x, v)`.
/// The leader is held fixed for the duration of the step.
pub fn rk4(state: Kinematics, leader: Leader, params: &DriverParams, dt: f64) -> Kinematics {
    let Kinematics { pos, vel } = state;
    let dvdt = |pos: f64, vel: f64| params.acceleration(pos, vel, leader);

    let k0 = dt * vel;
    let l0 = dt * dvdt(pos, vel);

    let k1 = dt * (vel + 0.5 * l0);
    let l1 = dt * dvdt(pos + 0.5 * k0, vel + 0.5 * l0);

    let k2 = dt * (vel + 0.5 * l1);
    let l2 = dt * dvdt(pos + 0.5 * k1, vel + 0.5 * l1);

    let k3 = dt * (vel + l2);
    let l3 = dt * dvdt(pos + k2, vel + l2);

    Kinematics {
        pos: pos + (k0 + 2.0 * k1 + 2.0 * k2 + k3) / 6.0,
        vel: vel + (l0 + 2.0 * l1 + 2.0 * l2 + l3) / 6.0,
    }
}

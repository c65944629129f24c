//! Read-only views of the simulation handed to renderers and recorders.

use crate::Vehicle;

/// The state of the lane at one point in simulated time.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    time: f64,
    vehicles: &'a [Vehicle],
}

/// The state of one vehicle in a [Snapshot].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VehicleState {
    pub index: usize,
    pub pos: f64,
    pub vel: f64,
    pub is_spawned: bool,
}

impl<'a> Snapshot<'a> {
    pub(crate) fn new(time: f64, vehicles: &'a [Vehicle]) -> Self {
        Self { time, vehicles }
    }

    /// The simulated time in s.
    pub fn time(&self) -> f64 {
        self.time
    }

    /// The number of vehicles, spawned or not.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Whether the snapshot holds no vehicles.
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    /// The state of every vehicle, front of the lane first.
    pub fn iter(&self) -> impl Iterator<Item = VehicleState> + 'a {
        self.vehicles.iter().map(|vehicle| VehicleState {
            index: vehicle.index(),
            pos: vehicle.pos(),
            vel: vehicle.vel(),
            is_spawned: vehicle.is_spawned(),
        })
    }

    /// The vehicles themselves.
    pub fn vehicles(&self) -> &'a [Vehicle] {
        self.vehicles
    }
}

/// Receives snapshots of the simulation as it runs.
///
/// Both hooks default to doing nothing. `()` is the observer which ignores everything,
/// and a pair of observers forwards each snapshot to both, in order.
pub trait TickObserver {
    /// Called once per tick after the vehicles have spawned and updated
    /// their behaviours, but before they move.
    fn before_integrate(&mut self, _snapshot: &Snapshot) {}

    /// Called once per tick after the vehicles have moved.
    fn after_integrate(&mut self, _snapshot: &Snapshot) {}
}

impl TickObserver for () {}

impl<T: TickObserver + ?Sized> TickObserver for &mut T {
    fn before_integrate(&mut self, snapshot: &Snapshot) {
        (**self).before_integrate(snapshot);
    }

    fn after_integrate(&mut self, snapshot: &Snapshot) {
        (**self).after_integrate(snapshot);
    }
}

impl<A: TickObserver, B: TickObserver> TickObserver for (A, B) {
    fn before_integrate(&mut self, snapshot: &Snapshot) {
        self.0.before_integrate(snapshot);
        self.1.before_integrate(snapshot);
    }

    fn after_integrate(&mut self, snapshot: &Snapshot) {
        self.0.after_integrate(snapshot);
        self.1.after_integrate(snapshot);
    }
}

use crate::integrate::Integrator;
use crate::snapshot::{Snapshot, TickObserver};
use crate::{LoadError, SimConfig, Vehicle, VehicleSpec};

/// A single lane traffic simulation.
#[derive(Clone, Debug)]
pub struct Simulation {
    /// The settings of the run.
    config: SimConfig,
    /// The vehicles being simulated, front of the lane first.
    vehicles: Vec<Vehicle>,
    /// The integrator, which owns the buffer of next vehicle states.
    integrator: Integrator,
    /// The current frame of simulation.
    frame: usize,
}

impl Simulation {
    /// Creates a new simulation with no vehicles.
    pub fn new(config: SimConfig) -> Result<Self, LoadError> {
        config.validate()?;
        Ok(Self {
            config,
            vehicles: vec![],
            integrator: Integrator::new(config.time_step),
            frame: 0,
        })
    }

    /// Creates a new simulation with the given vehicles, front of the lane first.
    pub fn with_vehicles<'a>(
        config: SimConfig,
        specs: impl IntoIterator<Item = &'a VehicleSpec>,
    ) -> Result<Self, LoadError> {
        let mut sim = Self::new(config)?;
        for spec in specs {
            sim.add_vehicle(spec)?;
        }
        Ok(sim)
    }

    /// Adds a vehicle to the back of the lane and returns its index.
    ///
    /// Vehicles must be added in the order they sit on the road, since each vehicle
    /// follows the one added before it. A vehicle must never spawn at or ahead of
    /// the position of the vehicle in front of it.
    pub fn add_vehicle(&mut self, spec: &VehicleSpec) -> Result<usize, LoadError> {
        let index = self.vehicles.len();
        spec.validate(index)?;
        self.vehicles.push(Vehicle::new(index, spec));
        Ok(index)
    }

    /// The settings of the run.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Gets the current simulation frame index.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Gets the current simulated time in s.
    pub fn time(&self) -> f64 {
        self.frame as f64 * self.config.time_step
    }

    /// Whether the simulated time has passed the configured maximum.
    pub fn is_finished(&self) -> bool {
        self.time() > self.config.max_time
    }

    /// Advances the simulation by one time step.
    pub fn step(&mut self) {
        self.step_observed(&mut ());
    }

    /// Advances the simulation by one time step, reporting to `observer`.
    pub fn step_observed<O: TickObserver + ?Sized>(&mut self, observer: &mut O) {
        let now = self.time();
        self.update_vehicles(now);
        observer.before_integrate(&Snapshot::new(now, &self.vehicles));
        self.integrator.step(&mut self.vehicles);
        observer.after_integrate(&Snapshot::new(now, &self.vehicles));
        self.frame += 1;
    }

    /// Steps the simulation until it is finished, and returns the number of steps taken.
    pub fn run<O: TickObserver + ?Sized>(&mut self, observer: &mut O) -> usize {
        log::info!(
            "running {} vehicles from t={:.2} to t={:.2} with dt={}",
            self.vehicles.len(),
            self.time(),
            self.config.max_time,
            self.config.time_step
        );
        let start = self.frame;
        while !self.is_finished() {
            self.step_observed(observer);
        }
        let steps = self.frame - start;
        log::info!(
            "finished after {} steps at t={:.2}, {} of {} vehicles spawned",
            steps,
            self.time(),
            self.iter_vehicles().filter(|v| v.is_spawned()).count(),
            self.vehicles.len()
        );
        let discarded = self.discarded_params();
        if discarded > 0 {
            log::warn!("{} behaviour parameter changes were ignored", discarded);
        }
        steps
    }

    /// Returns an iterator over all the vehicles in the simulation, front of the lane first.
    pub fn iter_vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.iter()
    }

    /// Gets a reference to the vehicle with the given index.
    pub fn get_vehicle(&self, index: usize) -> Option<&Vehicle> {
        self.vehicles.get(index)
    }

    /// Gets a snapshot of the current state of the simulation.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.time(), &self.vehicles)
    }

    /// The total number of behaviour parameter changes ignored so far
    /// because they named no driver parameter.
    pub fn discarded_params(&self) -> usize {
        self.vehicles.iter().map(Vehicle::discarded_params).sum()
    }

    /// Spawns vehicles and applies due behaviours.
    fn update_vehicles(&mut self, now: f64) {
        for vehicle in &mut self.vehicles {
            vehicle.on_tick(now);
        }
    }
}

//! Tests that involve the simulation of a whole lane.

use assert_approx_eq::assert_approx_eq;
use lane_sim::{
    BehaviourSpec, DriverParams, Recorder, SimConfig, Simulation, Snapshot, TickObserver,
    VehicleSpec,
};

fn default_vehicle(spawn_time: f64) -> VehicleSpec {
    VehicleSpec::new(spawn_time, DriverParams::default())
}

/// Three default vehicles entering the road five seconds apart.
fn platoon() -> Vec<VehicleSpec> {
    vec![
        default_vehicle(0.0).with_behaviour(BehaviourSpec::new(
            20.0,
            [("desiredVelocity", 6.0), ("safeTimeHeadway", 1.0)],
        )),
        default_vehicle(5.0),
        default_vehicle(10.0).with_behaviour(BehaviourSpec::new(5.0, [("jamDistance", 3.0)])),
    ]
}

/// Test that a lone vehicle accelerates up to its desired velocity.
#[test]
fn free_flow_convergence() {
    let config = SimConfig {
        max_time: 60.0,
        ..Default::default()
    };
    let mut sim = Simulation::with_vehicles(config, [&default_vehicle(0.0)]).unwrap();

    let mut vel = 0.0;
    while !sim.is_finished() {
        sim.step();
        let next_vel = sim.get_vehicle(0).unwrap().vel();
        assert!(next_vel >= vel - 1e-12);
        assert!(next_vel < 13.4 + 1e-9);
        vel = next_vel;
    }
    assert_approx_eq!(vel, 13.4, 1e-6);
}

/// One default vehicle for 100 ticks; its position should match the area under
/// its recorded velocity curve.
#[test]
fn end_to_end_single_vehicle() {
    let mut sim = Simulation::with_vehicles(SimConfig::default(), [&default_vehicle(0.0)]).unwrap();
    let mut recorder = Recorder::new();
    for _ in 0..100 {
        sim.step_observed(&mut recorder);
    }
    assert_approx_eq!(sim.time(), 5.0);

    let vels: Vec<f64> = recorder.history(0).map(|(_, v)| v.vel).collect();
    assert_eq!(vels.len(), 100);
    let mut prev = 0.0;
    for vel in &vels {
        assert!(*vel > prev);
        assert!(*vel < 13.4);
        prev = *vel;
    }

    let dt = sim.config().time_step;
    let mut area = 0.0;
    let mut prev = 0.0;
    for vel in &vels {
        area += 0.5 * (prev + vel) * dt;
        prev = *vel;
    }
    assert_approx_eq!(sim.get_vehicle(0).unwrap().pos(), area, 1e-3);
}

/// Two identical runs produce identical output.
#[test]
fn determinism() {
    let record = || {
        let config = SimConfig {
            max_time: 40.0,
            ..Default::default()
        };
        let mut sim = Simulation::with_vehicles(config, &platoon()).unwrap();
        let mut recorder = Recorder::new();
        sim.run(&mut recorder);
        recorder.take()
    };
    let first = record();
    let second = record();
    assert_eq!(first.len(), 801);
    assert_eq!(first, second);
}

/// Records which vehicles are spawned before each integration.
#[derive(Default)]
struct SpawnLog(Vec<(f64, Vec<(f64, bool)>)>);

impl TickObserver for SpawnLog {
    fn before_integrate(&mut self, snapshot: &Snapshot) {
        let states = snapshot
            .vehicles()
            .iter()
            .map(|v| (v.spawn_time(), v.is_spawned()))
            .collect();
        self.0.push((snapshot.time(), states));
    }
}

#[test]
fn spawn_monotonicity() {
    let config = SimConfig {
        max_time: 20.0,
        ..Default::default()
    };
    let mut sim = Simulation::with_vehicles(config, &platoon()).unwrap();
    let mut log = SpawnLog::default();
    sim.run(&mut log);

    for (time, states) in &log.0 {
        for (spawn_time, spawned) in states {
            assert_eq!(*spawned, time >= spawn_time, "t={} spawn={}", time, spawn_time);
        }
    }
    assert!(sim.iter_vehicles().all(|v| v.is_spawned()));
}

#[test]
fn vehicles_keep_their_order() {
    let config = SimConfig {
        max_time: 60.0,
        ..Default::default()
    };
    let mut sim = Simulation::with_vehicles(config, &platoon()).unwrap();
    while !sim.is_finished() {
        sim.step();
        let vehicles: Vec<_> = sim.iter_vehicles().filter(|v| v.is_spawned()).collect();
        for pair in vehicles.windows(2) {
            assert!(pair[0].pos() > pair[1].pos());
        }
    }
}

/// Behaviours due at the same time are applied on the same tick,
/// and later behaviours wait for their time.
#[test]
fn behaviour_application_ordering() {
    let spec = default_vehicle(0.0)
        .with_behaviour(BehaviourSpec::new(25.0, [("jamDistance", 4.0)]))
        .with_behaviour(BehaviourSpec::new(10.0, [("desiredVelocity", 8.0)]))
        .with_behaviour(BehaviourSpec::new(10.0, [("maxAcceleration", 1.0)]));
    let mut sim = Simulation::with_vehicles(SimConfig::default(), [&spec]).unwrap();

    while sim.time() < 10.0 {
        sim.step();
        assert_eq!(*sim.get_vehicle(0).unwrap().params(), DriverParams::default());
    }
    sim.step();
    let params = *sim.get_vehicle(0).unwrap().params();
    assert_eq!(params.desired_velocity, 8.0);
    assert_eq!(params.max_acceleration, 1.0);
    assert_eq!(params.jam_distance, 1.5);

    while sim.time() < 25.0 {
        sim.step();
        assert_eq!(sim.get_vehicle(0).unwrap().params().jam_distance, 1.5);
    }
    sim.step();
    assert_eq!(sim.get_vehicle(0).unwrap().params().jam_distance, 4.0);
}

#[test]
fn reset_restores_original_parameters() {
    let spec = default_vehicle(2.0)
        .with_behaviour(BehaviourSpec::new(
            1.0,
            [
                ("desiredVelocity", 25.0),
                ("safeTimeHeadway", 0.8),
                ("maxAcceleration", 6.0),
                ("desiredDeceleration", 4.0),
                ("jamDistance", 0.5),
            ],
        ))
        .with_behaviour(BehaviourSpec::new(3.0, [("resetDriverOpts", 0.0)]));
    let mut sim = Simulation::with_vehicles(SimConfig::default(), [&spec]).unwrap();
    while sim.time() <= 3.5 {
        sim.step();
    }
    assert_eq!(sim.get_vehicle(0).unwrap().params().desired_velocity, 25.0);
    while sim.time() <= 5.5 {
        sim.step();
    }
    assert_eq!(*sim.get_vehicle(0).unwrap().params(), DriverParams::default());
}

/// A vehicle whose immediate predecessor has not spawned drives in free flow,
/// however close the vehicle further ahead is.
#[test]
fn leader_is_the_immediate_predecessor() {
    fn run(specs: &[VehicleSpec]) -> (f64, f64) {
        let mut sim = Simulation::with_vehicles(SimConfig::default(), specs).unwrap();
        for _ in 0..100 {
            sim.step();
        }
        let last = sim.iter_vehicles().last().unwrap();
        (last.pos(), last.vel())
    }

    let lone = default_vehicle(0.0).with_initial_state(0.0, 10.0);

    let free = run(&[lone.clone()]);
    let stopped_ahead = default_vehicle(0.0).with_initial_state(20.0, 0.0);
    let unspawned = default_vehicle(1000.0).with_initial_state(10.0, 0.0);

    assert_eq!(
        run(&[stopped_ahead.clone(), unspawned.clone(), lone.clone()]),
        free
    );
    let unspawned_front = default_vehicle(1000.0).with_initial_state(20.0, 0.0);
    assert_eq!(
        run(&[unspawned_front, unspawned.clone(), lone.clone()]),
        free
    );

    // Once the predecessor is spawned, the vehicle has to slow down for it.
    let (pos, _) = run(&[stopped_ahead, lone]);
    assert!(pos < free.0);
}

#[test]
fn follower_brakes_behind_slow_leader() {
    let slow = DriverParams {
        desired_velocity: 3.0,
        ..Default::default()
    };
    let leader = VehicleSpec::new(0.0, slow).with_initial_state(30.0, 0.0);
    let follower = default_vehicle(0.0).with_initial_state(0.0, 10.0);
    let mut sim = Simulation::with_vehicles(SimConfig::default(), [&leader, &follower]).unwrap();

    sim.step();
    assert!(sim.get_vehicle(1).unwrap().vel() < 10.0);
    for _ in 0..400 {
        sim.step();
        let gap = sim.get_vehicle(0).unwrap().pos() - sim.get_vehicle(1).unwrap().pos();
        assert!(gap > 1.5);
    }
    assert_approx_eq!(sim.get_vehicle(1).unwrap().vel(), 3.0, 0.1);
}

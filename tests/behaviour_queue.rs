//! Property tests of scheduled behaviour handling.

use lane_sim::{BehaviourSpec, DriverParams, SimConfig, Simulation, VehicleSpec};
use proptest::prelude::*;

fn rogue_vehicle(spawn_time: f64, offsets: &[f64]) -> VehicleSpec {
    offsets.iter().enumerate().fold(
        VehicleSpec::new(spawn_time, DriverParams::default()),
        |spec, (i, offset)| {
            spec.with_behaviour(BehaviourSpec::new(*offset, [("jamDistance", i as f64)]))
        },
    )
}

proptest! {
    #[test]
    fn pending_behaviours_are_sorted(
        spawn_time in 0.0..10.0f64,
        offsets in prop::collection::vec(-5.0..50.0f64, 0..20),
    ) {
        let spec = rogue_vehicle(spawn_time, &offsets);
        let sim = Simulation::with_vehicles(SimConfig::default(), [&spec]).unwrap();
        let times: Vec<f64> = sim.get_vehicle(0).unwrap().pending_behaviours().collect();
        prop_assert_eq!(times.len(), offsets.len());
        for pair in times.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn due_behaviours_are_applied_in_order(
        spawn_time in 0.0..5.0f64,
        offsets in prop::collection::vec(0.0..10.0f64, 1..10),
        steps in 1usize..400,
    ) {
        let spec = rogue_vehicle(spawn_time, &offsets);
        let mut sim = Simulation::with_vehicles(SimConfig::default(), [&spec]).unwrap();
        for _ in 0..steps {
            sim.step();
        }
        let last_tick = (steps - 1) as f64 * sim.config().time_step;
        let vehicle = sim.get_vehicle(0).unwrap();

        // The behaviours applied are exactly the ones due by the last tick.
        let mut due: Vec<(f64, usize)> = offsets
            .iter()
            .enumerate()
            .map(|(i, offset)| (spawn_time + offset, i))
            .filter(|(time, _)| vehicle.is_spawned() && *time <= last_tick)
            .collect();
        prop_assert_eq!(vehicle.pending_behaviours().count(), offsets.len() - due.len());
        prop_assert!(vehicle.pending_behaviours().all(|time| time > last_tick));

        // The last one applied wins, with ties broken by input order.
        due.sort_by(|a, b| a.0.total_cmp(&b.0));
        let expected = due.last().map(|(_, i)| *i as f64).unwrap_or(1.5);
        prop_assert_eq!(vehicle.params().jam_distance, expected);
    }
}

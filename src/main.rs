use lane_sim::{input, Recorder, SimConfig, Simulation, StripRenderer};
use std::time::Instant;

/// The width of the rendered road in characters.
const STRIP_WIDTH: usize = 100;

/// Render a line every this many seconds of simulated time.
const RENDER_INTERVAL_SEC: f64 = 1.0; // s

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let Some(traffic_path) = args.next() else {
        return Err("usage: lane-sim <traffic.json> [config.json] [output.json]".into());
    };
    let config = match args.next() {
        Some(path) => input::load_config(path)?,
        None => SimConfig::default(),
    };
    let output_path = args.next();

    let specs = input::load_traffic_list(&traffic_path, &config)?;
    let mut sim = Simulation::with_vehicles(config, &specs)?;

    let every = (RENDER_INTERVAL_SEC / config.time_step).round() as usize;
    let mut observers = (
        StripRenderer::new(STRIP_WIDTH, config.road_length, every),
        Recorder::new(),
    );

    println!("Simulating {} vehicles...", specs.len());
    let start = Instant::now();
    let steps = sim.run(&mut observers);
    let elapsed = start.elapsed();

    let (renderer, recorder) = observers;
    for line in renderer.lines() {
        println!("{}", line);
    }
    println!(
        "{} steps in {:?} ({:.0}x real time)",
        steps,
        elapsed,
        sim.time() / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    for vehicle in sim.iter_vehicles() {
        println!(
            "vehicle {:>3}: spawned={} pos={:>9.2} m vel={:>6.2} m/s",
            vehicle.index(),
            vehicle.is_spawned(),
            vehicle.pos(),
            vehicle.vel()
        );
    }
    if sim.discarded_params() > 0 {
        println!(
            "warning: {} behaviour parameter changes named no driver parameter",
            sim.discarded_params()
        );
    }

    if let Some(path) = output_path {
        recorder.write_json(&path)?;
        println!("Wrote {} frames to {}", recorder.frames().len(), path);
    }
    Ok(())
}

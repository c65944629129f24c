//! Recording of the simulation's output.

use crate::snapshot::{Snapshot, TickObserver, VehicleState};
#[cfg(feature = "serde")]
use crate::LoadError;
#[cfg(feature = "serde")]
use serde_json::{json, Value};

/// The state of the lane after one tick.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// The simulated time at the start of the tick, in s.
    pub time: f64,
    /// The state of every vehicle, front of the lane first.
    pub vehicles: Vec<VehicleState>,
}

/// Accumulates the state of the lane after each tick.
#[derive(Clone, Debug, Default)]
pub struct Recorder {
    frames: Vec<Frame>,
}

impl Recorder {
    pub fn new() -> Self {
        Default::default()
    }

    /// The frames recorded so far.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The recorded history of one vehicle as `(time, state)` pairs.
    pub fn history(&self, index: usize) -> impl Iterator<Item = (f64, VehicleState)> + '_ {
        self.frames
            .iter()
            .filter_map(move |frame| frame.vehicles.get(index).map(|v| (frame.time, *v)))
    }

    /// Takes the recorded frames, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.frames)
    }

    /// Formats the recording as JSON: an array with one entry per frame, each of the form
    /// `[time, [index, position, velocity], ...]`.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.frames
                .iter()
                .map(|frame| {
                    let mut line = vec![json!(frame.time)];
                    line.extend(
                        frame
                            .vehicles
                            .iter()
                            .map(|v| json!([v.index, v.pos, v.vel])),
                    );
                    Value::Array(line)
                })
                .collect(),
        )
    }

    /// Writes the recording to a JSON file.
    #[cfg(feature = "serde")]
    pub fn write_json(&self, path: impl AsRef<std::path::Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        let content = serde_json::to_string(&self.to_json())?;
        std::fs::write(path, content).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("wrote {} frames to {}", self.frames.len(), path.display());
        Ok(())
    }
}

impl TickObserver for Recorder {
    fn after_integrate(&mut self, snapshot: &Snapshot) {
        self.frames.push(Frame {
            time: snapshot.time(),
            vehicles: snapshot.iter().collect(),
        });
    }
}

//! A plain text view of the lane.

use crate::snapshot::{Snapshot, TickObserver};

/// Draws the lane as a line of text, one character per cell of road,
/// with a `>` for each spawned vehicle. Keeps every `every`th tick.
#[derive(Clone, Debug)]
pub struct StripRenderer {
    width: usize,
    road_length: f64,
    every: usize,
    ticks: usize,
    lines: Vec<String>,
}

impl StripRenderer {
    /// Creates a renderer drawing `road_length` metres of road in `width` characters.
    pub fn new(width: usize, road_length: f64, every: usize) -> Self {
        Self {
            width: width.max(1),
            road_length,
            every: every.max(1),
            ticks: 0,
            lines: vec![],
        }
    }

    /// Draws one snapshot.
    pub fn render(&self, snapshot: &Snapshot) -> String {
        let mut cells = vec!['-'; self.width];
        for vehicle in snapshot.iter().filter(|v| v.is_spawned) {
            cells[self.column(vehicle.pos)] = '>';
        }
        let road: String = cells.into_iter().collect();
        format!("{:>8.2} |{}|", snapshot.time(), road)
    }

    /// The lines drawn so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Takes the lines drawn so far.
    pub fn take_lines(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    fn column(&self, pos: f64) -> usize {
        let x = (pos / self.road_length * self.width as f64).floor();
        // `as` saturates, so NaN and negative positions land in the first cell
        (x as usize).min(self.width - 1)
    }
}

impl TickObserver for StripRenderer {
    fn before_integrate(&mut self, snapshot: &Snapshot) {
        if self.ticks % self.every == 0 {
            let line = self.render(snapshot);
            self.lines.push(line);
        }
        self.ticks += 1;
    }
}

//! Game clock and run statistics
//!
//! The clock drives batch generation and scoring; stats count what happened
//! over a run for the headless summary.

use super::config::DISTANCE_PER_POINT;

/// Time and distance bookkeeping for a run
#[derive(Debug, Clone, PartialEq)]
pub struct GameClock {
    /// Distance traveled since the last batch was spawned, in pixels
    pub distance_since_last_batch: f32,

    /// Distance traveled over the whole run, in pixels
    pub total_distance: f32,

    /// Length of the last tick in seconds
    pub delta_time: f32,

    /// Game time in milliseconds; does not advance while paused
    pub elapsed_ms: f64,

    pub is_paused: bool,

    pub is_game_over: bool,
}

impl GameClock {
    /// Create a clock that spawns a batch on the first tick
    pub fn new(batch_window_height: f32) -> Self {
        Self {
            distance_since_last_batch: batch_window_height,
            total_distance: 0.0,
            delta_time: 0.0,
            elapsed_ms: 0.0,
            is_paused: false,
            is_game_over: false,
        }
    }

    /// Advance game time by one tick
    pub fn tick(&mut self, delta_secs: f32) {
        self.delta_time = delta_secs;
        self.elapsed_ms += delta_secs as f64 * 1000.0;
    }

    /// Record distance the player traveled this tick
    pub fn travel(&mut self, distance: f32) {
        self.distance_since_last_batch += distance;
        self.total_distance += distance;
    }

    /// Consume one batch worth of distance if enough has been traveled
    pub fn take_batch(&mut self, batch_window_height: f32) -> bool {
        if self.distance_since_last_batch >= batch_window_height {
            self.distance_since_last_batch -= batch_window_height;
            true
        } else {
            false
        }
    }

    /// Score derived from distance traveled
    pub fn score(&self) -> u32 {
        (self.total_distance / DISTANCE_PER_POINT).floor() as u32
    }

    /// Elapsed game time in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_ms / 1000.0
    }
}

/// Counters collected over a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub ticks: u64,
    pub batches_generated: usize,
    pub boards_from_presets: usize,
    /// Candidate boards thrown away for being unpassable
    pub boards_rejected: usize,
    /// Cells emptied by the normalizer
    pub cells_normalized: usize,
    pub entities_spawned: usize,
    /// Entities that scrolled past the player untouched
    pub entities_passed: usize,
    pub collisions: usize,
    pub lives_lost: usize,
    pub bounces: usize,
}

impl RunStats {
    /// Share of spawned traffic the player got past without touching, in percent
    pub fn dodge_rate(&self) -> f32 {
        let resolved = self.entities_passed + self.collisions;
        if resolved == 0 {
            return 100.0;
        }
        self.entities_passed as f32 / resolved as f32 * 100.0
    }

    /// Get a summary string for display
    pub fn summary(&self) -> String {
        format!(
            "Batches: {} | Spawned: {} | Passed: {} | Collisions: {} | Rejected boards: {}",
            self.batches_generated,
            self.entities_spawned,
            self.entities_passed,
            self.collisions,
            self.boards_rejected
        )
    }
}

//! Static configuration for a game run
//!
//! Defaults describe the classic three-lane arcade road. `validate` is run
//! once when a world is built; anything that would make board generation loop
//! forever is rejected there.

use super::error::ConfigError;

/// Default pixels traveled per score point (2 points per second at base speed)
pub const DISTANCE_PER_POINT: f32 = 120.0;

/// Degrees the player car tilts toward the direction of a lane change
pub const TURN_TILT_DEGREES: f32 = 10.0;

/// Gap between the bottom of the player car and the bottom of the viewport
pub const CAR_BOTTOM_PADDING: f32 = 20.0;

/// How the player's speed recovers after a collision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeedRecovery {
    /// Ease-out cubic: fast at first, settling into full speed
    #[default]
    EaseOut,
    /// Constant acceleration over the protection window
    Linear,
}

/// Whether a lane change may be requested while a turn is already in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaneChangePolicy {
    #[default]
    RejectWhileTurning,
    AllowWhileTurning,
}

/// Configuration for the traffic engine
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Number of lanes on the road
    pub num_lanes: usize,
    /// Rows in each generated board
    pub rows_per_batch: usize,
    /// Occupied cells in each generated board
    pub density_per_batch: usize,
    /// Absolute speed of traffic with a speed coefficient of 1, in units/s
    pub baseline_other_speed: f32,
    /// Nominal player speed, in units/s
    pub player_base_speed: f32,
    /// Length of the post-collision immunity window
    pub collision_protection_ms: f64,
    /// Lives at the start of a run
    pub lives_total: u32,

    /// Lateral speed of a lane change, in units/s
    pub turning_speed: f32,
    /// Sprite units to viewport pixels
    pub scale: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Vertical spacing between board rows, in pixels
    pub cell_height: f32,
    /// Fraction of nominal speed the player drops to on a collision
    pub collision_speed_penalty: f32,
    pub speed_recovery: SpeedRecovery,
    pub lane_change_policy: LaneChangePolicy,
    /// Probability of using a handcrafted preset instead of a shuffled board
    pub preset_chance: f64,
    /// Seed for the world's random source; `None` seeds from the thread RNG
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_lanes: 3,
            rows_per_batch: 3,
            density_per_batch: 3,
            baseline_other_speed: 90.0,
            player_base_speed: 120.0,
            collision_protection_ms: 3000.0,
            lives_total: 3,
            turning_speed: 200.0,
            scale: 2.0,
            viewport_width: 640.0,
            viewport_height: 640.0,
            cell_height: 160.0,
            collision_speed_penalty: 0.25,
            speed_recovery: SpeedRecovery::default(),
            lane_change_policy: LaneChangePolicy::default(),
            preset_chance: 0.0,
            seed: None,
        }
    }
}

impl SimConfig {
    /// Create a default configuration with a fixed seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Total cells in one board
    pub fn cells_per_batch(&self) -> usize {
        self.num_lanes * self.rows_per_batch
    }

    /// Height of the off-screen window a batch is spawned into
    pub fn batch_window_height(&self) -> f32 {
        self.rows_per_batch as f32 * self.cell_height
    }

    /// Reject configurations the board generator cannot satisfy
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_lanes == 0 {
            return Err(ConfigError::NoLanes);
        }
        if self.rows_per_batch == 0 {
            return Err(ConfigError::NoRows);
        }

        let cells = self.cells_per_batch();
        if self.density_per_batch > cells {
            return Err(ConfigError::DensityExceedsCells {
                density: self.density_per_batch,
                cells,
                rows: self.rows_per_batch,
                lanes: self.num_lanes,
            });
        }

        // A path needs a free cell in every row; fewer free cells can never validate
        let free = cells - self.density_per_batch;
        if free < self.rows_per_batch {
            return Err(ConfigError::UnpassableDensity {
                density: self.density_per_batch,
                free,
                rows: self.rows_per_batch,
            });
        }

        let positive = [
            ("baseline_other_speed", self.baseline_other_speed),
            ("player_base_speed", self.player_base_speed),
            ("turning_speed", self.turning_speed),
            ("scale", self.scale),
            ("viewport_width", self.viewport_width),
            ("viewport_height", self.viewport_height),
            ("cell_height", self.cell_height),
            ("collision_protection_ms", self.collision_protection_ms as f32),
        ];
        for (field, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        if !(0.0..=1.0).contains(&self.collision_speed_penalty) {
            return Err(ConfigError::OutOfUnitRange {
                field: "collision_speed_penalty",
                value: self.collision_speed_penalty as f64,
            });
        }
        if !(0.0..=1.0).contains(&self.preset_chance) {
            return Err(ConfigError::OutOfUnitRange {
                field: "preset_chance",
                value: self.preset_chance,
            });
        }

        if self.lives_total == 0 {
            return Err(ConfigError::NoLives);
        }

        Ok(())
    }
}

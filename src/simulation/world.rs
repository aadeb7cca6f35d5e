//! Main simulation world that ties everything together
//!
//! This is the entry point for running the traffic engine. It owns the player,
//! the traffic pool, the clock and the random source, and runs the
//! generate -> move -> collide pipeline once per tick.

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::board::{Board, BoardGenerator};
use super::collision::{resolve_collisions, CollisionEvent};
use super::config::SimConfig;
use super::entity_pool::{EntityPool, TrafficEntity};
use super::error::ConfigError;
use super::game_state::{GameClock, RunStats};
use super::normalizer::normalize;
use super::player::{CollisionOutcome, PlayerCar};
use super::scenery::Scenery;
use super::types::{Direction, PlayerCondition, RoadGeometry};

/// Pixels per character row in the ASCII map
const MAP_ROW_HEIGHT: f32 = 40.0;

/// Read-only view of the world after a tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickSnapshot {
    pub player: PlayerCar,
    /// Active traffic sorted by ID
    pub entities: Vec<TrafficEntity>,
    /// Collisions resolved during the tick
    pub collisions: Vec<CollisionEvent>,
    pub score: u32,
    pub lives: u32,
    pub is_game_over: bool,
    pub scenery: Scenery,
}

/// The main simulation world
pub struct SimWorld {
    pub config: SimConfig,

    pub geometry: RoadGeometry,

    generator: BoardGenerator,

    pub player: PlayerCar,

    /// All active traffic
    pub pool: EntityPool,

    pub clock: GameClock,

    pub stats: RunStats,

    pub scenery: Scenery,

    /// The most recently spawned board, after normalization
    pub last_board: Option<Board>,

    rng: StdRng,

    /// Timestamp of the last animation frame, in ms
    last_frame_ms: Option<f64>,
}

impl SimWorld {
    /// Build a world, failing if the configuration can never produce a passable board
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        let generator = BoardGenerator::new(&config)?;
        let geometry = RoadGeometry::from_config(&config);
        let mut rng = Self::make_rng(&config);

        Ok(Self {
            player: PlayerCar::new(&config, &geometry),
            pool: EntityPool::new(config.num_lanes),
            clock: GameClock::new(config.batch_window_height()),
            stats: RunStats::default(),
            scenery: Scenery::new(&geometry, &mut rng),
            last_board: None,
            last_frame_ms: None,
            generator,
            geometry,
            config,
            rng,
        })
    }

    /// Create a default world with a seeded RNG for reproducible runs
    pub fn new_with_seed(seed: u64) -> Result<Self, ConfigError> {
        Self::new(SimConfig::with_seed(seed))
    }

    fn make_rng(config: &SimConfig) -> StdRng {
        match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn board_generator(&self) -> &BoardGenerator {
        &self.generator
    }

    /// Main simulation tick
    pub fn advance_tick(&mut self, delta_secs: f32) -> TickSnapshot {
        if self.clock.is_paused || self.clock.is_game_over {
            return self.snapshot_with(Vec::new());
        }

        let delta_secs = delta_secs.max(0.0);
        self.clock.tick(delta_secs);
        self.stats.ticks += 1;
        let now_ms = self.clock.elapsed_ms;

        // Player kinematics
        self.player.update_speed(now_ms, &self.config);
        self.player.update_turning(delta_secs, &self.geometry);

        let distance = self.player.current_speed * self.config.scale * delta_secs;
        self.clock.travel(distance);
        self.scenery
            .advance(distance, self.config.viewport_height, &mut self.rng);

        // Generate traffic once a batch window has scrolled by
        if self.clock.take_batch(self.config.batch_window_height()) {
            self.spawn_next_batch();
        }

        self.pool.advance(
            delta_secs,
            self.player.current_speed,
            self.config.baseline_other_speed,
            self.config.scale,
        );

        let collisions = resolve_collisions(
            &mut self.player,
            &mut self.pool,
            &self.geometry,
            &self.config,
            now_ms,
        );
        for event in &collisions {
            self.stats.collisions += 1;
            if event.bounced {
                self.stats.bounces += 1;
            }
            if matches!(
                event.outcome,
                CollisionOutcome::LifeLost { .. } | CollisionOutcome::Crashed
            ) {
                self.stats.lives_lost += 1;
            }
        }

        let pruned = self.pool.prune(self.config.viewport_height);
        self.stats.entities_passed += pruned.passed.len();

        if self.player.is_crashed() {
            self.clock.is_game_over = true;
            warn!(
                "GAME OVER after {:.2}s with score {}",
                self.clock.elapsed_secs(),
                self.clock.score()
            );
        }

        self.snapshot_with(collisions)
    }

    /// Generate, normalize and spawn the next board
    fn spawn_next_batch(&mut self) {
        let generated = self
            .generator
            .generate(&mut self.rng, self.last_board.as_ref());
        let mut board = generated.board;
        let cleared = normalize(&mut board, self.last_board.as_ref());
        let spawned = self
            .pool
            .spawn_batch(&board, self.config.cell_height, &self.geometry);

        self.stats.batches_generated += 1;
        self.stats.boards_rejected += generated.rejected;
        self.stats.cells_normalized += cleared.len();
        self.stats.entities_spawned += spawned.len();
        if generated.from_preset {
            self.stats.boards_from_presets += 1;
        }

        debug!(
            "Spawned batch #{} with {} entities ({} candidates rejected, preset: {})\n{}",
            self.stats.batches_generated,
            spawned.len(),
            generated.rejected,
            generated.from_preset,
            board
        );

        self.last_board = Some(board);
    }

    /// Animation-frame callback.
    ///
    /// Returns `None` when no tick ran because the world is paused or the game
    /// is over; the host should stop scheduling frames until `resume` or `restart`.
    pub fn frame(&mut self, now_ms: f64) -> Option<TickSnapshot> {
        if self.clock.is_paused || self.clock.is_game_over {
            return None;
        }

        let delta_secs = match self.last_frame_ms {
            Some(last) => ((now_ms - last) / 1000.0).max(0.0) as f32,
            None => 0.0,
        };
        self.last_frame_ms = Some(now_ms);
        Some(self.advance_tick(delta_secs))
    }

    /// Ask the player car to move one lane over. Returns whether a turn started.
    pub fn request_lane_change(&mut self, direction: Direction) -> bool {
        if self.clock.is_paused || self.clock.is_game_over {
            return false;
        }
        self.player.request_lane_change(
            direction,
            self.config.lane_change_policy,
            self.config.num_lanes,
        )
    }

    /// Stop ticking; no game time accrues until `resume`
    pub fn pause(&mut self) {
        if !self.clock.is_paused && !self.clock.is_game_over {
            self.clock.is_paused = true;
            info!("Paused at {:.2}s", self.clock.elapsed_secs());
        }
    }

    /// Continue ticking, measuring the next frame from `now_ms`
    pub fn resume(&mut self, now_ms: f64) {
        if self.clock.is_paused {
            self.clock.is_paused = false;
            self.last_frame_ms = Some(now_ms);
            info!("Resumed at {:.2}s", self.clock.elapsed_secs());
        }
    }

    /// Throw away the current run and start over from `now_ms`
    pub fn restart(&mut self, now_ms: f64) {
        self.rng = Self::make_rng(&self.config);
        self.player = PlayerCar::new(&self.config, &self.geometry);
        self.pool.clear();
        self.clock = GameClock::new(self.config.batch_window_height());
        self.stats = RunStats::default();
        self.scenery = Scenery::new(&self.geometry, &mut self.rng);
        self.last_board = None;
        self.last_frame_ms = Some(now_ms);
        info!("Restarted");
    }

    pub fn is_game_over(&self) -> bool {
        self.clock.is_game_over
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused
    }

    pub fn current_score(&self) -> u32 {
        self.clock.score()
    }

    pub fn lives_remaining(&self) -> u32 {
        self.player.lives
    }

    /// Read-only view of the current state
    pub fn snapshot(&self) -> TickSnapshot {
        self.snapshot_with(Vec::new())
    }

    fn snapshot_with(&self, collisions: Vec<CollisionEvent>) -> TickSnapshot {
        TickSnapshot {
            player: self.player.clone(),
            entities: self.pool.snapshot(),
            collisions,
            score: self.clock.score(),
            lives: self.player.lives,
            is_game_over: self.clock.is_game_over,
            scenery: self.scenery.clone(),
        }
    }

    /// Print a summary of the world state
    pub fn print_summary(&self) {
        println!("=== Lane Dodge Summary ===");
        println!("Time: {:.2}s", self.clock.elapsed_secs());
        println!(
            "Score: {}, Lives: {}/{}, Condition: {:?}",
            self.clock.score(),
            self.player.lives,
            self.config.lives_total,
            self.player.condition
        );
        println!(
            "Player: lane={}, x={:.1}, speed={:.1}/{:.1}{}",
            self.player.lane_index,
            self.player.x,
            self.player.current_speed,
            self.player.speed,
            if self.player.is_turning {
                format!(", turning {:?}", self.player.turning_direction)
            } else {
                String::new()
            }
        );
        println!("Traffic: {}", self.pool.len());
        println!("{}", self.stats.summary());
        println!();
    }

    /// Draw the visible road in the terminal
    pub fn draw_map(&self) {
        let rows = (self.config.viewport_height / MAP_ROW_HEIGHT).ceil() as usize;
        let lanes = self.config.num_lanes;
        let mut grid = vec![vec!['.'; lanes]; rows];

        let to_row = |y: f32| -> Option<usize> {
            if y < 0.0 || y >= self.config.viewport_height {
                return None;
            }
            Some(((y / MAP_ROW_HEIGHT) as usize).min(rows - 1))
        };

        for entity in self.pool.iter() {
            if let Some(row) = to_row(entity.y) {
                grid[row][entity.lane] = entity.kind.symbol();
            }
        }

        if let Some(row) = to_row(self.player.y) {
            let lane = self.geometry.lane_at(self.player.x);
            grid[row][lane] = match self.player.condition {
                PlayerCondition::Normal => 'P',
                PlayerCondition::Collided => 'p',
                PlayerCondition::Crashed => 'X',
            };
        }

        println!("\n=== Road Map ===");
        println!("Legend: P=Player, p=Player (immune), X=Crashed, #=Obstacle, F=Fast, V=Vehicle, S=Slow, T=Truck");
        println!();
        for row in &grid {
            let line: String = row.iter().map(|c| format!("|{}", c)).collect();
            println!("{}|", line);
        }
        println!();
    }
}

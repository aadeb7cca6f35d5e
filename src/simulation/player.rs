//! Player car state machine
//!
//! Lane changes, post-collision speed recovery and the
//! Normal/Collided/Crashed condition cycle.

use super::config::{LaneChangePolicy, SimConfig, SpeedRecovery, TURN_TILT_DEGREES};
use super::entity_pool::TrafficEntity;
use super::kinds::PLAYER_CAR_FOOTPRINT;
use super::types::{Bounds, Direction, PlayerCondition, RoadGeometry};

/// Ease-out cubic over `t` in `[0, 1]`
pub fn ease_out_cubic(t: f32) -> f32 {
    let t1 = t.clamp(0.0, 1.0) - 1.0;
    t1 * t1 * t1 + 1.0
}

/// What a collision did to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Inside the immunity window; no life lost
    Immune,
    /// Lost a life and entered the immunity window
    LifeLost { lives_left: u32 },
    /// Lost the last life
    Crashed,
}

/// The player's car
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerCar {
    /// Lane the car is in, or heading to while turning
    pub lane_index: usize,
    /// Lane the most recent turn departed from
    pub last_lane_index: usize,
    /// Horizontal center
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Nominal speed, in units/s
    pub speed: f32,
    /// Speed after collision penalties, in units/s
    pub current_speed: f32,
    pub is_turning: bool,
    pub turning_direction: Direction,
    /// Lateral speed while changing lanes, in units/s
    pub turning_speed: f32,
    pub lives: u32,
    pub condition: PlayerCondition,
    /// Game time of the last collision that cost a life, in ms
    pub collision_timestamp: Option<f64>,
    /// Game time the current immunity window started, in ms
    pub immunity_start_timestamp: Option<f64>,
    pub rotation_degrees: f32,
}

impl PlayerCar {
    /// Create a car centered in the middle lane with full lives
    pub fn new(config: &SimConfig, geometry: &RoadGeometry) -> Self {
        let lane = geometry.center_lane();
        Self {
            lane_index: lane,
            last_lane_index: lane,
            x: geometry.lane_center_x(lane),
            y: geometry.player_y,
            speed: config.player_base_speed,
            current_speed: config.player_base_speed,
            is_turning: false,
            turning_direction: Direction::None,
            turning_speed: config.turning_speed,
            lives: config.lives_total,
            condition: PlayerCondition::Normal,
            collision_timestamp: None,
            immunity_start_timestamp: None,
            rotation_degrees: 0.0,
        }
    }

    pub fn bounds(&self, geometry: &RoadGeometry) -> Bounds {
        let size = PLAYER_CAR_FOOTPRINT.scaled(geometry.scale);
        Bounds::new(self.x - size.width / 2.0, self.y, size.width, size.height)
    }

    pub fn is_crashed(&self) -> bool {
        self.condition == PlayerCondition::Crashed
    }

    /// Start a turn toward the next lane in `direction`.
    /// Returns false, changing nothing, when the request cannot be honoured.
    pub fn request_lane_change(
        &mut self,
        direction: Direction,
        policy: LaneChangePolicy,
        num_lanes: usize,
    ) -> bool {
        if self.is_crashed() {
            return false;
        }
        if self.is_turning && policy == LaneChangePolicy::RejectWhileTurning {
            return false;
        }
        let Some(target) = direction.step(self.lane_index, num_lanes) else {
            return false;
        };

        self.last_lane_index = self.lane_index;
        self.lane_index = target;
        self.is_turning = true;
        self.turning_direction = direction;
        self.rotation_degrees = TURN_TILT_DEGREES * direction.sign();
        true
    }

    /// Slide toward the target lane; snap and finish once its center is crossed
    pub fn update_turning(&mut self, delta_secs: f32, geometry: &RoadGeometry) {
        if !self.is_turning {
            return;
        }

        let target_x = geometry.lane_center_x(self.lane_index);
        let distance = self.turning_speed * geometry.scale * delta_secs;
        self.x += distance * self.turning_direction.sign();

        let arrived = match self.turning_direction {
            Direction::Left => self.x <= target_x,
            Direction::Right => self.x >= target_x,
            Direction::None => true,
        };

        if arrived {
            self.x = target_x;
            self.is_turning = false;
            self.turning_direction = Direction::None;
            self.rotation_degrees = 0.0;
        }
    }

    /// Recover speed during the immunity window and leave it once it has elapsed
    pub fn update_speed(&mut self, now_ms: f64, config: &SimConfig) {
        if self.condition != PlayerCondition::Collided {
            return;
        }

        let started = self.immunity_start_timestamp.unwrap_or(now_ms);
        let elapsed = now_ms - started;
        if elapsed > config.collision_protection_ms {
            self.condition = PlayerCondition::Normal;
            self.current_speed = self.speed;
            return;
        }

        let t = (elapsed / config.collision_protection_ms) as f32;
        let progress = match config.speed_recovery {
            SpeedRecovery::EaseOut => ease_out_cubic(t),
            SpeedRecovery::Linear => t.clamp(0.0, 1.0),
        };
        let penalty_speed = self.speed * config.collision_speed_penalty;
        self.current_speed = penalty_speed + (self.speed - penalty_speed) * progress;
    }

    /// React to running into something at game time `now_ms`
    pub fn on_collision(&mut self, now_ms: f64, config: &SimConfig) -> CollisionOutcome {
        match self.condition {
            PlayerCondition::Crashed => CollisionOutcome::Crashed,
            PlayerCondition::Collided => CollisionOutcome::Immune,
            PlayerCondition::Normal => {
                self.lives = self.lives.saturating_sub(1);
                if self.lives > 0 {
                    self.condition = PlayerCondition::Collided;
                    self.collision_timestamp = Some(now_ms);
                    self.immunity_start_timestamp = Some(now_ms);
                    self.current_speed = self.speed * config.collision_speed_penalty;
                    CollisionOutcome::LifeLost {
                        lives_left: self.lives,
                    }
                } else {
                    self.condition = PlayerCondition::Crashed;
                    self.collision_timestamp = Some(now_ms);
                    self.current_speed = 0.0;
                    CollisionOutcome::Crashed
                }
            }
        }
    }

    /// Whether hitting `entity` mid-turn should throw the car back where it came from
    pub fn should_bounce(&self, entity: &TrafficEntity) -> bool {
        self.is_turning
            && !self.is_crashed()
            && entity.kind.is_vehicle()
            && entity.lane != self.last_lane_index
    }

    /// Reverse the turn in progress, heading back to the departure lane
    pub fn bounce_back(&mut self) {
        if !self.is_turning {
            return;
        }
        let departed = self.last_lane_index;
        self.last_lane_index = self.lane_index;
        self.lane_index = departed;
        self.turning_direction = self.turning_direction.opposite();
        self.rotation_degrees = TURN_TILT_DEGREES * self.turning_direction.sign();
    }
}

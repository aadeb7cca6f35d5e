//! Core types for the traffic engine
//!
//! Identifiers, directions and the road geometry every other module measures
//! positions against.

use super::config::{SimConfig, CAR_BOTTOM_PADDING};
use super::kinds::{PLAYER_CAR_FOOTPRINT, ROAD_FOOTPRINT, SIDEWAY_FOOTPRINT};

/// A unique identifier for simulation entities
/// This is a simple wrapper around a usize for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimId(pub usize);

/// A wrapper type for traffic entity IDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub SimId);

/// Direction of a lane change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Left,
    Right,
    #[default]
    None,
}

impl Direction {
    /// Sign of horizontal motion in this direction
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
            Direction::None => 0.0,
        }
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::None => Direction::None,
        }
    }

    /// Lane reached by stepping once from `lane`, if it exists
    pub fn step(&self, lane: usize, num_lanes: usize) -> Option<usize> {
        match self {
            Direction::Left => lane.checked_sub(1),
            Direction::Right if lane + 1 < num_lanes => Some(lane + 1),
            _ => None,
        }
    }
}

/// Condition of the player car
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerCondition {
    #[default]
    Normal,
    /// Hit something recently and is immune to further life loss
    Collided,
    /// Out of lives
    Crashed,
}

/// Axis-aligned box in viewport pixels, `y` growing downward
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap; boxes that only touch do not collide
    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Horizontal layout of the road and the player's fixed vertical position
#[derive(Debug, Clone, PartialEq)]
pub struct RoadGeometry {
    pub num_lanes: usize,
    pub scale: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Left edge of the road
    pub road_x: f32,
    pub road_width: f32,
    pub lane_width: f32,
    /// Top edge of the player car
    pub player_y: f32,
}

impl RoadGeometry {
    pub fn from_config(config: &SimConfig) -> Self {
        let road_x = SIDEWAY_FOOTPRINT.width * config.scale;
        let road_width = ROAD_FOOTPRINT.width * config.scale;
        let player_height = PLAYER_CAR_FOOTPRINT.height * config.scale;

        Self {
            num_lanes: config.num_lanes,
            scale: config.scale,
            viewport_width: config.viewport_width,
            viewport_height: config.viewport_height,
            road_x,
            road_width,
            lane_width: road_width / config.num_lanes as f32,
            player_y: config.viewport_height - player_height - CAR_BOTTOM_PADDING,
        }
    }

    /// Horizontal center of a lane
    pub fn lane_center_x(&self, lane: usize) -> f32 {
        self.road_x + self.lane_width * (lane as f32 + 0.5)
    }

    /// Lane whose span contains `x`, clamped to the road
    pub fn lane_at(&self, x: f32) -> usize {
        let offset = ((x - self.road_x) / self.lane_width).floor();
        (offset.max(0.0) as usize).min(self.num_lanes.saturating_sub(1))
    }

    /// Lane the board generator treats as the player's entry and exit point
    pub fn center_lane(&self) -> usize {
        self.num_lanes / 2
    }
}

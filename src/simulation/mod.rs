//! Standalone lane dodge traffic engine
//!
//! This module contains the board generation, path validation, traffic
//! kinematics and player state machine of the game. It runs without any
//! renderer and can be driven from the console or from tests.

mod board;
mod collision;
mod config;
mod entity_pool;
mod error;
mod game_state;
mod grid_graph;
mod kinds;
mod normalizer;
mod player;
mod presets;
mod scenery;
mod types;
mod world;

pub use board::{board_is_passable, sentinel_rows, Board, BoardGenerator, GeneratedBoard};
pub use collision::{overlapping_entities, resolve_collisions, CollisionEvent};
pub use config::{
    LaneChangePolicy, SimConfig, SpeedRecovery, CAR_BOTTOM_PADDING, DISTANCE_PER_POINT,
    TURN_TILT_DEGREES,
};
pub use entity_pool::{relative_speed, EntityPool, PruneReport, TrafficEntity};
pub use error::ConfigError;
pub use game_state::{GameClock, RunStats};
pub use grid_graph::{find_path, has_path, CellPos, GridCell, GridGraph, PassabilityGrid};
pub use kinds::{
    EntityKind, Footprint, TrafficClass, PLAYER_CAR_FOOTPRINT, ROAD_FOOTPRINT, SIDEWAY_FOOTPRINT,
};
pub use normalizer::{normalize, ClearReason, ClearedCell};
pub use player::{ease_out_cubic, CollisionOutcome, PlayerCar};
pub use presets::{builtin_presets, Preset, PresetCell};
pub use scenery::{Scenery, ScrollBlock, ScrollingStrip, StripSide};
pub use types::{Bounds, Direction, EntityId, PlayerCondition, RoadGeometry, SimId};
pub use world::{SimWorld, TickSnapshot};

//! Traffic entity spawning and management
//!
//! This module turns validated boards into positioned traffic, moves it every
//! tick relative to the player and retires whatever was hit or has scrolled
//! past the bottom of the viewport.

use ordered_float::OrderedFloat;
use std::collections::{BTreeSet, HashMap};
use std::ops::Bound;

use super::board::Board;
use super::kinds::EntityKind;
use super::types::{Bounds, EntityId, RoadGeometry, SimId};

/// A piece of traffic on the road
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub lane: usize,
    /// Left edge
    pub x: f32,
    /// Top edge; negative while still above the viewport
    pub y: f32,
    pub was_hit: bool,
}

impl TrafficEntity {
    pub fn bounds(&self, scale: f32) -> Bounds {
        let size = self.kind.footprint().scaled(scale);
        Bounds::new(self.x, self.y, size.width, size.height)
    }
}

/// Entities removed by a prune pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PruneReport {
    pub hit: Vec<EntityId>,
    pub passed: Vec<EntityId>,
}

/// On-screen speed of a kind of traffic, in pixels per second.
/// Positive values move toward the player.
pub fn relative_speed(
    kind: EntityKind,
    player_current_speed: f32,
    baseline_other_speed: f32,
    scale: f32,
) -> f32 {
    (player_current_speed - baseline_other_speed * kind.speed_coefficient()) * scale
}

/// Owns every active traffic entity
#[derive(Debug, Default)]
pub struct EntityPool {
    entities: HashMap<EntityId, TrafficEntity>,

    /// Per-lane index of entities ordered by their top edge
    lanes: Vec<BTreeSet<(OrderedFloat<f32>, EntityId)>>,

    /// Next ID to assign
    next_id: usize,
}

impl EntityPool {
    pub fn new(num_lanes: usize) -> Self {
        Self {
            entities: HashMap::new(),
            lanes: vec![BTreeSet::new(); num_lanes],
            next_id: 0,
        }
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(SimId(self.next_id));
        self.next_id += 1;
        id
    }

    /// Place a single entity centered in `lane` with its top edge at `y`
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        lane: usize,
        y: f32,
        geometry: &RoadGeometry,
    ) -> EntityId {
        let id = self.next_entity_id();
        let width = kind.footprint().scaled(geometry.scale).width;
        let entity = TrafficEntity {
            id,
            kind,
            lane,
            x: geometry.lane_center_x(lane) - width / 2.0,
            y,
            was_hit: false,
        };

        if let Some(index) = self.lanes.get_mut(lane) {
            index.insert((OrderedFloat(y), id));
        }
        self.entities.insert(id, entity);
        id
    }

    /// Spawn one entity per occupied cell, stacked above the viewport by row
    pub fn spawn_batch(
        &mut self,
        board: &Board,
        cell_height: f32,
        geometry: &RoadGeometry,
    ) -> Vec<EntityId> {
        let window_height = board.rows() as f32 * cell_height;
        board
            .iter_occupied()
            .map(|(pos, kind)| {
                let y = pos.row as f32 * cell_height - window_height;
                self.spawn(kind, pos.col, y, geometry)
            })
            .collect()
    }

    /// Move every entity by its speed relative to the player
    pub fn advance(
        &mut self,
        delta_secs: f32,
        player_current_speed: f32,
        baseline_other_speed: f32,
        scale: f32,
    ) {
        for entity in self.entities.values_mut() {
            let speed = relative_speed(
                entity.kind,
                player_current_speed,
                baseline_other_speed,
                scale,
            );
            entity.y += speed * delta_secs;
        }
        self.rebuild_lane_index();
    }

    fn rebuild_lane_index(&mut self) {
        for index in &mut self.lanes {
            index.clear();
        }
        for entity in self.entities.values() {
            if let Some(index) = self.lanes.get_mut(entity.lane) {
                index.insert((OrderedFloat(entity.y), entity.id));
            }
        }
    }

    /// Flag an entity as hit; it is removed on the next prune
    pub fn mark_hit(&mut self, id: EntityId) -> bool {
        match self.entities.get_mut(&id) {
            Some(entity) if !entity.was_hit => {
                entity.was_hit = true;
                true
            }
            _ => false,
        }
    }

    /// Remove hit entities and entities below `viewport_height`
    pub fn prune(&mut self, viewport_height: f32) -> PruneReport {
        let mut report = PruneReport::default();
        for entity in self.entities.values() {
            if entity.was_hit {
                report.hit.push(entity.id);
            } else if entity.y > viewport_height {
                report.passed.push(entity.id);
            }
        }
        report.hit.sort();
        report.passed.sort();

        for id in report.hit.iter().chain(report.passed.iter()) {
            if let Some(entity) = self.entities.remove(id) {
                if let Some(index) = self.lanes.get_mut(entity.lane) {
                    index.remove(&(OrderedFloat(entity.y), entity.id));
                }
            }
        }

        report
    }

    /// Entities in `lane` whose top edge lies within `[y_min, y_max]`, nearest the top first
    pub fn entities_in_band(&self, lane: usize, y_min: f32, y_max: f32) -> Vec<&TrafficEntity> {
        let Some(index) = self.lanes.get(lane) else {
            return Vec::new();
        };
        if y_min > y_max {
            return Vec::new();
        }
        let lower = Bound::Included((OrderedFloat(y_min), EntityId(SimId(usize::MIN))));
        let upper = Bound::Included((OrderedFloat(y_max), EntityId(SimId(usize::MAX))));
        index
            .range((lower, upper))
            .filter_map(|(_, id)| self.entities.get(id))
            .collect()
    }

    /// Closest entity in `lane` whose top edge is above `y`
    pub fn nearest_ahead(&self, lane: usize, y: f32) -> Option<&TrafficEntity> {
        let index = self.lanes.get(lane)?;
        let upper = Bound::Excluded((OrderedFloat(y), EntityId(SimId(usize::MIN))));
        index
            .range((Bound::Unbounded, upper))
            .rev()
            .find_map(|(_, id)| self.entities.get(id).filter(|entity| !entity.was_hit))
    }

    pub fn get(&self, id: EntityId) -> Option<&TrafficEntity> {
        self.entities.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// All active entities sorted by ID
    pub fn snapshot(&self) -> Vec<TrafficEntity> {
        let mut entities: Vec<TrafficEntity> = self.entities.values().cloned().collect();
        entities.sort_by_key(|entity| entity.id);
        entities
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrafficEntity> {
        self.entities.values()
    }

    /// Drop every entity; IDs keep counting up
    pub fn clear(&mut self) {
        self.entities.clear();
        for index in &mut self.lanes {
            index.clear();
        }
    }
}

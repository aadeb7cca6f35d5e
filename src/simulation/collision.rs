//! Collision resolution between the player and the traffic pool
//!
//! The pool's per-lane index narrows the search to the lanes within reach of
//! the player and the rows near the player; exact overlap is a box test. Hit entities are
//! only flagged here; the pool removes them on its next prune.

use super::config::SimConfig;
use super::entity_pool::{EntityPool, TrafficEntity};
use super::kinds::EntityKind;
use super::player::{CollisionOutcome, PlayerCar};
use super::types::{EntityId, RoadGeometry};

/// One collision resolved during a tick
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionEvent {
    pub entity: EntityId,
    pub kind: EntityKind,
    pub lane: usize,
    pub outcome: CollisionOutcome,
    /// The hit threw the player back toward the lane they were leaving
    pub bounced: bool,
}

/// Entities currently overlapping the player, closest to the player first
pub fn overlapping_entities(
    player: &PlayerCar,
    pool: &EntityPool,
    geometry: &RoadGeometry,
) -> Vec<TrafficEntity> {
    let player_bounds = player.bounds(geometry);
    // Traffic is centered in its lane but may be wider than it
    let reach = EntityKind::max_width() * geometry.scale / 2.0;
    let first_lane = geometry.lane_at(player_bounds.x - reach);
    let last_lane = geometry.lane_at(player_bounds.right() + reach);
    let tallest = EntityKind::max_height() * geometry.scale;

    let mut hits: Vec<TrafficEntity> = (first_lane..=last_lane)
        .flat_map(|lane| {
            pool.entities_in_band(lane, player_bounds.y - tallest, player_bounds.bottom())
        })
        .filter(|entity| !entity.was_hit)
        .filter(|entity| entity.bounds(geometry.scale).overlaps(&player_bounds))
        .cloned()
        .collect();

    hits.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.id.cmp(&b.id)));
    hits
}

/// Resolve every collision for this tick.
///
/// Stops as soon as the player crashes; anything else still overlapping is
/// left untouched.
pub fn resolve_collisions(
    player: &mut PlayerCar,
    pool: &mut EntityPool,
    geometry: &RoadGeometry,
    config: &SimConfig,
    now_ms: f64,
) -> Vec<CollisionEvent> {
    let mut events = Vec::new();
    if player.is_crashed() {
        return events;
    }

    for entity in overlapping_entities(player, pool, geometry) {
        if !pool.mark_hit(entity.id) {
            continue;
        }

        let bounced = player.should_bounce(&entity);
        let outcome = player.on_collision(now_ms, config);
        if bounced && outcome != CollisionOutcome::Crashed {
            player.bounce_back();
        }

        match outcome {
            CollisionOutcome::LifeLost { lives_left } => log::info!(
                "Hit {:?} in lane {}, {} lives left",
                entity.kind,
                entity.lane,
                lives_left
            ),
            CollisionOutcome::Immune => log::debug!(
                "Hit {:?} in lane {} while immune",
                entity.kind,
                entity.lane
            ),
            CollisionOutcome::Crashed => {
                log::warn!("Crashed into {:?} in lane {}", entity.kind, entity.lane)
            }
        }

        events.push(CollisionEvent {
            entity: entity.id,
            kind: entity.kind,
            lane: entity.lane,
            outcome,
            bounced: bounced && outcome != CollisionOutcome::Crashed,
        });

        if outcome == CollisionOutcome::Crashed {
            break;
        }
    }

    events
}

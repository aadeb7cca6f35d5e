//! Traffic pool tests: spawning, relative motion, pruning and lane queries

use lane_dodge::simulation::{
    relative_speed, Board, EntityKind, EntityPool, RoadGeometry, SimConfig,
};
use pretty_assertions::assert_eq;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn setup() -> (SimConfig, RoadGeometry, EntityPool) {
    let config = SimConfig::default();
    let geometry = RoadGeometry::from_config(&config);
    let pool = EntityPool::new(config.num_lanes);
    (config, geometry, pool)
}

#[test]
fn test_spawn_batch_positions() {
    let (config, geometry, mut pool) = setup();
    let mut board = Board::empty(3, 3);
    board.set(0, 0, Some(EntityKind::Obstacle));
    board.set(2, 2, Some(EntityKind::Truck));

    let ids = pool.spawn_batch(&board, config.cell_height, &geometry);
    assert_eq!(ids.len(), 2);
    assert_eq!(pool.len(), 2);

    // Rows are stacked above the viewport, the bottom row closest to it
    let obstacle = pool.get(ids[0]).unwrap();
    assert_eq!(obstacle.kind, EntityKind::Obstacle);
    assert_eq!(obstacle.lane, 0);
    assert!(approx(obstacle.y, -480.0));
    assert!(approx(
        obstacle.x + 48.0 * config.scale / 2.0,
        geometry.lane_center_x(0)
    ));

    let truck = pool.get(ids[1]).unwrap();
    assert_eq!(truck.lane, 2);
    assert!(approx(truck.y, -160.0));
    assert!(approx(
        truck.x + 46.0 * config.scale / 2.0,
        geometry.lane_center_x(2)
    ));
    assert!(!truck.was_hit);
}

#[test]
fn test_relative_speed() {
    // Obstacles scroll with the road
    assert!(approx(relative_speed(EntityKind::Obstacle, 120.0, 90.0, 2.0), 240.0));
    // Traffic drives forward, so it closes in more slowly
    assert!(approx(relative_speed(EntityKind::FastVehicle, 120.0, 90.0, 2.0), 96.0));
    assert!(approx(relative_speed(EntityKind::Truck, 120.0, 90.0, 2.0), 186.0));
    // A slowed player can fall behind fast traffic
    assert!(relative_speed(EntityKind::FastVehicle, 30.0, 90.0, 2.0) < 0.0);
}

#[test]
fn test_advance_moves_entities_relative_to_player() {
    let (config, geometry, mut pool) = setup();
    let obstacle = pool.spawn(EntityKind::Obstacle, 0, 0.0, &geometry);
    let fast = pool.spawn(EntityKind::FastVehicle, 1, 0.0, &geometry);

    pool.advance(0.5, 120.0, config.baseline_other_speed, config.scale);
    assert!(approx(pool.get(obstacle).unwrap().y, 120.0));
    assert!(approx(pool.get(fast).unwrap().y, 48.0));

    // After a collision the player is slower than the traffic ahead
    pool.advance(0.5, 30.0, config.baseline_other_speed, config.scale);
    assert!(approx(pool.get(obstacle).unwrap().y, 150.0));
    assert!(approx(pool.get(fast).unwrap().y, 6.0));
}

#[test]
fn test_prune_removes_passed_and_hit() {
    let (config, geometry, mut pool) = setup();
    let below = pool.spawn(EntityKind::Vehicle, 0, config.viewport_height + 1.0, &geometry);
    let hit = pool.spawn(EntityKind::Truck, 1, 300.0, &geometry);
    let visible = pool.spawn(EntityKind::Obstacle, 2, 300.0, &geometry);

    assert!(pool.mark_hit(hit));
    assert!(!pool.mark_hit(hit), "an entity is only hit once");

    let report = pool.prune(config.viewport_height);
    assert_eq!(report.passed, vec![below]);
    assert_eq!(report.hit, vec![hit]);
    assert_eq!(pool.len(), 1);
    assert!(pool.get(visible).is_some());
    assert!(pool.entities_in_band(1, 0.0, 640.0).is_empty());
}

#[test]
fn test_entity_at_bottom_edge_is_kept() {
    let (config, geometry, mut pool) = setup();
    pool.spawn(EntityKind::Vehicle, 0, config.viewport_height, &geometry);

    let report = pool.prune(config.viewport_height);
    assert!(report.passed.is_empty());
    assert_eq!(pool.len(), 1);
}

#[test]
fn test_lane_queries() {
    let (config, geometry, mut pool) = setup();
    let far = pool.spawn(EntityKind::Vehicle, 1, -200.0, &geometry);
    let near = pool.spawn(EntityKind::Truck, 1, 100.0, &geometry);
    let other_lane = pool.spawn(EntityKind::Obstacle, 0, 150.0, &geometry);
    let behind = pool.spawn(EntityKind::Vehicle, 1, 600.0, &geometry);

    let band: Vec<_> = pool
        .entities_in_band(1, -250.0, 150.0)
        .iter()
        .map(|entity| entity.id)
        .collect();
    assert_eq!(band, vec![far, near]);

    assert_eq!(pool.nearest_ahead(1, 500.0).map(|e| e.id), Some(near));
    assert_eq!(pool.nearest_ahead(0, 500.0).map(|e| e.id), Some(other_lane));
    assert_eq!(pool.nearest_ahead(2, 500.0).map(|e| e.id), None);
    assert_eq!(pool.nearest_ahead(1, 700.0).map(|e| e.id), Some(behind));

    // Hit entities no longer count as traffic ahead
    pool.mark_hit(near);
    assert_eq!(pool.nearest_ahead(1, 500.0).map(|e| e.id), Some(far));

    // The lane index follows entities as they move
    pool.advance(1.0, 120.0, config.baseline_other_speed, config.scale);
    assert_eq!(pool.entities_in_band(0, 380.0, 400.0).len(), 1);
}

#[test]
fn test_snapshot_is_sorted_by_id() {
    let (_, geometry, mut pool) = setup();
    let ids: Vec<_> = (0..10)
        .map(|i| pool.spawn(EntityKind::Vehicle, i % 3, i as f32 * -50.0, &geometry))
        .collect();

    let snapshot_ids: Vec<_> = pool.snapshot().iter().map(|entity| entity.id).collect();
    assert_eq!(snapshot_ids, ids);

    pool.clear();
    assert!(pool.is_empty());
    let next = pool.spawn(EntityKind::Vehicle, 0, 0.0, &geometry);
    assert!(next > ids[9], "IDs are never reused");
}

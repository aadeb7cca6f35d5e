//! Board generation tests
//!
//! These tests validate density, passability and configuration checks of the
//! board generator, and the handcrafted presets it can fall back on.

use lane_dodge::simulation::{
    board_is_passable, builtin_presets, normalize, sentinel_rows, Board, BoardGenerator,
    ConfigError, EntityKind, Preset, PresetCell, SimConfig, SimWorld,
};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

fn config(lanes: usize, rows: usize, density: usize) -> SimConfig {
    SimConfig {
        num_lanes: lanes,
        rows_per_batch: rows,
        density_per_batch: density,
        ..SimConfig::default()
    }
}

/// Generate a chain of normalized boards the way the world does
fn board_chain(config: &SimConfig, seed: u64, count: usize) -> Vec<Board> {
    let generator = BoardGenerator::new(config).expect("config should be valid");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut boards: Vec<Board> = Vec::new();
    for _ in 0..count {
        let previous = boards.last();
        let generated = generator.generate(&mut rng, previous);
        assert!(
            board_is_passable(&generated.board, previous),
            "generator returned an unpassable board:\n{}",
            generated.board
        );
        let mut board = generated.board;
        normalize(&mut board, previous);
        boards.push(board);
    }
    boards
}

#[test]
fn test_generated_boards_keep_density() {
    for density in 0..=6 {
        let config = config(3, 3, density);
        let generator = BoardGenerator::new(&config).unwrap();
        let mut rng = StdRng::seed_from_u64(density as u64);
        for _ in 0..50 {
            let generated = generator.generate(&mut rng, None);
            assert_eq!(generated.board.occupied_count(), density);
            assert_eq!(generated.board.rows(), 3);
            assert_eq!(generated.board.lanes(), 3);
            assert!(!generated.from_preset);
        }
    }
}

#[test]
fn test_boards_stay_passable_with_previous_board() {
    let config = config(3, 3, 4);
    let boards = board_chain(&config, 42, 200);

    for pair in boards.windows(2) {
        assert!(
            board_is_passable(&pair[1], Some(&pair[0])),
            "normalized board should stay passable:\n{}\nabove\n{}",
            pair[1],
            pair[0]
        );
    }
}

#[test]
fn test_densest_playable_boards_terminate() {
    // Six of nine cells taken leaves three free cells for three rows
    let boards = board_chain(&config(3, 3, 6), 7, 100);
    assert_eq!(boards.len(), 100);

    let boards = board_chain(&config(5, 4, 16), 9, 50);
    assert_eq!(boards.len(), 50);
}

#[test]
fn test_wide_road_boards() {
    let config = config(6, 3, 9);
    for (index, board) in board_chain(&config, 1, 100).iter().enumerate() {
        assert_eq!(board.lanes(), 6, "board {} has the wrong width", index);
        assert!(board.occupied_count() <= 9);
    }
}

#[test]
fn test_generation_is_deterministic_for_a_seed() {
    let config = config(4, 3, 5);
    assert_eq!(board_chain(&config, 99, 20), board_chain(&config, 99, 20));
}

#[test]
fn test_sentinel_rows() {
    assert_eq!(sentinel_rows(1), 1);
    assert_eq!(sentinel_rows(2), 1);
    assert_eq!(sentinel_rows(3), 1);
    assert_eq!(sentinel_rows(5), 2);
    assert_eq!(sentinel_rows(8), 4);
}

#[test]
fn test_passability_uses_previous_board() {
    // A free column on the far left
    let board = Board::from_rows(vec![
        vec![None, Some(EntityKind::Obstacle), Some(EntityKind::Obstacle)],
        vec![None, Some(EntityKind::Obstacle), Some(EntityKind::Obstacle)],
        vec![None, Some(EntityKind::Obstacle), Some(EntityKind::Obstacle)],
    ])
    .unwrap();
    assert!(board_is_passable(&board, None));

    // The previous board only lets the player out on the far right
    let previous = Board::from_rows(vec![
        vec![Some(EntityKind::Truck), Some(EntityKind::Truck), None],
        vec![Some(EntityKind::Truck), Some(EntityKind::Truck), None],
        vec![Some(EntityKind::Truck), Some(EntityKind::Truck), None],
    ])
    .unwrap();
    assert!(board_is_passable(&previous, None));
    assert!(!board_is_passable(&board, Some(&previous)));
}

/// Generate against `previous` on a worker thread, failing instead of hanging
fn generate_after(config: SimConfig, previous: Board) -> Board {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let generator = BoardGenerator::new(&config).expect("config should be valid");
        let mut rng = StdRng::seed_from_u64(11);
        let generated = generator.generate(&mut rng, Some(&previous));
        let _ = tx.send(generated.board);
    });
    rx.recv_timeout(Duration::from_secs(10))
        .expect("generation did not finish")
}

#[test]
fn test_generation_ignores_previous_board_of_another_width() {
    let board = generate_after(config(3, 3, 4), Board::empty(3, 4));
    assert_eq!(board.lanes(), 3);
    assert_eq!(board.rows(), 3);
    assert_eq!(board.occupied_count(), 4);
    assert!(board_is_passable(&board, None));
}

#[test]
fn test_generation_ignores_blocked_previous_board() {
    let wall = vec![Some(EntityKind::Obstacle); 3];
    let previous = Board::from_rows(vec![wall.clone(), wall.clone(), wall]).unwrap();
    assert!(!board_is_passable(&previous, None));

    let board = generate_after(config(3, 3, 4), previous);
    assert_eq!(board.lanes(), 3);
    assert_eq!(board.occupied_count(), 4);
    assert!(board_is_passable(&board, None));
}

#[test]
fn test_config_rejects_unplayable_density() {
    let result = BoardGenerator::new(&config(3, 3, 9));
    assert!(matches!(
        result,
        Err(ConfigError::UnpassableDensity {
            density: 9,
            free: 0,
            rows: 3
        })
    ));

    let result = BoardGenerator::new(&config(3, 3, 7));
    assert!(matches!(result, Err(ConfigError::UnpassableDensity { .. })));

    let result = BoardGenerator::new(&config(3, 3, 10));
    assert!(matches!(
        result,
        Err(ConfigError::DensityExceedsCells { cells: 9, .. })
    ));

    assert!(SimWorld::new(config(3, 3, 9)).is_err());
}

#[test]
fn test_config_rejects_empty_board() {
    assert_eq!(config(0, 3, 0).validate(), Err(ConfigError::NoLanes));
    assert_eq!(config(3, 0, 0).validate(), Err(ConfigError::NoRows));
}

#[test]
fn test_config_rejects_bad_values() {
    let config = SimConfig {
        scale: 0.0,
        ..SimConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NonPositive { field: "scale", .. })
    ));

    let config = SimConfig {
        scale: f32::INFINITY,
        ..SimConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NonPositive { field: "scale", .. })
    ));

    let config = SimConfig {
        player_base_speed: f32::NAN,
        ..SimConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NonPositive {
            field: "player_base_speed",
            ..
        })
    ));
    assert!(SimWorld::new(config).is_err());

    let config = SimConfig {
        collision_speed_penalty: 1.5,
        ..SimConfig::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfUnitRange { .. })
    ));

    let config = SimConfig {
        lives_total: 0,
        ..SimConfig::default()
    };
    assert_eq!(config.validate(), Err(ConfigError::NoLives));

    assert_eq!(SimConfig::default().validate(), Ok(()));
}

#[test]
fn test_single_kind_catalog() {
    let config = config(3, 3, 5);
    let generator = BoardGenerator::with_catalog(&config, &[EntityKind::Truck]).unwrap();
    let mut rng = StdRng::seed_from_u64(5);

    for _ in 0..20 {
        let board = generator.generate(&mut rng, None).board;
        assert!(board.iter_occupied().all(|(_, kind)| kind == EntityKind::Truck));
    }
}

#[test]
fn test_empty_catalog_is_rejected() {
    let result = BoardGenerator::with_catalog(&SimConfig::default(), &[]);
    assert!(matches!(result, Err(ConfigError::InvalidCatalog(_))));
}

#[test]
fn test_board_display() {
    let board = Board::from_rows(vec![
        vec![Some(EntityKind::Obstacle), None, None],
        vec![None, Some(EntityKind::FastVehicle), None],
        vec![None, None, Some(EntityKind::Truck)],
    ])
    .unwrap();
    assert_eq!(board.to_string(), "#..\n.F.\n..T\n");
}

#[test]
fn test_ragged_board_is_rejected() {
    let result = Board::from_rows(vec![vec![None, None, None], vec![None, None]]);
    assert!(result.is_err());
}

#[test]
fn test_preset_parsing() {
    let preset = Preset::parse("020 200 002").unwrap();
    assert_eq!(preset.rows(), 3);
    assert_eq!(preset.lanes(), 3);
    assert_eq!(preset.cell(0, 0), Some(PresetCell::Empty));
    assert_eq!(preset.cell(0, 1), Some(PresetCell::Kind(EntityKind::Obstacle)));
    assert_eq!(preset.cell(2, 2), Some(PresetCell::Kind(EntityKind::Obstacle)));

    let preset = Preset::parse("1 6").unwrap();
    assert_eq!(preset.cell(0, 0), Some(PresetCell::Any));
    assert_eq!(preset.cell(1, 0), Some(PresetCell::Kind(EntityKind::Truck)));

    assert!(Preset::parse("0a0 000").is_err());
    assert!(Preset::parse("00 000").is_err());
    assert!(Preset::parse("").is_err());
}

#[test]
fn test_builtin_presets_are_passable() {
    let presets = builtin_presets();
    assert_eq!(presets.len(), 2);

    let mut rng = StdRng::seed_from_u64(0);
    for preset in &presets {
        let board = preset.instantiate(&mut rng, |_| EntityKind::Vehicle);
        assert!(board.occupied_count() > 0);
        assert!(board_is_passable(&board, None), "preset blocks the road:\n{}", board);
    }
}

#[test]
fn test_preset_any_cells_use_picker() {
    let preset = Preset::parse("101 000").unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    let board = preset.instantiate(&mut rng, |_| EntityKind::SlowVehicle);

    assert_eq!(board.get(0, 0), Some(EntityKind::SlowVehicle));
    assert_eq!(board.get(0, 1), None);
    assert_eq!(board.get(0, 2), Some(EntityKind::SlowVehicle));
    assert_eq!(board.occupied_count(), 2);
}

#[test]
fn test_generator_uses_presets_when_forced() {
    let config = SimConfig {
        preset_chance: 1.0,
        ..SimConfig::default()
    };
    let generator = BoardGenerator::new(&config).unwrap();
    assert_eq!(generator.presets().len(), 2);

    let mut rng = StdRng::seed_from_u64(3);
    let expected: Vec<Board> = generator
        .presets()
        .iter()
        .map(|preset| preset.instantiate(&mut rng, |_| EntityKind::Vehicle))
        .collect();

    for _ in 0..20 {
        let generated = generator.generate(&mut rng, None);
        assert!(generated.from_preset);
        assert_eq!(generated.rejected, 0);
        assert!(expected.contains(&generated.board));
    }
}

#[test]
fn test_presets_filtered_by_board_size() {
    let generator = BoardGenerator::new(&SimConfig {
        preset_chance: 1.0,
        ..config(4, 3, 3)
    })
    .unwrap();
    assert!(generator.presets().is_empty());

    // Without a matching preset the generator falls back to shuffling
    let mut rng = StdRng::seed_from_u64(8);
    let generated = generator.generate(&mut rng, None);
    assert!(!generated.from_preset);
    assert_eq!(generated.board.occupied_count(), 3);
}

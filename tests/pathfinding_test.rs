//! Grid pathfinding tests
//!
//! Grids are written as strings, `#` for a wall and `.` for a free cell,
//! row 0 at the top.

use lane_dodge::simulation::{find_path, has_path, CellPos, GridCell, GridGraph, PassabilityGrid};
use pretty_assertions::assert_eq;

fn grid(rows: &[&str]) -> PassabilityGrid {
    let rows = rows
        .iter()
        .map(|row| {
            row.chars()
                .map(|c| if c == '#' { GridCell::Wall } else { GridCell::Free })
                .collect()
        })
        .collect();
    PassabilityGrid::from_rows(rows).expect("test grid should be rectangular")
}

fn assert_legal_moves(path: &[CellPos]) {
    for step in path.windows(2) {
        assert_eq!(step[1].row + 1, step[0].row, "every move goes one row up");
        assert!(step[0].col.abs_diff(step[1].col) <= 1, "at most one column sideways");
    }
}

#[test]
fn test_open_grid_has_shortest_path() {
    let grid = grid(&["...", "...", "..."]);
    let start = CellPos::new(2, 1);
    let end = CellPos::new(0, 1);

    let path = find_path(&grid, start, end).expect("open grid should be passable");
    assert_eq!(path.len(), 3);
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&end));
    assert_legal_moves(&path);
}

#[test]
fn test_zigzag_corridor() {
    let grid = grid(&["#.#", "##.", "#.#", ".##", "#.#"]);

    let path = find_path(&grid, CellPos::new(4, 1), CellPos::new(0, 1))
        .expect("diagonal corridor should be passable");

    assert_eq!(
        path,
        vec![
            CellPos::new(4, 1),
            CellPos::new(3, 0),
            CellPos::new(2, 1),
            CellPos::new(1, 2),
            CellPos::new(0, 1),
        ]
    );
}

#[test]
fn test_single_column_corridor() {
    let open = grid(&[".", ".", ".", "."]);
    let path = find_path(&open, CellPos::new(3, 0), CellPos::new(0, 0)).unwrap();
    assert_eq!(path.len(), 4);
    assert!(path.iter().all(|cell| cell.col == 0));

    let blocked = grid(&[".", "#", "."]);
    assert!(!has_path(&blocked, CellPos::new(2, 0), CellPos::new(0, 0)));
}

#[test]
fn test_fully_blocked_row() {
    let grid = grid(&["...", "###", "..."]);
    assert!(!has_path(&grid, CellPos::new(2, 1), CellPos::new(0, 1)));
}

#[test]
fn test_blocked_start_or_end() {
    let blocked_start = grid(&["...", "...", ".#."]);
    assert!(!has_path(&blocked_start, CellPos::new(2, 1), CellPos::new(0, 1)));

    let blocked_end = grid(&[".#.", "...", "..."]);
    assert!(!has_path(&blocked_end, CellPos::new(2, 1), CellPos::new(0, 1)));
}

#[test]
fn test_two_column_jump_is_not_allowed() {
    // The only free cell above the start is two columns away
    let grid = grid(&[".##", "##."]);
    assert!(!has_path(&grid, CellPos::new(1, 2), CellPos::new(0, 0)));
}

#[test]
fn test_moves_never_go_down() {
    // The free cells connect, but only by driving back down and around
    let grid = grid(&[".###", ".#..", ".#.#", "...#"]);
    assert!(!has_path(&grid, CellPos::new(1, 3), CellPos::new(0, 0)));
    assert!(has_path(&grid, CellPos::new(3, 0), CellPos::new(0, 0)));
}

#[test]
fn test_out_of_grid_endpoints() {
    let grid = grid(&["...", "..."]);
    assert!(!has_path(&grid, CellPos::new(5, 1), CellPos::new(0, 1)));
    assert!(!has_path(&grid, CellPos::new(1, 1), CellPos::new(0, 7)));
}

#[test]
fn test_graph_counts() {
    let graph = GridGraph::from_grid(&grid(&["..", ".."]));
    assert_eq!(graph.node_count(), 4);
    // Each bottom cell reaches both top cells
    assert_eq!(graph.edge_count(), 4);

    let graph = GridGraph::from_grid(&grid(&["#.", ".#"]));
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn test_ragged_grid_is_rejected() {
    let rows = vec![vec![GridCell::Free; 3], vec![GridCell::Free; 2]];
    assert!(PassabilityGrid::from_rows(rows).is_err());

    let mut grid = PassabilityGrid::new(3);
    grid.push_free_rows(2);
    assert!(grid.push_row(vec![GridCell::Wall; 4]).is_err());
    assert_eq!(grid.rows(), 2);
}

//! Board generation for the traffic engine
//!
//! A board is one batch of lane/row placements. Candidates are produced by
//! shuffling a fixed number of occupied cells across the grid and are rejected
//! until the pathfinder confirms the player can still get through, counting
//! the previous board that is still on screen.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use std::collections::BTreeSet;
use std::fmt;

use super::config::SimConfig;
use super::error::ConfigError;
use super::grid_graph::{CellPos, GridCell, GridGraph, PassabilityGrid};
use super::kinds::EntityKind;
use super::presets::{builtin_presets, Preset};

/// One generated batch of traffic, row 0 farthest from the player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    lanes: usize,
    cells: Vec<Vec<Option<EntityKind>>>,
}

impl Board {
    /// Create a board with every cell empty
    pub fn empty(rows: usize, lanes: usize) -> Self {
        Self {
            lanes,
            cells: vec![vec![None; lanes]; rows],
        }
    }

    /// Build a board from explicit rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<Option<EntityKind>>>) -> anyhow::Result<Self> {
        let lanes = rows.first().map(|row| row.len()).unwrap_or(0);
        if let Some(index) = rows.iter().position(|row| row.len() != lanes) {
            anyhow::bail!(
                "Board row {} has {} lanes, expected {}",
                index,
                rows[index].len(),
                lanes
            );
        }
        Ok(Self { lanes, cells: rows })
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn lanes(&self) -> usize {
        self.lanes
    }

    pub fn get(&self, row: usize, lane: usize) -> Option<EntityKind> {
        self.cells.get(row)?.get(lane).copied().flatten()
    }

    /// Place a kind in a cell; out-of-range cells are ignored
    pub fn set(&mut self, row: usize, lane: usize, kind: Option<EntityKind>) {
        if let Some(cell) = self.cells.get_mut(row).and_then(|r| r.get_mut(lane)) {
            *cell = kind;
        }
    }

    /// Empty a cell, returning what was there
    pub fn clear(&mut self, row: usize, lane: usize) -> Option<EntityKind> {
        self.cells
            .get_mut(row)
            .and_then(|r| r.get_mut(lane))
            .and_then(|cell| cell.take())
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| cell.is_some()).count()
    }

    pub fn occupied_cells(&self) -> BTreeSet<CellPos> {
        self.iter_occupied().map(|(pos, _)| pos).collect()
    }

    /// Occupied cells with their kinds, top row first
    pub fn iter_occupied(&self) -> impl Iterator<Item = (CellPos, EntityKind)> + '_ {
        self.cells.iter().enumerate().flat_map(|(row, lanes)| {
            lanes
                .iter()
                .enumerate()
                .filter_map(move |(lane, cell)| cell.map(|kind| (CellPos::new(row, lane), kind)))
        })
    }

    /// Occupied cells as walls, empty cells as free
    pub fn passability_rows(&self) -> Vec<Vec<GridCell>> {
        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Some(_) => GridCell::Wall,
                        None => GridCell::Free,
                    })
                    .collect()
            })
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            let line: String = row
                .iter()
                .map(|cell| cell.map(|kind| kind.symbol()).unwrap_or('.'))
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Number of free rows padded above and below a validation grid.
/// Enough for the center cell to reach every lane before the board starts.
pub fn sentinel_rows(lanes: usize) -> usize {
    (lanes / 2).max(1)
}

/// Stack sentinel rows, the candidate and the previous board into one grid
fn combined_grid(
    candidate: Vec<Vec<GridCell>>,
    previous: Option<&Board>,
    lanes: usize,
) -> Option<PassabilityGrid> {
    let sentinels = sentinel_rows(lanes);
    let mut grid = PassabilityGrid::new(lanes);
    grid.push_free_rows(sentinels);
    for row in candidate {
        grid.push_row(row).ok()?;
    }
    if let Some(previous) = previous {
        for row in previous.passability_rows() {
            grid.push_row(row).ok()?;
        }
    }
    grid.push_free_rows(sentinels);
    Some(grid)
}

/// Whether a candidate layout leaves a path from bottom-center to top-center
fn layout_is_passable(
    candidate: Vec<Vec<GridCell>>,
    previous: Option<&Board>,
    lanes: usize,
) -> bool {
    let Some(grid) = combined_grid(candidate, previous, lanes) else {
        return false;
    };
    let center = lanes / 2;
    let start = CellPos::new(grid.rows() - 1, center);
    let end = CellPos::new(0, center);
    GridGraph::from_grid(&grid).has_path(start, end)
}

/// Whether `board`, shown above `previous`, can be driven through
pub fn board_is_passable(board: &Board, previous: Option<&Board>) -> bool {
    layout_is_passable(board.passability_rows(), previous, board.lanes())
}

/// A board accepted by the generator, with how it was produced
#[derive(Debug, Clone)]
pub struct GeneratedBoard {
    pub board: Board,
    /// Candidates thrown away before this one passed validation
    pub rejected: usize,
    pub from_preset: bool,
}

/// Produces validated boards for a fixed board size and density
#[derive(Debug, Clone)]
pub struct BoardGenerator {
    rows: usize,
    lanes: usize,
    density: usize,
    kinds: Vec<EntityKind>,
    weights: WeightedIndex<u32>,
    presets: Vec<Preset>,
    preset_chance: f64,
}

impl BoardGenerator {
    /// Create a generator over the full catalog.
    /// Fails when the configuration can never produce a passable board.
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        Self::with_catalog(config, &EntityKind::ALL)
    }

    /// Create a generator that only places the given kinds
    pub fn with_catalog(config: &SimConfig, kinds: &[EntityKind]) -> Result<Self, ConfigError> {
        config.validate()?;

        let weights = WeightedIndex::new(kinds.iter().map(|kind| kind.spawn_weight()))
            .map_err(|e| ConfigError::InvalidCatalog(e.to_string()))?;

        let presets = builtin_presets()
            .into_iter()
            .filter(|preset| {
                preset.rows() == config.rows_per_batch && preset.lanes() == config.num_lanes
            })
            .collect();

        Ok(Self {
            rows: config.rows_per_batch,
            lanes: config.num_lanes,
            density: config.density_per_batch,
            kinds: kinds.to_vec(),
            weights,
            presets,
            preset_chance: config.preset_chance,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn lanes(&self) -> usize {
        self.lanes
    }

    pub fn density(&self) -> usize {
        self.density
    }

    /// Presets matching this generator's board size
    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Pick a kind for an occupied cell, weighted by the catalog
    pub fn pick_kind<R: Rng + ?Sized>(&self, rng: &mut R) -> EntityKind {
        self.kinds[self.weights.sample(rng)]
    }

    /// Produce a board that is passable together with `previous`.
    ///
    /// Rejection sampling always terminates: the configuration was checked to
    /// leave a free cell in every row, and a column of free cells lined up with
    /// the previous board's exit is one of the layouts a shuffle can produce.
    /// A `previous` board without such an exit is ignored.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R, previous: Option<&Board>) -> GeneratedBoard {
        let previous = previous.filter(|board| self.can_follow(board));

        if let Some(board) = self.try_preset(rng, previous) {
            return GeneratedBoard {
                board,
                rejected: 0,
                from_preset: true,
            };
        }

        let mut rejected = 0;
        loop {
            let layout = self.shuffled_layout(rng);
            if layout_is_passable(self.layout_rows(&layout), previous, self.lanes) {
                return GeneratedBoard {
                    board: self.assign_kinds(rng, &layout),
                    rejected,
                    from_preset: false,
                };
            }
            rejected += 1;
            log::trace!("Rejected unpassable board candidate #{}", rejected);
        }
    }

    /// Whether a new board can be validated against `previous`
    fn can_follow(&self, previous: &Board) -> bool {
        if previous.lanes() != self.lanes {
            log::warn!(
                "Ignoring previous board with {} lanes, generator has {}",
                previous.lanes(),
                self.lanes
            );
            return false;
        }
        if !board_is_passable(previous, None) {
            log::warn!("Ignoring previous board with no way through:\n{}", previous);
            return false;
        }
        true
    }

    /// Uniform permutation of exactly `density` occupied cells
    fn shuffled_layout<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<bool> {
        let cells = self.rows * self.lanes;
        let mut layout = vec![true; self.density];
        layout.resize(cells, false);
        layout.shuffle(rng);
        layout
    }

    fn layout_rows(&self, layout: &[bool]) -> Vec<Vec<GridCell>> {
        layout
            .chunks(self.lanes)
            .map(|row| {
                row.iter()
                    .map(|&occupied| if occupied { GridCell::Wall } else { GridCell::Free })
                    .collect()
            })
            .collect()
    }

    fn assign_kinds<R: Rng + ?Sized>(&self, rng: &mut R, layout: &[bool]) -> Board {
        let mut board = Board::empty(self.rows, self.lanes);
        for (index, &occupied) in layout.iter().enumerate() {
            if occupied {
                let kind = self.pick_kind(rng);
                board.set(index / self.lanes, index % self.lanes, Some(kind));
            }
        }
        board
    }

    fn try_preset<R: Rng + ?Sized>(&self, rng: &mut R, previous: Option<&Board>) -> Option<Board> {
        if self.preset_chance <= 0.0 || self.presets.is_empty() {
            return None;
        }
        if !rng.random_bool(self.preset_chance) {
            return None;
        }

        let preset = self.presets.choose(rng)?;
        let board = preset.instantiate(rng, |rng| self.pick_kind(rng));
        if board_is_passable(&board, previous) {
            Some(board)
        } else {
            log::debug!("Preset does not fit the previous board, falling back to a shuffle");
            None
        }
    }
}

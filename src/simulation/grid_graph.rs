//! Grid graph for board pathfinding
//!
//! A passability grid is turned into a directed graph whose edges only lead
//! one row up and at most one column sideways, which is exactly the move set a
//! player has while driving through a board. Searching it answers whether a
//! board leaves the player a way through.

use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// A single cell of a passability grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCell {
    Wall,
    Free,
}

impl GridCell {
    pub fn is_free(&self) -> bool {
        matches!(self, GridCell::Free)
    }
}

/// Row/column coordinate in a grid, row 0 at the top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A rectangular grid of wall/free cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassabilityGrid {
    cols: usize,
    cells: Vec<Vec<GridCell>>,
}

impl PassabilityGrid {
    /// Create an empty grid with a fixed number of columns
    pub fn new(cols: usize) -> Self {
        Self {
            cols,
            cells: Vec::new(),
        }
    }

    /// Build a grid from rows, rejecting ragged input
    pub fn from_rows(rows: Vec<Vec<GridCell>>) -> anyhow::Result<Self> {
        let cols = rows.first().map(|row| row.len()).unwrap_or(0);
        let mut grid = Self::new(cols);
        for row in rows {
            grid.push_row(row)?;
        }
        Ok(grid)
    }

    /// Append a row at the bottom of the grid
    pub fn push_row(&mut self, row: Vec<GridCell>) -> anyhow::Result<()> {
        if row.len() != self.cols {
            anyhow::bail!(
                "Row {} has {} cells, grid has {} columns",
                self.cells.len(),
                row.len(),
                self.cols
            );
        }
        self.cells.push(row);
        Ok(())
    }

    /// Append `count` rows with every cell free
    pub fn push_free_rows(&mut self, count: usize) {
        for _ in 0..count {
            self.cells.push(vec![GridCell::Free; self.cols]);
        }
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn get(&self, pos: CellPos) -> Option<GridCell> {
        self.cells.get(pos.row)?.get(pos.col).copied()
    }

    pub fn is_free(&self, pos: CellPos) -> bool {
        self.get(pos).is_some_and(|cell| cell.is_free())
    }
}

/// Graph of free cells connected by upward moves
pub struct GridGraph {
    /// The underlying petgraph directed graph (edges point one row up)
    graph: DiGraph<CellPos, ()>,

    /// Maps free cells to their node indices in the graph
    cell_to_node: HashMap<CellPos, NodeIndex>,
}

impl GridGraph {
    pub fn from_grid(grid: &PassabilityGrid) -> Self {
        let mut graph = DiGraph::new();
        let mut cell_to_node = HashMap::new();

        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let pos = CellPos::new(row, col);
                if grid.is_free(pos) {
                    cell_to_node.insert(pos, graph.add_node(pos));
                }
            }
        }

        // Connect each free cell to the free cells straight above and diagonally above
        for row in 1..grid.rows() {
            for col in 0..grid.cols() {
                let Some(&from) = cell_to_node.get(&CellPos::new(row, col)) else {
                    continue;
                };
                let first = col.saturating_sub(1);
                let last = (col + 1).min(grid.cols() - 1);
                for target_col in first..=last {
                    if let Some(&to) = cell_to_node.get(&CellPos::new(row - 1, target_col)) {
                        graph.add_edge(from, to, ());
                    }
                }
            }
        }

        Self {
            graph,
            cell_to_node,
        }
    }

    /// Number of free cells in the graph
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of legal moves between free cells
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Finds a path between two cells using A* with the remaining row count as heuristic
    pub fn find_path(&self, start: CellPos, end: CellPos) -> Option<Vec<CellPos>> {
        let start_node = self.cell_to_node.get(&start)?;
        let end_node = self.cell_to_node.get(&end)?;

        let (_, node_path) = astar(
            &self.graph,
            *start_node,
            |node| node == *end_node,
            |_| 1usize,
            |node| self.graph[node].row.saturating_sub(end.row),
        )?;

        Some(node_path.iter().map(|node| self.graph[*node]).collect())
    }

    pub fn has_path(&self, start: CellPos, end: CellPos) -> bool {
        self.find_path(start, end).is_some()
    }
}

/// Build the graph for `grid` and search it once
pub fn find_path(grid: &PassabilityGrid, start: CellPos, end: CellPos) -> Option<Vec<CellPos>> {
    GridGraph::from_grid(grid).find_path(start, end)
}

/// Whether any path from `start` to `end` exists in `grid`
pub fn has_path(grid: &PassabilityGrid, start: CellPos, end: CellPos) -> bool {
    find_path(grid, start, end).is_some()
}

//! Handcrafted board layouts
//!
//! Presets are written as rows of digit codes separated by whitespace:
//! `0` empty, `1` any kind, `2` obstacle, `3` fast vehicle, `4` vehicle,
//! `5` slow vehicle, `6` truck.

use anyhow::{Context, Result};
use rand::Rng;

use super::board::Board;
use super::kinds::EntityKind;

/// Layouts shipped with the game
const BUILTIN_PRESETS: [&str; 2] = ["020 200 002", "000 220 000"];

/// One cell of a preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetCell {
    Empty,
    /// Filled with a kind drawn from the catalog
    Any,
    Kind(EntityKind),
}

impl PresetCell {
    pub fn from_code(code: char) -> Result<Self> {
        let cell = match code {
            '0' => PresetCell::Empty,
            '1' => PresetCell::Any,
            '2' => PresetCell::Kind(EntityKind::Obstacle),
            '3' => PresetCell::Kind(EntityKind::FastVehicle),
            '4' => PresetCell::Kind(EntityKind::Vehicle),
            '5' => PresetCell::Kind(EntityKind::SlowVehicle),
            '6' => PresetCell::Kind(EntityKind::Truck),
            other => anyhow::bail!("Unknown preset code {:?}", other),
        };
        Ok(cell)
    }
}

/// A handcrafted layout that can stand in for a shuffled board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    cells: Vec<Vec<PresetCell>>,
}

impl Preset {
    /// Parse a preset from whitespace-separated rows of digit codes
    pub fn parse(text: &str) -> Result<Self> {
        let cells = text
            .split_whitespace()
            .enumerate()
            .map(|(index, row)| {
                row.chars()
                    .map(PresetCell::from_code)
                    .collect::<Result<Vec<_>>>()
                    .with_context(|| format!("Invalid preset row {}", index))
            })
            .collect::<Result<Vec<_>>>()?;

        let lanes = cells.first().map(|row| row.len()).unwrap_or(0);
        if lanes == 0 {
            anyhow::bail!("Preset has no cells");
        }
        if cells.iter().any(|row| row.len() != lanes) {
            anyhow::bail!("Preset rows must all have {} lanes", lanes);
        }

        Ok(Self { cells })
    }

    pub fn rows(&self) -> usize {
        self.cells.len()
    }

    pub fn lanes(&self) -> usize {
        self.cells.first().map(|row| row.len()).unwrap_or(0)
    }

    pub fn cell(&self, row: usize, lane: usize) -> Option<PresetCell> {
        self.cells.get(row)?.get(lane).copied()
    }

    /// Turn the preset into a board, drawing a kind for every `Any` cell
    pub fn instantiate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        mut pick: impl FnMut(&mut R) -> EntityKind,
    ) -> Board {
        let mut board = Board::empty(self.rows(), self.lanes());
        for (row, cells) in self.cells.iter().enumerate() {
            for (lane, cell) in cells.iter().enumerate() {
                let kind = match cell {
                    PresetCell::Empty => None,
                    PresetCell::Any => Some(pick(rng)),
                    PresetCell::Kind(kind) => Some(*kind),
                };
                board.set(row, lane, kind);
            }
        }
        board
    }
}

/// Parse the built-in presets
pub fn builtin_presets() -> Vec<Preset> {
    BUILTIN_PRESETS
        .iter()
        .filter_map(|text| match Preset::parse(text) {
            Ok(preset) => Some(preset),
            Err(e) => {
                log::warn!("Skipping built-in preset {:?}: {:#}", text, e);
                None
            }
        })
        .collect()
}

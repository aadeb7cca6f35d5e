//! Traffic normalization
//!
//! Removes placements that would force the player into a collision no matter
//! how they steer, because two pieces of traffic in the same lane close in on
//! each other. Only cells of the new board are ever cleared, so a board that
//! was passable before normalization stays passable after it.

use super::board::Board;
use super::grid_graph::CellPos;
use super::kinds::{EntityKind, TrafficClass};

/// Why a cell was cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearReason {
    /// Sat right below a fast vehicle in its lane
    BelowFastVehicle,
    /// Obstacle sat right above a slow vehicle in its lane
    AboveSlowVehicle,
    /// Fast vehicle would run into traffic from the previous board
    FastOntoPreviousBoard,
    /// Obstacle would land on a slow vehicle from the previous board
    ObstacleOntoPreviousBoard,
}

/// A cell the normalizer emptied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedCell {
    pub pos: CellPos,
    pub kind: EntityKind,
    pub reason: ClearReason,
}

/// Clear unfair placements from `board`, returning what was removed.
///
/// Rows are visited top to bottom and lanes right to left; each fix is visible
/// to the ones after it. `previous` is the board spawned just before, whose
/// top row sits directly below this board's bottom row.
pub fn normalize(board: &mut Board, previous: Option<&Board>) -> Vec<ClearedCell> {
    let mut cleared = Vec::new();

    for row in 0..board.rows() {
        for lane in (0..board.lanes()).rev() {
            let Some(kind) = board.get(row, lane) else {
                continue;
            };

            match kind.class() {
                TrafficClass::Fast => {
                    let below = row + 1;
                    if let Some(lower) = board.get(below, lane) {
                        if lower.class().blocks_fast_traffic() {
                            board.clear(below, lane);
                            cleared.push(ClearedCell {
                                pos: CellPos::new(below, lane),
                                kind: lower,
                                reason: ClearReason::BelowFastVehicle,
                            });
                        }
                    }
                }
                TrafficClass::Slow => {
                    if let Some(above) = row.checked_sub(1) {
                        if board.get(above, lane) == Some(EntityKind::Obstacle) {
                            board.clear(above, lane);
                            cleared.push(ClearedCell {
                                pos: CellPos::new(above, lane),
                                kind: EntityKind::Obstacle,
                                reason: ClearReason::AboveSlowVehicle,
                            });
                        }
                    }
                }
                TrafficClass::Static => {}
            }
        }
    }

    if let Some(previous) = previous {
        cleared.extend(normalize_against_previous(board, previous));
    }

    if !cleared.is_empty() {
        log::debug!("Normalizer cleared {} cell(s): {:?}", cleared.len(), cleared);
    }

    cleared
}

/// Fix the seam between this board's bottom row and the previous board's top row.
/// The previous board is already on the road, so the fix always lands on this board.
fn normalize_against_previous(board: &mut Board, previous: &Board) -> Vec<ClearedCell> {
    let mut cleared = Vec::new();
    let Some(bottom) = board.rows().checked_sub(1) else {
        return cleared;
    };

    for lane in (0..board.lanes()).rev() {
        let (Some(kind), Some(lower)) = (board.get(bottom, lane), previous.get(0, lane)) else {
            continue;
        };

        let reason = match (kind.class(), lower.class()) {
            (TrafficClass::Fast, lower_class) if lower_class.blocks_fast_traffic() => {
                ClearReason::FastOntoPreviousBoard
            }
            (TrafficClass::Static, TrafficClass::Slow) => ClearReason::ObstacleOntoPreviousBoard,
            _ => continue,
        };

        board.clear(bottom, lane);
        cleared.push(ClearedCell {
            pos: CellPos::new(bottom, lane),
            kind,
            reason,
        });
    }

    cleared
}

//! Error types for the traffic engine
//!
//! The engine only fails at construction time. Once a world is built every
//! tick, input and lifecycle call is total.

/// A configuration that cannot produce a playable game
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Board must have at least one lane")]
    NoLanes,

    #[error("Board must have at least one row per batch")]
    NoRows,

    #[error("Density {density} exceeds the {cells} cells of a {rows}x{lanes} board")]
    DensityExceedsCells {
        density: usize,
        cells: usize,
        rows: usize,
        lanes: usize,
    },

    #[error(
        "Density {density} leaves {free} free cells for {rows} rows; every row needs at least one free cell"
    )]
    UnpassableDensity {
        density: usize,
        free: usize,
        rows: usize,
    },

    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must be within [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f64 },

    #[error("Lives total must be at least 1")]
    NoLives,

    #[error("Traffic catalog has no spawnable kinds: {0}")]
    InvalidCatalog(String),
}

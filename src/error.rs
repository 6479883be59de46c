//! Error types for the placement engine.

use thiserror::Error;

/// Errors surfaced by the placement pipeline.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// A building whose demand no antenna type can carry.
    #[error("building {id} has demand {demand}, which exceeds every antenna capacity")]
    InfeasibleBuilding { id: u64, demand: u64 },

    #[error("building id {0} does not exist in the dataset")]
    UnknownBuilding(u64),

    #[error("building id {0} appears more than once")]
    DuplicateBuilding(u64),

    #[error("unknown antenna type `{0}`")]
    UnknownAntennaType(String),

    /// The scorer disagreed with the engine's own invariant bookkeeping.
    #[error("scorer rejected the final solution (cost {cost}): {message}")]
    Rejected { cost: u64, message: String },

    #[error("seed solution violates an invariant: {0}")]
    InvalidSeed(#[from] InvariantViolation),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A broken feasibility invariant, reported by [`crate::solution::Solution::check`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("antenna {antenna} serves no buildings")]
    EmptyAntenna { antenna: usize },

    #[error("antenna {antenna} is not placed on a building coordinate")]
    OffBuilding { antenna: usize },

    #[error("building {building} is assigned more than once")]
    DuplicateAssignment { building: u64 },

    #[error("building {building} is not covered")]
    Uncovered { building: u64 },

    #[error("building {building} is out of range of antenna {antenna}")]
    OutOfRange { antenna: usize, building: u64 },

    #[error("antenna {antenna} carries {load}, above its capacity {capacity}")]
    OverCapacity {
        antenna: usize,
        load: u64,
        capacity: u64,
    },
}

pub type Result<T> = std::result::Result<T, PlacementError>;

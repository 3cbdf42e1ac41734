//! Error types for the simulation.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid grid dimensions {rows}x{cols}: both must be at least 1")]
    InvalidGrid { rows: usize, cols: usize },

    #[error("invalid heartbeat range {min_ms}..={max_ms} ms")]
    InvalidHeartbeat { min_ms: u64, max_ms: u64 },

    #[error("inbox capacity must be at least 1")]
    InvalidInboxCapacity,

    #[error("unit cost must be at least 1")]
    InvalidUnitCost,
}

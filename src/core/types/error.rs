//! Custom error types for wasm-memscan

use std::fmt;
use thiserror::Error;

/// Main error type for memory, scan, watch and clock operations
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("No linear memory attached")]
    NotInitialized,

    #[error("Access out of bounds at {address}: {width} byte(s) exceed memory size {size}")]
    OutOfBounds {
        address: String,
        width: usize,
        size: usize,
    },

    #[error("Invalid clock rate: {0} (must be finite and >= 0)")]
    InvalidRate(f64),

    #[error("Invalid value type: {0}")]
    InvalidValueType(String),

    #[error("Invalid comparison: {0}")]
    InvalidComparison(String),

    #[error("Invalid value literal: {0}")]
    InvalidLiteral(String),

    #[error("Invalid memory address: {0}")]
    InvalidAddress(String),

    #[error("Failed to grow memory by {delta} page(s): {reason}")]
    GrowFailed { delta: u32, reason: String },

    #[error("No watch at {0}")]
    WatchNotFound(String),

    #[error("No scan result at index {index} ({count} result(s))")]
    CandidateNotFound { index: usize, count: usize },

    #[error("{0}")]
    InvalidCommand(String),

    #[error("Linear memory lock poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for memory operations
pub type MemoryResult<T> = Result<T, MemoryError>;

impl MemoryError {
    /// Creates an out of bounds error for an access of `width` bytes
    pub fn out_of_bounds(address: impl fmt::Display, width: usize, size: usize) -> Self {
        MemoryError::OutOfBounds {
            address: address.to_string(),
            width,
            size,
        }
    }

    /// Creates a grow failed error
    pub fn grow_failed(delta: u32, reason: impl Into<String>) -> Self {
        MemoryError::GrowFailed {
            delta,
            reason: reason.into(),
        }
    }
}

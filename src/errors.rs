//! Loqui error types.

use std::fmt;

#[derive(Debug, Clone)]
pub enum EngineError {
    DimensionMismatch { expected: usize, got: usize },
    /// A word-selection routine was handed an empty candidate pool.
    NoCandidates(String),
    InvalidInput(String),
    Snapshot(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DimensionMismatch { expected, got } => {
                write!(f, "DimensionMismatch: expected {expected}, got {got}")
            }
            Self::NoCandidates(msg) => write!(f, "NoCandidates: {msg}"),
            Self::InvalidInput(msg) => write!(f, "InvalidInput: {msg}"),
            Self::Snapshot(msg) => write!(f, "SnapshotError: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

pub type Result<T> = std::result::Result<T, EngineError>;

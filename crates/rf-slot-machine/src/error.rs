//! Error types for the slot machine engine

use thiserror::Error;

/// Slot machine error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SlotError {
    /// Bad configuration or symbol table. Fatal at construction.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid bet {amount}: must be within [{min}, {max}]")]
    InvalidBet { amount: u64, min: u64, max: u64 },

    #[error("Insufficient credits: {credits} available, {required} required")]
    InsufficientCredits { credits: u64, required: u64 },

    #[error("A spin is already in progress")]
    AlreadySpinning,

    #[error("Machine is busy spinning")]
    MachineBusy,

    #[error("No spin is waiting to be completed")]
    NotSpinning,

    /// Forced symbols don't match the reel or window count
    #[error("Shape mismatch: expected {expected} entries, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Index {index} out of range (0..{len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<serde_json::Error> for SlotError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

impl From<serde_yml::Error> for SlotError {
    fn from(e: serde_yml::Error) -> Self {
        Self::Parse(e.to_string())
    }
}

/// Result type alias
pub type SlotResult<T> = Result<T, SlotError>;

//! Common error types for KIY

use thiserror::Error;

/// Message surfaced to the user when any part of the generation
/// pipeline fails. Internal causes are logged, never shown.
pub const GENERATION_FAILED_MSG: &str = "Failed to generate song. Please try again.";

/// Common result type for KIY operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors crossing the engine's public boundary
#[derive(Error, Debug)]
pub enum Error {
    /// Any failure inside the generation pipeline. The original cause
    /// is logged at the orchestration boundary and deliberately not
    /// carried here.
    #[error("Failed to generate song. Please try again.")]
    GenerationFailed,

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

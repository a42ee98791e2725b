//! Error types for rp-bubble.

use thiserror::Error;

/// Errors surfaced by parameter validation, the run loop, persistence and
/// export.
///
/// Numeric collapse of the bubble (radius reaching zero) is deliberately not
/// represented here: non-finite values propagate into the trajectory.
#[derive(Debug, Error)]
pub enum BubbleError {
    /// A simulation parameter is outside its admissible range
    #[error("Invalid parameter `{name}`: {message}")]
    InvalidParameter {
        /// Field name
        name: &'static str,
        /// Description of the violation
        message: String,
    },

    /// The configured step ceiling was reached before the end time
    #[error("Maximum number of integration steps ({steps}) exceeded at t = {t}")]
    MaxStepsExceeded {
        /// Step ceiling
        steps: u64,
        /// Time of the last committed step
        t: f64,
    },

    /// A trajectory violates its structural invariants or does not match
    /// the parameters it is paired with
    #[error("Invalid trajectory: {0}")]
    InvalidTrajectory(String),

    /// Underlying I/O failure while saving or loading
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or mismatched JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Persisted record was written by an incompatible schema
    #[error("Unsupported format version {found} (expected {expected})")]
    UnsupportedFormatVersion {
        /// Version found in the record
        found: u32,
        /// Version this build reads and writes
        expected: u32,
    },
}

/// Crate result alias
pub type Result<T> = std::result::Result<T, BubbleError>;

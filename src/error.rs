//! Error type shared by the loader, configuration and solver

use thiserror::Error;

/// Unified error type for XIRR operations
#[derive(Debug, Error)]
pub enum XirrError {
    /// The solver needs at least one cash flow to define the epoch date
    #[error("cash flow series is empty")]
    EmptyCashFlows,

    /// Raised by `SolverConfig::validate`
    #[error("invalid solver configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The outer loop hit `max_iterations` without any stopping condition firing
    #[error(
        "XIRR did not converge after {iterations} iterations; best rate {best_rate} with residual {best_residual}"
    )]
    DidNotConverge {
        /// Number of outer iterations performed
        iterations: usize,
        /// Best rate seen (decimal, NaN if every sample was non-finite)
        best_rate: f64,
        /// Residual at `best_rate`
        best_residual: f64,
    },

    /// A `Date` cell could not be parsed as `YYYY-MM-DD`
    #[error("invalid date `{value}` in row {row}")]
    InvalidDate { row: usize, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl XirrError {
    /// Helper for configuration validation failures
    pub fn invalid_config<S: Into<String>>(reason: S) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Type alias for results returned by this crate
pub type Result<T> = std::result::Result<T, XirrError>;

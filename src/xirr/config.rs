//! Solver configuration

use crate::error::{Result, XirrError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunables for the bracket-refinement solver
///
/// Rate bounds are given in percent (`-1000.0` = -1000%) and scaled to
/// decimals when the solve starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Lower end of the initial bracket, percent
    pub min_rate_pct: f64,

    /// Upper end of the initial bracket, percent
    pub max_rate_pct: f64,

    /// Residual and bracket-span tolerance; also substituted for zero amounts
    pub tolerance: f64,

    /// Grid steps in the first sampling pass
    pub initial_steps: usize,

    /// Upper limit on grid steps after repeated densification
    pub max_samples: usize,

    /// Outer iterations allowed before giving up
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            min_rate_pct: -1000.0,
            max_rate_pct: 1000.0,
            tolerance: 0.0001,
            initial_steps: 10,
            max_samples: 100_000,
            max_iterations: 100,
        }
    }
}

impl SolverConfig {
    /// Load a JSON config file; absent fields keep their defaults
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_rate_bounds(mut self, min_rate_pct: f64, max_rate_pct: f64) -> Self {
        self.min_rate_pct = min_rate_pct;
        self.max_rate_pct = max_rate_pct;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_initial_steps(mut self, steps: usize) -> Self {
        self.initial_steps = steps;
        self
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = max_samples;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Initial bracket as decimal rates
    pub fn bracket(&self) -> (f64, f64) {
        (self.min_rate_pct * 0.01, self.max_rate_pct * 0.01)
    }

    /// Check internal consistency before solving
    pub fn validate(&self) -> Result<()> {
        if !self.min_rate_pct.is_finite() || !self.max_rate_pct.is_finite() {
            return Err(XirrError::invalid_config("rate bounds must be finite"));
        }
        if self.min_rate_pct >= self.max_rate_pct {
            return Err(XirrError::invalid_config(format!(
                "min_rate_pct ({}) must be below max_rate_pct ({})",
                self.min_rate_pct, self.max_rate_pct
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(XirrError::invalid_config("tolerance must be positive and finite"));
        }
        if self.initial_steps == 0 {
            return Err(XirrError::invalid_config("initial_steps must be at least 1"));
        }
        if self.max_samples < self.initial_steps {
            return Err(XirrError::invalid_config(format!(
                "max_samples ({}) must be at least initial_steps ({})",
                self.max_samples, self.initial_steps
            )));
        }
        if self.max_iterations == 0 {
            return Err(XirrError::invalid_config("max_iterations must be at least 1"));
        }
        Ok(())
    }
}

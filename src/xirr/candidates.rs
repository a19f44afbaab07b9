//! Bounded best-of-two record of (rate, residual) observations

use serde::Serialize;

const CAPACITY: usize = 2;

/// A rate and the residual evaluated at it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Candidate {
    pub rate: f64,
    pub residual: f64,
}

impl Candidate {
    /// Placeholder returned by an empty tracker
    pub const NONE: Candidate = Candidate {
        rate: f64::NAN,
        residual: f64::INFINITY,
    };

    pub fn abs_residual(&self) -> f64 {
        self.residual.abs()
    }
}

/// Holds at most two candidates, ordered by ascending `|residual|`
///
/// Non-finite observations are dropped on insert, so the best residual never
/// increases across a solve.
#[derive(Debug, Clone, Default)]
pub struct CandidateTracker {
    entries: Vec<Candidate>,
}

impl CandidateTracker {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(CAPACITY + 1),
        }
    }

    /// Record an observation; ignored unless both values are finite
    pub fn add(&mut self, rate: f64, residual: f64) {
        if !rate.is_finite() || !residual.is_finite() {
            return;
        }

        self.entries.push(Candidate { rate, residual });
        // Stable: on equal residuals the earlier observation stays ahead
        self.entries
            .sort_by(|a, b| a.abs_residual().total_cmp(&b.abs_residual()));
        self.entries.truncate(CAPACITY);
    }

    /// Smallest `|residual|` seen, or [`Candidate::NONE`]
    pub fn best(&self) -> Candidate {
        self.entries.first().copied().unwrap_or(Candidate::NONE)
    }

    /// Runner-up, or the best entry when only one is held
    pub fn worst(&self) -> Candidate {
        self.entries.last().copied().unwrap_or(Candidate::NONE)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Progress hooks for the bracket-refinement solver
//!
//! The solver reports each pass through a [`SolverObserver`]; it never logs
//! on its own. [`LogObserver`] forwards the events to the `log` facade.

use super::candidates::Candidate;
use super::solver::{Bracket, Termination};

/// Receives solver progress events. Every hook defaults to a no-op.
pub trait SolverObserver {
    /// A sampling pass is about to start over `bracket` with `steps` grid steps
    fn on_pass_start(&mut self, _iteration: usize, _bracket: Bracket, _steps: usize) {}

    /// One grid point was evaluated (the residual may be non-finite)
    fn on_sample(&mut self, _rate: f64, _residual: f64) {}

    /// A pass finished; `best` and `worst` are the tracked candidates
    fn on_pass_end(&mut self, _iteration: usize, _best: Candidate, _worst: Candidate) {}

    /// The pass did not improve the best residual, so the grid was refined
    fn on_steps_increased(&mut self, _steps: usize) {}

    /// The solve reached a terminal state
    fn on_terminate(&mut self, _termination: Termination, _rate: f64) {}
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl SolverObserver for NoopObserver {}

/// Writes solver progress as `debug`/`trace` log records
#[derive(Debug, Clone, Default)]
pub struct LogObserver {
    label: String,
}

impl LogObserver {
    /// `label` prefixes every record, e.g. the series id
    pub fn new<S: Into<String>>(label: S) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl SolverObserver for LogObserver {
    fn on_pass_start(&mut self, iteration: usize, bracket: Bracket, steps: usize) {
        log::debug!(
            "[{}] pass {}: low {:.6} high {:.6} span {:.6} steps {} step {:.8}",
            self.label,
            iteration,
            bracket.low,
            bracket.high,
            bracket.span(),
            steps,
            bracket.span() / steps as f64,
        );
    }

    fn on_sample(&mut self, rate: f64, residual: f64) {
        log::trace!("[{}] rate {} residual {}", self.label, rate, residual);
    }

    fn on_pass_end(&mut self, iteration: usize, best: Candidate, worst: Candidate) {
        log::debug!(
            "[{}] pass {} best rate {} (residual {}), runner-up rate {} (residual {})",
            self.label,
            iteration,
            best.rate,
            best.residual,
            worst.rate,
            worst.residual,
        );
    }

    fn on_steps_increased(&mut self, steps: usize) {
        log::debug!("[{}] no improvement, steps increased to {}", self.label, steps);
    }

    fn on_terminate(&mut self, termination: Termination, rate: f64) {
        log::debug!("[{}] {:?} at rate {}", self.label, termination, rate);
    }
}

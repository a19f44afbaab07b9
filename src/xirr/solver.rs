//! Grid-sampling bracket-refinement solver for XIRR
//!
//! Each outer pass samples the residual on an evenly spaced grid across the
//! current bracket, keeps the two smallest residuals seen so far, and pulls
//! the bracket ends halfway toward them. A pass that fails to improve the
//! best residual makes the next grid ten times denser.

use rayon::prelude::*;
use serde::Serialize;

use super::candidates::CandidateTracker;
use super::config::SolverConfig;
use super::observer::{NoopObserver, SolverObserver};
use super::residual::ResidualEvaluator;
use crate::cashflow::{CashFlow, CashFlowSeries};
use crate::error::{Result, XirrError};

/// Growth factor applied to the grid when a pass brings no improvement
const STEP_GROWTH: usize = 10;

/// Fraction of the tolerance used to nudge bracket ends and detect stagnation
const NUDGE_FRACTION: f64 = 0.01;

/// Current search interval, in decimal rates
///
/// Ends are not reordered: once retained candidates fall outside the
/// interval the update can cross them, which shows up as a tiny or negative
/// span and ends the solve as an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bracket {
    pub low: f64,
    pub high: f64,
}

impl Bracket {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn span(&self) -> f64 {
        self.high - self.low
    }

    pub fn midpoint(&self) -> f64 {
        (self.high + self.low) * 0.5
    }

    /// `i`-th of `steps + 1` evenly spaced grid points, both ends included
    fn grid_point(&self, i: usize, steps: usize) -> f64 {
        self.low + i as f64 * (self.span() / steps as f64)
    }
}

/// How a successful solve ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// Best residual fell below the tolerance
    Converged,
    /// Bracket collapsed below the tolerance; the rate is its midpoint
    ///
    /// The span may also go negative when the bracket ends cross. With
    /// same-sign flows (e.g. only outflows) there is no root, and the
    /// midpoint is an arbitrary rate such as 918.75%, not a return.
    Estimated,
    /// Best rate stopped moving between passes
    Stagnated,
}

/// Result of a successful solve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XirrSolution {
    /// Annual rate as a decimal, unrounded
    pub rate: f64,
    /// Annual rate in percent, rounded to two decimals
    pub rate_pct: f64,
    pub termination: Termination,
    /// Outer passes performed
    pub iterations: usize,
    /// Residual evaluated at `rate`
    pub residual: f64,
}

impl XirrSolution {
    pub fn is_converged(&self) -> bool {
        self.termination == Termination::Converged
    }
}

/// Outcome for one named series of a batch
#[derive(Debug)]
pub struct SeriesResult {
    pub id: String,
    pub result: Result<XirrSolution>,
}

/// Round a decimal rate to a percentage with two decimals (12.0 = 12%)
pub fn round_rate_pct(rate: f64) -> f64 {
    (rate * 100.0 * 100.0).round() / 100.0
}

/// XIRR solver. Stateless between calls; every solve owns its own bracket
/// and candidate tracker.
#[derive(Debug, Clone, Default)]
pub struct XirrSolver {
    config: SolverConfig,
}

impl XirrSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve without progress reporting
    pub fn solve(&self, flows: &[CashFlow]) -> Result<XirrSolution> {
        self.solve_with_observer(flows, &mut NoopObserver)
    }

    /// Solve, reporting each pass to `observer`
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for an inconsistent configuration, `EmptyCashFlows`
    /// for an empty series, and `DidNotConverge` once `max_iterations`
    /// passes end without a stopping condition.
    pub fn solve_with_observer<O: SolverObserver>(
        &self,
        flows: &[CashFlow],
        observer: &mut O,
    ) -> Result<XirrSolution> {
        self.config.validate()?;
        if flows.is_empty() {
            return Err(XirrError::EmptyCashFlows);
        }

        let tolerance = self.config.tolerance;
        let nudge = tolerance * NUDGE_FRACTION;
        let evaluator = ResidualEvaluator::new(flows, tolerance);

        let (low, high) = self.config.bracket();
        let mut bracket = Bracket::new(low, high);
        let mut steps = self.config.initial_steps;
        let mut tracker = CandidateTracker::new();

        for iteration in 1..=self.config.max_iterations {
            let previous = tracker.best();
            observer.on_pass_start(iteration, bracket, steps);

            for i in 0..=steps {
                let rate = bracket.grid_point(i, steps);
                let residual = evaluator.evaluate(rate);
                observer.on_sample(rate, residual);
                tracker.add(rate, residual);

                if tracker.best().residual == 0.0 {
                    break;
                }
            }

            let best = tracker.best();
            observer.on_pass_end(iteration, best, tracker.worst());

            if best.abs_residual() < tolerance {
                return Ok(finish(Termination::Converged, best.rate, iteration, &evaluator, observer));
            }

            if bracket.span() < tolerance {
                let estimate = bracket.midpoint();
                return Ok(finish(Termination::Estimated, estimate, iteration, &evaluator, observer));
            }

            if best.abs_residual() == previous.abs_residual() {
                steps = steps.saturating_mul(STEP_GROWTH).min(self.config.max_samples);
                observer.on_steps_increased(steps);
            } else if (best.rate - previous.rate).abs() < nudge {
                return Ok(finish(Termination::Stagnated, best.rate, iteration, &evaluator, observer));
            }

            // Nothing finite seen yet: keep the bracket, only the grid changes
            if tracker.is_empty() {
                continue;
            }

            bracket = Bracket::new(
                (bracket.low + best.rate) / 2.0 - nudge,
                (bracket.high + tracker.worst().rate) / 2.0 + nudge,
            );
        }

        let best = tracker.best();
        Err(XirrError::DidNotConverge {
            iterations: self.config.max_iterations,
            best_rate: best.rate,
            best_residual: best.residual,
        })
    }

    /// Solve independent series in parallel, preserving input order
    pub fn solve_batch(&self, series: &[CashFlowSeries]) -> Vec<SeriesResult> {
        self.solve_batch_with(series, |_| NoopObserver)
    }

    /// Solve independent series in parallel with one observer per series
    pub fn solve_batch_with<O, F>(&self, series: &[CashFlowSeries], make_observer: F) -> Vec<SeriesResult>
    where
        O: SolverObserver,
        F: Fn(&CashFlowSeries) -> O + Sync,
    {
        series
            .par_iter()
            .map(|s| {
                let mut observer = make_observer(s);
                SeriesResult {
                    id: s.id.clone(),
                    result: self.solve_with_observer(&s.flows, &mut observer),
                }
            })
            .collect()
    }
}

fn finish<O: SolverObserver>(
    termination: Termination,
    rate: f64,
    iterations: usize,
    evaluator: &ResidualEvaluator,
    observer: &mut O,
) -> XirrSolution {
    observer.on_terminate(termination, rate);
    XirrSolution {
        rate,
        rate_pct: round_rate_pct(rate),
        termination,
        iterations,
        residual: evaluator.evaluate(rate),
    }
}

/// XIRR of `flows` in percent (rounded to two decimals) with default settings
pub fn xirr(flows: &[CashFlow]) -> Result<f64> {
    XirrSolver::default().solve(flows).map(|s| s.rate_pct)
}

//! XIRR: internal rate of return for irregularly dated cash flows
//!
//! Components, leaves first:
//! - year fractions on an actual/365 basis (`year_fraction`)
//! - the discounted residual at a candidate rate (`residual`)
//! - the best-of-two candidate tracker (`candidates`)
//! - the grid-sampling bracket-refinement solver (`solver`)

mod candidates;
mod config;
mod observer;
mod residual;
mod solver;
mod year_fraction;

pub use candidates::{Candidate, CandidateTracker};
pub use config::SolverConfig;
pub use observer::{LogObserver, NoopObserver, SolverObserver};
pub use residual::{xnpv, ResidualEvaluator};
pub use solver::{round_rate_pct, xirr, Bracket, SeriesResult, Termination, XirrSolution, XirrSolver};
pub use year_fraction::{year_fractions, DAYS_PER_YEAR};

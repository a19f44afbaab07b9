//! Cashflow XIRR - annualized internal rate of return for irregular cash flows
//!
//! This library provides:
//! - Dated cash flow types and CSV loading
//! - Actual/365 year fractions and net present value (XNPV)
//! - A grid-sampling bracket-refinement XIRR solver with explicit
//!   configuration, tagged outcomes and pluggable progress observers
//! - Parallel solving of many independent series
//!
//! ```
//! use cashflow_xirr::{xirr, CashFlow};
//! use chrono::NaiveDate;
//!
//! let flows = vec![
//!     CashFlow::new(NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(), -100.0),
//!     CashFlow::new(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), 112.0),
//! ];
//! assert_eq!(xirr(&flows).unwrap(), 12.0);
//! ```

pub mod cashflow;
pub mod error;
pub mod xirr;

// Re-export commonly used types
pub use cashflow::{CashFlow, CashFlowSeries};
pub use error::{Result, XirrError};
pub use xirr::{xirr, xnpv, SolverConfig, Termination, XirrSolution, XirrSolver};

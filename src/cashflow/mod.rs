//! Cash flow data structures and CSV loading

mod data;
pub mod loader;

pub use data::{CashFlow, CashFlowSeries, DEFAULT_SERIES_ID};
pub use loader::{load_cashflows, load_cashflows_from_reader, load_series, load_series_from_reader};

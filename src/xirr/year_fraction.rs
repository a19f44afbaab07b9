//! Day-count year fractions relative to the first cash flow

use crate::cashflow::CashFlow;

/// Actual/365 fixed day-count basis
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Year offset of every flow from the first flow's date
///
/// Dates are not required to be sorted; a flow dated before the epoch gets
/// a negative fraction.
pub fn year_fractions(flows: &[CashFlow]) -> Vec<f64> {
    let Some(epoch) = flows.first().map(|cf| cf.date) else {
        return Vec::new();
    };

    flows
        .iter()
        .map(|cf| cf.days_since(epoch) as f64 / DAYS_PER_YEAR)
        .collect()
}

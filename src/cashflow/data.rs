//! Cash flow data structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Series name used when a CSV row carries no `Series` value
pub const DEFAULT_SERIES_ID: &str = "default";

/// A single dated cash amount
///
/// Negative amounts are outflows (investments), positive amounts are inflows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    /// Date the amount changes hands
    pub date: NaiveDate,

    /// Signed amount
    pub amount: f64,
}

impl CashFlow {
    pub fn new(date: NaiveDate, amount: f64) -> Self {
        Self { date, amount }
    }

    /// Whole days elapsed from `epoch` to this flow (negative if earlier)
    pub fn days_since(&self, epoch: NaiveDate) -> i64 {
        (self.date - epoch).num_days()
    }
}

/// A named, ordered sequence of cash flows solved as one unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSeries {
    /// Identifier taken from the `Series` column
    pub id: String,

    /// Flows in input order; the first one is the epoch
    pub flows: Vec<CashFlow>,
}

impl CashFlowSeries {
    pub fn new<S: Into<String>>(id: S, flows: Vec<CashFlow>) -> Self {
        Self {
            id: id.into(),
            flows,
        }
    }

    /// Date of the first flow, which anchors every year fraction
    pub fn epoch(&self) -> Option<NaiveDate> {
        self.flows.first().map(|cf| cf.date)
    }

    /// Sum of all amounts, undiscounted
    pub fn net_amount(&self) -> f64 {
        self.flows.iter().map(|cf| cf.amount).sum()
    }

    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

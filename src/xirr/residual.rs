//! Net present value of a dated series at a candidate rate

use super::year_fraction::year_fractions;
use crate::cashflow::CashFlow;

/// Discounted sum of a cash flow series, evaluated repeatedly by the solver
///
/// Year fractions are derived once at construction. Amounts of exactly zero
/// are replaced by `zero_amount`; otherwise a series with a zero flow lets the
/// solver chase the undiscounted net amount instead of the rate.
#[derive(Debug, Clone)]
pub struct ResidualEvaluator {
    years: Vec<f64>,
    amounts: Vec<f64>,
}

impl ResidualEvaluator {
    pub fn new(flows: &[CashFlow], zero_amount: f64) -> Self {
        let amounts = flows
            .iter()
            .map(|cf| if cf.amount == 0.0 { zero_amount } else { cf.amount })
            .collect();

        Self {
            years: year_fractions(flows),
            amounts,
        }
    }

    /// `Σ amount_i / (1 + rate)^year_i`
    ///
    /// For `1 + rate <= 0` a fractional exponent gives NaN and a zero base
    /// gives ±∞. Both are returned as-is for the caller to filter.
    pub fn evaluate(&self, rate: f64) -> f64 {
        discounted_sum(&self.years, &self.amounts, rate)
    }

    pub fn year_fractions(&self) -> &[f64] {
        &self.years
    }
}

fn discounted_sum(years: &[f64], amounts: &[f64], rate: f64) -> f64 {
    let base = 1.0 + rate;
    years
        .iter()
        .zip(amounts)
        .map(|(&t, &amount)| amount / base.powf(t))
        .sum()
}

/// Net present value of `flows` at annual `rate` (decimal), on the same
/// actual/365 basis the solver uses. Zero amounts are left at zero.
pub fn xnpv(flows: &[CashFlow], rate: f64) -> f64 {
    let amounts: Vec<f64> = flows.iter().map(|cf| cf.amount).collect();
    discounted_sum(&year_fractions(flows), &amounts, rate)
}

//! Financial appraisal of a retrofit measure: NPV, IRR, payback.
//!
//! All functions work on the same expanded cash-flow series: the
//! investment as a negative flow in year 0, then one escalated saving
//! per year over the horizon. Quantities that may not exist (IRR with
//! no sign change, payback never reached) are `Option`, not errors.

use serde::{Deserialize, Serialize};

/// IRR bisection search interval: -99 % to +1000 % per year.
const IRR_BRACKET: (f64, f64) = (-0.99, 10.0);
const IRR_ITERATIONS: usize = 200;

/// Inputs to the cash-flow expansion for one measure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CashFlowSpec {
    /// Up-front investment in EUR (positive number).
    pub investment_eur: f64,
    /// First-year energy cost saving in EUR.
    pub annual_saving_eur: f64,
    /// Annual energy-price escalation as a fraction (0.02 = 2 %/a).
    pub price_escalation: f64,
    /// Evaluation horizon in years (typically the measure lifetime).
    pub horizon_years: u32,
}

impl CashFlowSpec {
    /// Expands into the year-by-year series: index 0 is the investment
    /// (negative), index t >= 1 is the saving escalated over t - 1 years.
    pub fn cash_flows(&self) -> Vec<f64> {
        let mut flows = Vec::with_capacity(self.horizon_years as usize + 1);
        flows.push(-self.investment_eur);
        for year in 1..=self.horizon_years {
            let escalated =
                self.annual_saving_eur * (1.0 + self.price_escalation).powi(year as i32 - 1);
            flows.push(escalated);
        }
        flows
    }
}

/// Complete financial appraisal of one measure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancialResult {
    /// Net present value in EUR at the given discount rate.
    pub npv_eur: f64,
    /// Internal rate of return as a fraction; `None` when the cash flows
    /// never change sign in the search bracket.
    pub irr: Option<f64>,
    /// First year cumulative undiscounted flows turn non-negative.
    pub simple_payback_years: Option<u32>,
    /// First year cumulative discounted flows turn non-negative.
    pub discounted_payback_years: Option<u32>,
}

/// Net present value of a cash-flow series (index = year).
pub fn npv(cash_flows: &[f64], discount_rate: f64) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .map(|(year, flow)| flow / (1.0 + discount_rate).powi(year as i32))
        .sum()
}

/// Internal rate of return by bisection over [-0.99, 10.0].
///
/// Returns `None` when the NPV has the same sign at both bracket ends —
/// all-positive or all-negative series have no IRR, and a rate outside
/// the bracket is economically meaningless anyway.
pub fn irr(cash_flows: &[f64]) -> Option<f64> {
    let (mut lo, mut hi) = IRR_BRACKET;
    let npv_lo = npv(cash_flows, lo);
    let npv_hi = npv(cash_flows, hi);
    if npv_lo == 0.0 {
        return Some(lo);
    }
    if npv_hi == 0.0 {
        return Some(hi);
    }
    if npv_lo.signum() == npv_hi.signum() {
        return None;
    }
    for _ in 0..IRR_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        let npv_mid = npv(cash_flows, mid);
        if npv_mid == 0.0 {
            return Some(mid);
        }
        if npv_mid.signum() == npv_lo.signum() {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    Some(0.5 * (lo + hi))
}

/// First year in which the cumulative undiscounted flows reach zero.
pub fn simple_payback(cash_flows: &[f64]) -> Option<u32> {
    cumulative_payback(cash_flows, 0.0)
}

/// First year in which the cumulative discounted flows reach zero.
pub fn discounted_payback(cash_flows: &[f64], discount_rate: f64) -> Option<u32> {
    cumulative_payback(cash_flows, discount_rate)
}

fn cumulative_payback(cash_flows: &[f64], discount_rate: f64) -> Option<u32> {
    let mut cumulative = 0.0;
    for (year, flow) in cash_flows.iter().enumerate() {
        cumulative += flow / (1.0 + discount_rate).powi(year as i32);
        if cumulative >= 0.0 {
            return Some(year as u32);
        }
    }
    None
}

/// Runs the full appraisal for one measure.
pub fn appraise(spec: &CashFlowSpec, discount_rate: f64) -> FinancialResult {
    let flows = spec.cash_flows();
    FinancialResult {
        npv_eur: npv(&flows, discount_rate),
        irr: irr(&flows),
        simple_payback_years: simple_payback(&flows),
        discounted_payback_years: discounted_payback(&flows, discount_rate),
    }
}

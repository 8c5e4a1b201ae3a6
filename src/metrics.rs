//! Aggregate portfolio metrics

use crate::api::Holding;

/// Portfolio-wide totals derived from the holdings list.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub total_change: f64,
    pub total_change_percent: f64,
}

/// Reduce holdings into total value, total change, and percent return.
///
/// The percent denominator is the aggregate cost basis
/// (`total_value - total_change`). Policy: a zero cost basis reports
/// 0.0 percent rather than NaN.
pub fn summarize(holdings: &[Holding]) -> PortfolioSummary {
    let total_value: f64 = holdings.iter().map(Holding::market_value).sum();
    let total_change: f64 = holdings.iter().map(Holding::change).sum();
    let cost_basis = total_value - total_change;
    let total_change_percent = if cost_basis.abs() < f64::EPSILON {
        0.0
    } else {
        total_change / cost_basis * 100.0
    };
    PortfolioSummary {
        total_value,
        total_change,
        total_change_percent,
    }
}

//! Statistics for trader track records
//!
//! Pure functions with no knowledge of markets or analyzers:
//! - binomial confidence intervals (normal approximation and Wilson score)
//! - significance tests against a coin-flip baseline
//! - risk-adjusted return metrics (Sharpe, Sortino, drawdown, information ratio)

mod interval;
mod returns;
mod significance;

pub use interval::{BinomialIntervals, ConfidenceInterval};
pub use returns::{
    information_ratio, max_drawdown, mean, risk_adjusted_returns, sample_std_dev, sharpe_ratio,
    sortino_ratio, DrawdownCalculator, RiskAdjustedReturns,
};
pub use significance::{binomial_p_value, proportion_z_test, SignificanceCriteria, ZTest};

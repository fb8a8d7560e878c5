//! Risk-adjusted return metrics

use serde::{Deserialize, Serialize};

/// Arithmetic mean, `None` for an empty series
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator), `None` below two values
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Sharpe ratio of a return series against a per-period risk-free rate
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> Option<f64> {
    let mean = mean(returns)?;
    let std_dev = sample_std_dev(returns)?;

    if std_dev == 0.0 {
        return None;
    }

    Some((mean - risk_free_rate) / std_dev)
}

/// Sortino ratio: like Sharpe but only penalises downside volatility
pub fn sortino_ratio(returns: &[f64], risk_free_rate: f64) -> Option<f64> {
    let mean = mean(returns)?;
    let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    let downside_dev = sample_std_dev(&downside)?;

    if downside_dev == 0.0 {
        return None;
    }

    Some((mean - risk_free_rate) / downside_dev)
}

/// Information ratio of portfolio returns against a benchmark series
pub fn information_ratio(portfolio: &[f64], benchmark: &[f64]) -> Option<f64> {
    if portfolio.len() != benchmark.len() {
        return None;
    }

    let active: Vec<f64> = portfolio.iter().zip(benchmark).map(|(p, b)| p - b).collect();
    let mean_active = mean(&active)?;
    let tracking_error = sample_std_dev(&active)?;

    if tracking_error == 0.0 {
        return None;
    }

    Some(mean_active / tracking_error)
}

/// Maximum peak-to-trough decline of the compounded return series (0.0 to 1.0)
pub fn max_drawdown(returns: &[f64]) -> f64 {
    let mut calc = DrawdownCalculator::new();
    let mut cumulative = 1.0;

    calc.update(cumulative);
    for r in returns {
        cumulative *= 1.0 + r;
        calc.update(cumulative);
    }

    calc.max_drawdown()
}

/// Running drawdown over a value series
#[derive(Debug, Clone)]
pub struct DrawdownCalculator {
    peak: f64,
    max_drawdown: f64,
    current_value: f64,
}

impl DrawdownCalculator {
    pub fn new() -> Self {
        Self {
            peak: 0.0,
            max_drawdown: 0.0,
            current_value: 0.0,
        }
    }

    /// Update with a new value
    pub fn update(&mut self, value: f64) {
        self.current_value = value;

        if value > self.peak {
            self.peak = value;
        }

        if self.peak > 0.0 {
            let drawdown = (self.peak - value) / self.peak;
            if drawdown > self.max_drawdown {
                self.max_drawdown = drawdown;
            }
        }
    }

    pub fn max_drawdown(&self) -> f64 {
        self.max_drawdown
    }

    pub fn current_drawdown(&self) -> f64 {
        if self.peak > 0.0 {
            (self.peak - self.current_value) / self.peak
        } else {
            0.0
        }
    }
}

impl Default for DrawdownCalculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of a trader's return series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAdjustedReturns {
    pub observations: usize,
    pub mean_return: Option<f64>,
    pub volatility: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub sortino_ratio: Option<f64>,
    pub max_drawdown: f64,
}

pub fn risk_adjusted_returns(returns: &[f64], risk_free_rate: f64) -> RiskAdjustedReturns {
    RiskAdjustedReturns {
        observations: returns.len(),
        mean_return: mean(returns),
        volatility: sample_std_dev(returns),
        sharpe_ratio: sharpe_ratio(returns, risk_free_rate),
        sortino_ratio: sortino_ratio(returns, risk_free_rate),
        max_drawdown: max_drawdown(returns),
    }
}

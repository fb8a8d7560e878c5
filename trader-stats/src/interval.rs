//! Binomial proportion confidence intervals

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

/// A closed interval within [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

impl ConfidenceInterval {
    /// Maximal uncertainty
    pub fn full() -> Self {
        Self {
            lower: 0.0,
            upper: 1.0,
        }
    }

    fn clamped(lower: f64, upper: f64) -> Self {
        Self {
            lower: lower.clamp(0.0, 1.0),
            upper: upper.clamp(0.0, 1.0),
        }
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Interval calculator for observed success rates
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BinomialIntervals {
    /// Two-sided critical value (1.96 for 95%)
    pub z_score: f64,
    /// Below this sample size the interval collapses to [0, 1]
    pub min_sample: u32,
}

impl Default for BinomialIntervals {
    fn default() -> Self {
        Self {
            z_score: 1.96,
            min_sample: 5,
        }
    }
}

impl BinomialIntervals {
    pub fn new(z_score: f64, min_sample: u32) -> Self {
        Self { z_score, min_sample }
    }

    /// Build a calculator for a two-sided confidence level such as 0.95.
    ///
    /// Returns `None` when the level is outside (0, 1).
    pub fn for_confidence_level(level: f64, min_sample: u32) -> Option<Self> {
        if !(level > 0.0 && level < 1.0) {
            return None;
        }
        let standard = Normal::new(0.0, 1.0).ok()?;
        let z_score = standard.inverse_cdf((1.0 + level) / 2.0);
        Some(Self::new(z_score, min_sample))
    }

    /// Normal (Wald) approximation: p ± z·sqrt(p(1-p)/n), clamped to [0, 1]
    pub fn normal_approximation(&self, success_rate: f64, sample_size: u32) -> ConfidenceInterval {
        if sample_size < self.min_sample || sample_size == 0 {
            return ConfidenceInterval::full();
        }

        let p = success_rate.clamp(0.0, 1.0);
        let n = sample_size as f64;
        let margin = self.z_score * (p * (1.0 - p) / n).sqrt();

        ConfidenceInterval::clamped(p - margin, p + margin)
    }

    /// Wilson score interval, better behaved than the normal approximation
    /// for small samples and rates near 0 or 1
    pub fn wilson_score(&self, successes: u32, total: u32) -> ConfidenceInterval {
        if total == 0 {
            return ConfidenceInterval::full();
        }

        let n = total as f64;
        let p = (successes.min(total) as f64) / n;
        let z2 = self.z_score * self.z_score;

        let denominator = 1.0 + z2 / n;
        let centre = (p + z2 / (2.0 * n)) / denominator;
        let margin = (self.z_score / denominator) * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt();

        ConfidenceInterval::clamped(centre - margin, centre + margin)
    }
}

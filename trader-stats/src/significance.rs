//! Significance tests for success rates

use crate::interval::ConfidenceInterval;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Binomial, ContinuousCDF, DiscreteCDF, Normal};

/// Policy for calling a track record statistically significant
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignificanceCriteria {
    /// Minimum resolved markets
    pub min_sample: u32,
    /// The interval's lower bound must exceed this
    pub lower_bound: f64,
}

impl Default for SignificanceCriteria {
    fn default() -> Self {
        Self {
            min_sample: 10,
            lower_bound: 0.5,
        }
    }
}

impl SignificanceCriteria {
    pub fn is_significant(&self, sample_size: u32, interval: &ConfidenceInterval) -> bool {
        sample_size >= self.min_sample && interval.lower > self.lower_bound
    }
}

/// One-sided exact binomial test: P(X >= wins | n, p0).
///
/// Returns 1.0 (never significant) for degenerate inputs.
pub fn binomial_p_value(wins: u32, total: u32, null_probability: f64) -> f64 {
    if total == 0 || wins == 0 {
        return 1.0;
    }
    if wins > total {
        return 0.0;
    }

    match Binomial::new(null_probability, total as u64) {
        // sf(k) = P(X > k), so P(X >= wins) = sf(wins - 1)
        Ok(binomial) => binomial.sf((wins - 1) as u64).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

/// Result of a two-sided one-proportion z-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZTest {
    pub z_score: f64,
    pub p_value: f64,
}

impl ZTest {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Two-sided z-test of an observed rate against `null_probability`
pub fn proportion_z_test(success_rate: f64, sample_size: u32, null_probability: f64) -> ZTest {
    let n = sample_size as f64;
    let se = (null_probability * (1.0 - null_probability) / n).sqrt();

    if sample_size == 0 || !se.is_finite() || se == 0.0 {
        return ZTest {
            z_score: 0.0,
            p_value: 1.0,
        };
    }

    let z_score = (success_rate - null_probability) / se;
    let p_value = match Normal::new(0.0, 1.0) {
        Ok(standard) => 2.0 * standard.sf(z_score.abs()),
        Err(_) => 1.0,
    };

    ZTest {
        z_score,
        p_value: p_value.clamp(0.0, 1.0),
    }
}

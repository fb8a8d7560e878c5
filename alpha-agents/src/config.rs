//! Alpha detection configuration
//!
//! Every option has a default. Values can come from a TOML file and be
//! overridden by `ALPHA_`-prefixed environment variables.

use crate::portfolio::PortfolioAnalyzerConfig;
use crate::success_rate::SuccessRateAnalyzerConfig;
use anyhow::Context;
use common::{AlphaError, AlphaResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use trader_stats::{BinomialIntervals, SignificanceCriteria};

/// Top-level configuration, validated once at coordinator construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlphaConfig {
    /// Weighted vote share needed for a non-abstain consensus
    #[serde(default = "default_vote_threshold")]
    pub agent_vote_threshold: f64,

    /// Allocation ratio that makes a trader high-conviction
    #[serde(default = "default_min_portfolio_ratio")]
    pub min_portfolio_ratio: f64,

    /// Success rate that makes a trader successful
    #[serde(default = "default_min_success_rate")]
    pub min_success_rate: f64,

    /// Resolved markets needed before a track record is considered
    #[serde(default = "default_min_trade_history")]
    pub min_trade_history: u32,

    /// Portfolio floor for the trader pre-screen (USD)
    #[serde(default = "default_min_portfolio_value")]
    pub min_portfolio_value: f64,

    #[serde(default = "default_portfolio_weight")]
    pub portfolio_weight: f64,

    #[serde(default = "default_success_rate_weight")]
    pub success_rate_weight: f64,

    /// Deadline for one decision cycle
    #[serde(default = "default_analysis_timeout_ms")]
    pub analysis_timeout_ms: u64,

    /// Two-sided critical value for success-rate intervals
    #[serde(default = "default_z_score")]
    pub z_score: f64,

    /// Below this many resolved markets an interval collapses to [0, 1]
    #[serde(default = "default_min_interval_sample")]
    pub min_interval_sample: u32,

    #[serde(default = "default_significance_min_sample")]
    pub significance_min_sample: u32,

    #[serde(default = "default_significance_lower_bound")]
    pub significance_lower_bound: f64,

    /// Conviction ratio above which three high-conviction traders vote alpha
    #[serde(default = "default_conviction_ratio_threshold")]
    pub conviction_ratio_threshold: f64,

    /// Average success rate above which two successful traders vote alpha
    #[serde(default = "default_strong_average_success_rate")]
    pub strong_average_success_rate: f64,

    /// Confidence above which a single qualifying trader votes alpha
    #[serde(default = "default_single_trader_confidence_bar")]
    pub single_trader_confidence_bar: f64,

    /// Per-position risk-free return used for Sharpe/Sortino evidence
    #[serde(default)]
    pub risk_free_rate: f64,

    /// Liquidity below this is flagged (USD)
    #[serde(default = "default_low_liquidity_threshold")]
    pub low_liquidity_threshold: f64,

    /// Consensus confidence below this is flagged
    #[serde(default = "default_low_confidence_threshold")]
    pub low_confidence_threshold: f64,

    /// Lowercase market category -> risk tag
    #[serde(default = "default_category_risk")]
    pub category_risk: BTreeMap<String, String>,
}

impl Default for AlphaConfig {
    fn default() -> Self {
        Self {
            agent_vote_threshold: default_vote_threshold(),
            min_portfolio_ratio: default_min_portfolio_ratio(),
            min_success_rate: default_min_success_rate(),
            min_trade_history: default_min_trade_history(),
            min_portfolio_value: default_min_portfolio_value(),
            portfolio_weight: default_portfolio_weight(),
            success_rate_weight: default_success_rate_weight(),
            analysis_timeout_ms: default_analysis_timeout_ms(),
            z_score: default_z_score(),
            min_interval_sample: default_min_interval_sample(),
            significance_min_sample: default_significance_min_sample(),
            significance_lower_bound: default_significance_lower_bound(),
            conviction_ratio_threshold: default_conviction_ratio_threshold(),
            strong_average_success_rate: default_strong_average_success_rate(),
            single_trader_confidence_bar: default_single_trader_confidence_bar(),
            risk_free_rate: 0.0,
            low_liquidity_threshold: default_low_liquidity_threshold(),
            low_confidence_threshold: default_low_confidence_threshold(),
            category_risk: default_category_risk(),
        }
    }
}

fn default_vote_threshold() -> f64 {
    0.6
}

fn default_min_portfolio_ratio() -> f64 {
    0.1
}

fn default_min_success_rate() -> f64 {
    0.7
}

fn default_min_trade_history() -> u32 {
    10
}

fn default_min_portfolio_value() -> f64 {
    1_000.0
}

fn default_portfolio_weight() -> f64 {
    1.2
}

fn default_success_rate_weight() -> f64 {
    1.3
}

fn default_analysis_timeout_ms() -> u64 {
    5_000
}

fn default_z_score() -> f64 {
    1.96
}

fn default_min_interval_sample() -> u32 {
    5
}

fn default_significance_min_sample() -> u32 {
    10
}

fn default_significance_lower_bound() -> f64 {
    0.5
}

fn default_conviction_ratio_threshold() -> f64 {
    0.15
}

fn default_strong_average_success_rate() -> f64 {
    0.75
}

fn default_single_trader_confidence_bar() -> f64 {
    0.6
}

fn default_low_liquidity_threshold() -> f64 {
    100_000.0
}

fn default_low_confidence_threshold() -> f64 {
    0.7
}

fn default_category_risk() -> BTreeMap<String, String> {
    let mut category_risk = BTreeMap::new();
    category_risk.insert("politics".to_string(), "politicized_market".to_string());
    category_risk.insert("elections".to_string(), "politicized_market".to_string());
    category_risk.insert("crypto".to_string(), "volatile_underlying".to_string());
    category_risk.insert("sports".to_string(), "event_outcome_variance".to_string());
    category_risk
}

fn unit_interval(name: &str, value: f64) -> AlphaResult<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(AlphaError::Configuration(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )))
    }
}

fn non_negative(name: &str, value: f64) -> AlphaResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(AlphaError::Configuration(format!(
            "{} must be a non-negative number, got {}",
            name, value
        )))
    }
}

impl AlphaConfig {
    /// Load from an optional file, then apply `ALPHA_*` environment overrides
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix("ALPHA").try_parsing(true))
            .build()
            .context("Failed to assemble configuration sources")?;

        let config: AlphaConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds and weights that would make every cycle meaningless
    pub fn validate(&self) -> AlphaResult<()> {
        if !(self.agent_vote_threshold > 0.0 && self.agent_vote_threshold <= 1.0) {
            return Err(AlphaError::Configuration(format!(
                "agent_vote_threshold must be within (0, 1], got {}",
                self.agent_vote_threshold
            )));
        }

        unit_interval("min_portfolio_ratio", self.min_portfolio_ratio)?;
        unit_interval("min_success_rate", self.min_success_rate)?;
        unit_interval("significance_lower_bound", self.significance_lower_bound)?;
        unit_interval("conviction_ratio_threshold", self.conviction_ratio_threshold)?;
        unit_interval("strong_average_success_rate", self.strong_average_success_rate)?;
        unit_interval("single_trader_confidence_bar", self.single_trader_confidence_bar)?;
        unit_interval("low_confidence_threshold", self.low_confidence_threshold)?;

        non_negative("portfolio_weight", self.portfolio_weight)?;
        non_negative("success_rate_weight", self.success_rate_weight)?;
        non_negative("min_portfolio_value", self.min_portfolio_value)?;
        non_negative("low_liquidity_threshold", self.low_liquidity_threshold)?;

        if self.portfolio_weight + self.success_rate_weight == 0.0 {
            return Err(AlphaError::Configuration(
                "at least one analyzer weight must be positive".to_string(),
            ));
        }

        if !(self.z_score.is_finite() && self.z_score > 0.0) {
            return Err(AlphaError::Configuration(format!(
                "z_score must be positive, got {}",
                self.z_score
            )));
        }

        if !self.risk_free_rate.is_finite() {
            return Err(AlphaError::Configuration("risk_free_rate must be finite".to_string()));
        }

        if self.analysis_timeout_ms == 0 {
            return Err(AlphaError::Configuration(
                "analysis_timeout_ms must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn analysis_timeout(&self) -> Duration {
        Duration::from_millis(self.analysis_timeout_ms)
    }

    pub fn portfolio_analyzer(&self) -> PortfolioAnalyzerConfig {
        PortfolioAnalyzerConfig {
            weight: self.portfolio_weight,
            min_allocation_threshold: self.min_portfolio_ratio,
            conviction_ratio_threshold: self.conviction_ratio_threshold,
            single_trader_confidence_bar: self.single_trader_confidence_bar,
            ..Default::default()
        }
    }

    pub fn success_rate_analyzer(&self) -> SuccessRateAnalyzerConfig {
        SuccessRateAnalyzerConfig {
            weight: self.success_rate_weight,
            min_success_rate: self.min_success_rate,
            min_trade_history: self.min_trade_history,
            intervals: BinomialIntervals::new(self.z_score, self.min_interval_sample),
            significance: SignificanceCriteria {
                min_sample: self.significance_min_sample,
                lower_bound: self.significance_lower_bound,
            },
            strong_average_success_rate: self.strong_average_success_rate,
            single_trader_confidence_bar: self.single_trader_confidence_bar,
            risk_free_rate: self.risk_free_rate,
            ..Default::default()
        }
    }

    /// Default pre-screen used when a request carries no overrides
    pub fn trader_filters(&self) -> TraderFilters {
        TraderFilters {
            min_portfolio_ratio: self.min_portfolio_ratio,
            min_success_rate: self.min_success_rate,
            min_trade_history: self.min_trade_history,
            min_portfolio_value: self.min_portfolio_value,
        }
    }
}

/// Advisory trader pre-screen, overridable per request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraderFilters {
    pub min_portfolio_ratio: f64,
    pub min_success_rate: f64,
    pub min_trade_history: u32,
    pub min_portfolio_value: f64,
}

impl Default for TraderFilters {
    fn default() -> Self {
        AlphaConfig::default().trader_filters()
    }
}

impl TraderFilters {
    pub fn validate(&self) -> AlphaResult<()> {
        unit_interval("min_portfolio_ratio", self.min_portfolio_ratio)?;
        unit_interval("min_success_rate", self.min_success_rate)?;
        non_negative("min_portfolio_value", self.min_portfolio_value)?;
        Ok(())
    }
}

/// Save configuration to a TOML file that [`AlphaConfig::load`] reads back
pub fn save_config(config: &AlphaConfig, path: &Path) -> anyhow::Result<()> {
    let content = toml::to_string_pretty(config).context("Failed to serialize configuration")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file {}", path.display()))?;
    Ok(())
}

/// Commented template with every option at its default
pub fn config_template() -> &'static str {
    "# Alpha Detection Configuration
# Every value below is the built-in default.
# Environment variables prefixed with ALPHA_ override file values,
# e.g. ALPHA_AGENT_VOTE_THRESHOLD=0.65

# Weighted vote share needed for an alpha / no_alpha consensus
agent_vote_threshold = 0.6

# Share of portfolio in the target market that marks a high-conviction trader
min_portfolio_ratio = 0.1

# Success rate that marks a successful trader
min_success_rate = 0.7

# Resolved markets needed before a track record counts
min_trade_history = 10

# Trader pre-screen portfolio floor (USD)
min_portfolio_value = 1000.0

# Analyzer voting weights
portfolio_weight = 1.2
success_rate_weight = 1.3

# Deadline for one decision cycle (milliseconds)
analysis_timeout_ms = 5000

# Success-rate statistics
z_score = 1.96
min_interval_sample = 5
significance_min_sample = 10
significance_lower_bound = 0.5

# Vote policy constants
conviction_ratio_threshold = 0.15
strong_average_success_rate = 0.75
single_trader_confidence_bar = 0.6

# Per-position risk-free return for Sharpe/Sortino evidence
risk_free_rate = 0.0

# Risk annotations
low_liquidity_threshold = 100000.0
low_confidence_threshold = 0.7

[category_risk]
crypto = \"volatile_underlying\"
elections = \"politicized_market\"
politics = \"politicized_market\"
sports = \"event_outcome_variance\"
"
}

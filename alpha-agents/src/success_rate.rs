//! Success Rate Analyzer - looks for traders whose resolved-market record is
//! both strong and statistically distinguishable from a coin flip

use crate::agent::{AnalysisRequest, AnalysisResult, Analyzer};
use anyhow::Result;
use async_trait::async_trait;
use common::{AlphaError, TraderRecord, Vote};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use trader_stats::{
    binomial_p_value, risk_adjusted_returns, BinomialIntervals, ConfidenceInterval,
    RiskAdjustedReturns, SignificanceCriteria,
};

/// Null hypothesis for the binomial test: the trader is guessing
const COIN_FLIP: f64 = 0.5;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessRateAnalyzerConfig {
    pub name: String,
    pub weight: f64,
    pub min_success_rate: f64,
    pub min_trade_history: u32,
    pub intervals: BinomialIntervals,
    pub significance: SignificanceCriteria,
    /// Average rate above which two successful traders vote alpha
    pub strong_average_success_rate: f64,
    /// A single successful trader votes alpha only above this confidence
    pub single_trader_confidence_bar: f64,
    pub risk_free_rate: f64,
}

impl Default for SuccessRateAnalyzerConfig {
    fn default() -> Self {
        Self {
            name: "Success Rate Analyzer".to_string(),
            weight: 1.3,
            min_success_rate: 0.7,
            min_trade_history: 10,
            intervals: BinomialIntervals::default(),
            significance: SignificanceCriteria::default(),
            strong_average_success_rate: 0.75,
            single_trader_confidence_bar: 0.6,
            risk_free_rate: 0.0,
        }
    }
}

/// Per-trader statistics for a qualifying track record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub address: String,
    pub success_rate: f64,
    pub markets_resolved: u32,
    pub wins: u32,
    pub confidence_interval: ConfidenceInterval,
    pub wilson_interval: ConfidenceInterval,
    pub statistically_significant: bool,
    /// One-sided binomial p-value against a 50% success rate
    pub p_value: f64,
    pub risk_adjusted: RiskAdjustedReturns,
}

#[derive(Debug, Clone, PartialEq)]
struct SuccessAssessment {
    records: Vec<TrackRecord>,
    total_traders: usize,
    average_success_rate: f64,
}

impl SuccessAssessment {
    fn successful<'a>(&'a self, min_rate: f64) -> impl Iterator<Item = &'a TrackRecord> + 'a {
        self.records.iter().filter(move |r| r.success_rate >= min_rate)
    }

    fn significant(&self) -> impl Iterator<Item = &TrackRecord> {
        self.records.iter().filter(|r| r.statistically_significant)
    }
}

pub struct SuccessRateAnalyzer {
    config: SuccessRateAnalyzerConfig,
}

impl SuccessRateAnalyzer {
    pub fn new(config: SuccessRateAnalyzerConfig) -> Self {
        Self { config }
    }

    fn track_record(&self, trader: &TraderRecord) -> Option<TrackRecord> {
        let success_rate = trader.success_rate?;
        let resolved = trader.markets_resolved;
        if resolved < self.config.min_trade_history {
            return None;
        }

        let wins = trader.wins();
        let confidence_interval = self.config.intervals.normal_approximation(success_rate, resolved);

        Some(TrackRecord {
            address: trader.address.clone(),
            success_rate,
            markets_resolved: resolved,
            wins,
            statistically_significant: self
                .config
                .significance
                .is_significant(resolved, &confidence_interval),
            confidence_interval,
            wilson_interval: self.config.intervals.wilson_score(wins, resolved),
            p_value: binomial_p_value(wins, resolved, COIN_FLIP),
            risk_adjusted: risk_adjusted_returns(&trader.position_returns(), self.config.risk_free_rate),
        })
    }

    fn assess(&self, request: &AnalysisRequest) -> SuccessAssessment {
        let records: Vec<TrackRecord> = request
            .traders
            .iter()
            .filter_map(|t| self.track_record(t))
            .collect();

        let average_success_rate = if records.is_empty() {
            0.0
        } else {
            records.iter().map(|r| r.success_rate).sum::<f64>() / records.len() as f64
        };

        SuccessAssessment {
            records,
            total_traders: request.traders.len(),
            average_success_rate,
        }
    }

    fn confidence_for(&self, significant: usize, successful: usize, average: f64) -> f64 {
        if significant >= 2 && average > self.config.min_success_rate {
            0.85
        } else if significant >= 1 {
            0.70
        } else if successful >= 2 {
            0.60
        } else if successful >= 1 {
            0.40
        } else {
            0.20
        }
    }
}

impl Default for SuccessRateAnalyzer {
    fn default() -> Self {
        Self::new(SuccessRateAnalyzerConfig::default())
    }
}

#[async_trait]
impl Analyzer for SuccessRateAnalyzer {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn weight(&self) -> f64 {
        self.config.weight
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        if request.traders.is_empty() {
            warn!(market_id = %request.market.id, "Insufficient data for success rate analysis");
            return Err(AlphaError::InsufficientData(
                "no traders supplied for success rate analysis".to_string(),
            )
            .into());
        }

        let assessment = self.assess(request);
        let successful: Vec<&TrackRecord> = assessment.successful(self.config.min_success_rate).collect();
        let significant: Vec<String> = assessment.significant().map(|r| r.address.clone()).collect();
        let confidence = self.confidence_for(
            significant.len(),
            successful.len(),
            assessment.average_success_rate,
        );

        debug!(
            market_id = %request.market.id,
            qualified = assessment.records.len(),
            successful = successful.len(),
            significant = significant.len(),
            confidence,
            "Track records assessed"
        );

        let mut key_findings = Vec::new();
        if !successful.is_empty() {
            key_findings.push(format!("{} high-performing traders identified", successful.len()));
        }
        if !significant.is_empty() {
            key_findings.push(format!(
                "{} traders beat a coin flip at the {:.0}% interval lower bound",
                significant.len(),
                self.config.significance.lower_bound * 100.0
            ));
        }
        if !assessment.records.is_empty() {
            key_findings.push(format!(
                "Average success rate: {:.1}%",
                assessment.average_success_rate * 100.0
            ));
        } else {
            key_findings.push(format!(
                "No trader has {} or more resolved markets",
                self.config.min_trade_history
            ));
        }

        let mut result = AnalysisResult::new(confidence)
            .with_evidence("successful_traders", serde_json::to_value(&successful)?)
            .with_evidence("total_traders_analyzed", assessment.total_traders as u64)
            .with_evidence("qualified_trader_count", assessment.records.len() as u64)
            .with_evidence("successful_count", successful.len() as u64)
            .with_evidence("significant_count", significant.len() as u64)
            .with_evidence("average_success_rate", assessment.average_success_rate)
            .with_evidence("significant_traders", serde_json::to_value(&significant)?);

        result.key_findings = key_findings;
        result.flagged_traders = significant;

        Ok(result)
    }

    fn vote(&self, result: &AnalysisResult) -> Vote {
        let significant = result.evidence_count("significant_count");
        let successful = result.evidence_count("successful_count");
        let average = result.evidence_f64("average_success_rate");

        // One significant record is already enough; two or more is the strong case
        let alpha = significant >= 1
            || (successful >= 2 && average > self.config.strong_average_success_rate)
            || (successful >= 1 && result.confidence > self.config.single_trader_confidence_bar);

        if alpha {
            Vote::Alpha
        } else if successful == 0 {
            Vote::NoAlpha
        } else {
            Vote::Abstain
        }
    }

    fn reasoning(&self, result: &AnalysisResult) -> String {
        let successful = result.evidence_count("successful_count");
        let significant = result.evidence_count("significant_count");
        let qualified = result.evidence_count("qualified_trader_count");
        let average = result.evidence_f64("average_success_rate") * 100.0;
        let min_rate = self.config.min_success_rate * 100.0;

        if successful >= 3 {
            format!(
                "{} traders with >={:.0}% success rate, {} statistically significant",
                successful, min_rate, significant
            )
        } else if successful == 2 {
            format!("2 high-performing traders with {:.1}% avg success rate", average)
        } else if successful == 1 {
            format!("1 trader with proven track record above {:.0}%", min_rate)
        } else if significant > 0 {
            format!(
                "{} traders show statistical significance with {:.1}% avg rate",
                significant, average
            )
        } else if qualified > 0 {
            format!("Analyzed {} traders, avg success rate {:.1}%", qualified, average)
        } else {
            "Insufficient trader history for reliable analysis".to_string()
        }
    }
}

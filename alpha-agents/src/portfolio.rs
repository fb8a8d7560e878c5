//! Portfolio Analyzer - looks for traders betting a large share of their
//! portfolio on the target market

use crate::agent::{AnalysisRequest, AnalysisResult, Analyzer};
use anyhow::Result;
use async_trait::async_trait;
use common::{AlphaError, Vote};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioAnalyzerConfig {
    pub name: String,
    pub weight: f64,
    /// Allocation ratio at which a trader counts as high-conviction
    pub min_allocation_threshold: f64,
    /// Conviction ratio needed for the three-trader alpha rule
    pub conviction_ratio_threshold: f64,
    /// A single high-conviction trader votes alpha only above this confidence
    pub single_trader_confidence_bar: f64,
}

impl Default for PortfolioAnalyzerConfig {
    fn default() -> Self {
        Self {
            name: "Portfolio Analyzer".to_string(),
            weight: 1.2,
            min_allocation_threshold: 0.1,
            conviction_ratio_threshold: 0.15,
            single_trader_confidence_bar: 0.6,
        }
    }
}

/// Evidence entry for one high-conviction trader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighConvictionTrader {
    pub address: String,
    pub allocation_ratio: f64,
    pub position_size_usd: f64,
    pub portfolio_value_usd: f64,
}

/// Typed view of what the analyzer measured
#[derive(Debug, Clone, PartialEq)]
struct AllocationAssessment {
    high_conviction: Vec<HighConvictionTrader>,
    total_traders: usize,
    traders_with_position: usize,
    average_allocation: f64,
    conviction_ratio: f64,
}

pub struct PortfolioAnalyzer {
    config: PortfolioAnalyzerConfig,
}

impl PortfolioAnalyzer {
    pub fn new(config: PortfolioAnalyzerConfig) -> Self {
        Self { config }
    }

    fn assess(&self, request: &AnalysisRequest) -> AllocationAssessment {
        let market_id = request.market.id.as_str();
        let mut high_conviction = Vec::new();
        let mut total_allocation = 0.0;
        let mut traders_with_position = 0usize;

        for trader in &request.traders {
            // Skips empty portfolios and traders not in this market
            let Some(ratio) = trader.allocation_ratio(market_id) else {
                continue;
            };

            total_allocation += ratio;
            traders_with_position += 1;

            if ratio >= self.config.min_allocation_threshold {
                high_conviction.push(HighConvictionTrader {
                    address: trader.address.clone(),
                    allocation_ratio: ratio,
                    position_size_usd: trader.exposure_to(market_id),
                    portfolio_value_usd: trader.total_portfolio_value,
                });
            }
        }

        high_conviction.sort_by(|a, b| {
            b.allocation_ratio
                .total_cmp(&a.allocation_ratio)
                .then_with(|| a.address.cmp(&b.address))
        });

        let total_traders = request.traders.len();
        AllocationAssessment {
            average_allocation: total_allocation / traders_with_position.max(1) as f64,
            conviction_ratio: high_conviction.len() as f64 / total_traders.max(1) as f64,
            high_conviction,
            total_traders,
            traders_with_position,
        }
    }

    fn confidence_for(&self, assessment: &AllocationAssessment) -> f64 {
        let count = assessment.high_conviction.len();
        if count >= 3 && assessment.average_allocation > self.config.min_allocation_threshold {
            0.9
        } else if count >= 2 {
            0.7
        } else if count >= 1 {
            0.5
        } else {
            0.2
        }
    }

    fn key_findings(&self, assessment: &AllocationAssessment) -> Vec<String> {
        let count = assessment.high_conviction.len();
        if count == 0 {
            return vec![format!(
                "No trader allocates at least {:.0}% of their portfolio to this market",
                self.config.min_allocation_threshold * 100.0
            )];
        }

        vec![
            format!("{} traders with high portfolio allocation", count),
            format!("Average allocation: {:.1}%", assessment.average_allocation * 100.0),
            format!("Conviction ratio: {:.1}%", assessment.conviction_ratio * 100.0),
        ]
    }
}

impl Default for PortfolioAnalyzer {
    fn default() -> Self {
        Self::new(PortfolioAnalyzerConfig::default())
    }
}

#[async_trait]
impl Analyzer for PortfolioAnalyzer {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn weight(&self) -> f64 {
        self.config.weight
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        if request.traders.is_empty() {
            warn!(market_id = %request.market.id, "Insufficient data for portfolio analysis");
            return Err(AlphaError::InsufficientData(
                "no traders supplied for portfolio analysis".to_string(),
            )
            .into());
        }

        let assessment = self.assess(request);
        let confidence = self.confidence_for(&assessment);

        debug!(
            market_id = %request.market.id,
            high_conviction = assessment.high_conviction.len(),
            average_allocation = assessment.average_allocation,
            confidence,
            "Portfolio allocation assessed"
        );

        let mut result = AnalysisResult::new(confidence)
            .with_evidence(
                "high_conviction_traders",
                serde_json::to_value(&assessment.high_conviction)?,
            )
            .with_evidence("total_traders_analyzed", assessment.total_traders as u64)
            .with_evidence("traders_with_position", assessment.traders_with_position as u64)
            .with_evidence("high_conviction_count", assessment.high_conviction.len() as u64)
            .with_evidence("average_allocation", assessment.average_allocation)
            .with_evidence("conviction_ratio", assessment.conviction_ratio);

        result.key_findings = self.key_findings(&assessment);
        result.flagged_traders = assessment
            .high_conviction
            .iter()
            .map(|t| t.address.clone())
            .collect();

        Ok(result)
    }

    fn vote(&self, result: &AnalysisResult) -> Vote {
        let count = result.evidence_count("high_conviction_count");
        let conviction_ratio = result.evidence_f64("conviction_ratio");
        let average_allocation = result.evidence_f64("average_allocation");

        if count == 0 {
            return Vote::NoAlpha;
        }

        let strong = count >= 3 && conviction_ratio > self.config.conviction_ratio_threshold;
        let moderate = count >= 2 && average_allocation > self.config.min_allocation_threshold;
        let single = result.confidence > self.config.single_trader_confidence_bar;

        if strong || moderate || single {
            Vote::Alpha
        } else {
            Vote::Abstain
        }
    }

    fn reasoning(&self, result: &AnalysisResult) -> String {
        let count = result.evidence_count("high_conviction_count");
        let average = result.evidence_f64("average_allocation") * 100.0;
        let threshold = self.config.min_allocation_threshold * 100.0;

        match count {
            0 => "No significant portfolio allocation patterns detected".to_string(),
            1 => "1 trader with significant portfolio allocation".to_string(),
            2 => format!(
                "2 traders showing high conviction with avg {:.1}% allocation",
                average
            ),
            n => format!(
                "{} traders with >={:.0}% portfolio allocation, avg {:.1}%",
                n, threshold, average
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{MarketSnapshot, Position, TraderRecord};

    fn trader(address: &str, portfolio: f64, in_market: f64) -> TraderRecord {
        TraderRecord::new(address, portfolio).with_position(Position::new("m-1", in_market, 0.5))
    }

    fn request(traders: Vec<TraderRecord>) -> AnalysisRequest {
        AnalysisRequest::new(MarketSnapshot::new("m-1"), traders)
    }

    #[tokio::test]
    async fn test_single_high_conviction_trader_abstains() {
        let analyzer = PortfolioAnalyzer::default();
        let result = analyzer
            .analyze(&request(vec![trader("0xa", 100_000.0, 15_000.0)]))
            .await
            .unwrap();

        assert_eq!(result.evidence_count("high_conviction_count"), 1);
        assert_eq!(result.confidence, 0.5);
        assert_eq!(analyzer.vote(&result), Vote::Abstain);
        assert_eq!(result.flagged_traders, vec!["0xa".to_string()]);
    }

    #[tokio::test]
    async fn test_two_high_conviction_traders_vote_alpha() {
        let analyzer = PortfolioAnalyzer::default();
        let result = analyzer
            .analyze(&request(vec![
                trader("0xa", 100_000.0, 20_000.0),
                trader("0xb", 50_000.0, 10_000.0),
            ]))
            .await
            .unwrap();

        assert_eq!(result.confidence, 0.7);
        assert!((result.evidence_f64("average_allocation") - 0.2).abs() < 1e-12);
        assert_eq!(analyzer.vote(&result), Vote::Alpha);
    }

    #[tokio::test]
    async fn test_three_high_conviction_traders() {
        let analyzer = PortfolioAnalyzer::default();
        let result = analyzer
            .analyze(&request(vec![
                trader("0xa", 10_000.0, 3_000.0),
                trader("0xb", 10_000.0, 2_000.0),
                trader("0xc", 10_000.0, 1_500.0),
                trader("0xd", 10_000.0, 100.0),
            ]))
            .await
            .unwrap();

        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.evidence_count("high_conviction_count"), 3);
        assert!((result.evidence_f64("conviction_ratio") - 0.75).abs() < 1e-12);
        assert_eq!(analyzer.vote(&result), Vote::Alpha);
        // Highest allocation first
        assert_eq!(result.flagged_traders, vec!["0xa", "0xb", "0xc"]);
    }

    #[tokio::test]
    async fn test_no_conviction_votes_no_alpha() {
        let analyzer = PortfolioAnalyzer::default();
        let result = analyzer
            .analyze(&request(vec![
                trader("0xa", 100_000.0, 1_000.0),
                TraderRecord::new("0xb", 0.0).with_position(Position::new("m-1", 500.0, 0.5)),
            ]))
            .await
            .unwrap();

        assert_eq!(result.confidence, 0.2);
        assert_eq!(result.evidence_count("traders_with_position"), 1);
        assert_eq!(analyzer.vote(&result), Vote::NoAlpha);
        assert!(result.flagged_traders.is_empty());
    }

    #[tokio::test]
    async fn test_positions_in_other_markets_ignored() {
        let analyzer = PortfolioAnalyzer::default();
        let other = TraderRecord::new("0xa", 10_000.0)
            .with_position(Position::new("m-2", 9_000.0, 0.5));
        let result = analyzer.analyze(&request(vec![other])).await.unwrap();

        assert_eq!(result.evidence_count("high_conviction_count"), 0);
        assert_eq!(result.evidence_f64("average_allocation"), 0.0);
    }

    #[tokio::test]
    async fn test_no_traders_is_an_error() {
        let analyzer = PortfolioAnalyzer::default();
        let err = analyzer.analyze(&request(Vec::new())).await.unwrap_err();
        assert!(err.to_string().contains("Insufficient data"));
    }

    #[test]
    fn test_vote_from_evidence_only() {
        let analyzer = PortfolioAnalyzer::default();

        // Three traders but diluted among many: falls through to the single-trader bar
        let diluted = AnalysisResult::new(0.5)
            .with_evidence("high_conviction_count", 3u64)
            .with_evidence("conviction_ratio", 0.1)
            .with_evidence("average_allocation", 0.05);
        assert_eq!(analyzer.vote(&diluted), Vote::Abstain);

        let confident = AnalysisResult::new(0.9)
            .with_evidence("high_conviction_count", 1u64)
            .with_evidence("conviction_ratio", 0.1)
            .with_evidence("average_allocation", 0.05);
        assert_eq!(analyzer.vote(&confident), Vote::Alpha);
    }

    #[test]
    fn test_single_trader_bar_is_configurable() {
        let strict = PortfolioAnalyzer::new(PortfolioAnalyzerConfig {
            single_trader_confidence_bar: 0.95,
            ..Default::default()
        });
        let confident = AnalysisResult::new(0.9)
            .with_evidence("high_conviction_count", 1u64)
            .with_evidence("conviction_ratio", 0.1)
            .with_evidence("average_allocation", 0.05);

        assert_eq!(PortfolioAnalyzer::default().vote(&confident), Vote::Alpha);
        assert_eq!(strict.vote(&confident), Vote::Abstain);
    }

    #[test]
    fn test_reasoning() {
        let analyzer = PortfolioAnalyzer::default();
        let result = AnalysisResult::new(0.9)
            .with_evidence("high_conviction_count", 4u64)
            .with_evidence("average_allocation", 0.25);
        assert_eq!(
            analyzer.reasoning(&result),
            "4 traders with >=10% portfolio allocation, avg 25.0%"
        );
    }
}

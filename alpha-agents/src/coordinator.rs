//! Alpha Coordinator - runs one full decision cycle per market
//!
//! normalize input → pre-screen traders → timed vote → verdict

use crate::agent::AnalysisRequest;
use crate::config::{AlphaConfig, TraderFilters};
use crate::normalize::{normalize_market, normalize_traders, screen_traders};
use crate::portfolio::PortfolioAnalyzer;
use crate::risk::{recommended_side, RiskAssessor};
use crate::success_rate::SuccessRateAnalyzer;
use crate::voting::{ConsensusEngine, ConsensusOutcome, EngineSummary};
use common::{
    AlphaError, AlphaResult, AlphaVerdict, DateTime, MarketData, Strength, TraderData, Utc,
    VerdictStatus, Vote,
};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Entry point for alpha analysis. Holds only immutable configuration, so
/// one instance can serve concurrent requests.
pub struct AlphaCoordinator {
    config: AlphaConfig,
    engine: ConsensusEngine,
    risk: RiskAssessor,
}

impl AlphaCoordinator {
    /// Build a coordinator with the portfolio and success-rate analyzers
    pub fn new(config: AlphaConfig) -> AlphaResult<Self> {
        let engine = ConsensusEngine::new(config.agent_vote_threshold)
            .with_analyzer(Arc::new(PortfolioAnalyzer::new(config.portfolio_analyzer())))
            .with_analyzer(Arc::new(SuccessRateAnalyzer::new(config.success_rate_analyzer())));

        Self::with_engine(config, engine)
    }

    /// Build a coordinator around a custom set of analyzers. The engine's
    /// own threshold and weights are validated along with the config.
    pub fn with_engine(config: AlphaConfig, engine: ConsensusEngine) -> AlphaResult<Self> {
        config.validate()?;
        engine.validate()?;

        let risk = RiskAssessor::from_config(&config);
        info!(
            analyzers = ?engine.registered_analyzers(),
            threshold = engine.threshold(),
            "Alpha coordinator initialized"
        );

        Ok(Self {
            config,
            engine,
            risk,
        })
    }

    pub fn config(&self) -> &AlphaConfig {
        &self.config
    }

    pub fn engine_summary(&self) -> EngineSummary {
        self.engine.summary()
    }

    /// Analyze a market as of now
    pub async fn analyze_market(
        &self,
        market: MarketData,
        traders: Vec<TraderData>,
        filters: Option<TraderFilters>,
    ) -> AlphaResult<AlphaVerdict> {
        self.analyze_market_at(market, traders, filters, Utc::now()).await
    }

    /// Analyze a market with an explicit timestamp; identical input yields an
    /// identical verdict
    pub async fn analyze_market_at(
        &self,
        market: MarketData,
        traders: Vec<TraderData>,
        filters: Option<TraderFilters>,
        as_of: DateTime<Utc>,
    ) -> AlphaResult<AlphaVerdict> {
        let market = normalize_market(market)?;
        let span = info_span!("alpha_analysis", analysis_id = %Uuid::new_v4(), market_id = %market.id);

        async move {
            let received = traders.len();
            let traders = normalize_traders(traders);
            let filters = self.effective_filters(filters);
            let traders = screen_traders(traders, &market.id, &filters);

            info!(received, analyzed = traders.len(), "Starting alpha analysis");

            let request = Arc::new(AnalysisRequest::new(market, traders));
            let verdict = self.run_cycle(request, as_of).await?;

            info!(
                has_alpha = verdict.has_alpha,
                confidence = verdict.confidence_score,
                status = ?verdict.status,
                "Alpha analysis completed"
            );
            Ok::<_, AlphaError>(verdict)
        }
        .instrument(span)
        .await
    }

    /// Run a cycle on an already-normalized request, skipping the pre-screen
    pub async fn analyze_request(
        &self,
        request: AnalysisRequest,
        as_of: DateTime<Utc>,
    ) -> AlphaResult<AlphaVerdict> {
        self.run_cycle(Arc::new(request), as_of).await
    }

    fn effective_filters(&self, overrides: Option<TraderFilters>) -> TraderFilters {
        match overrides {
            Some(filters) => match filters.validate() {
                Ok(()) => filters,
                Err(e) => {
                    warn!(error = %e, "Invalid trader filters, using configured defaults");
                    self.config.trader_filters()
                }
            },
            None => self.config.trader_filters(),
        }
    }

    async fn run_cycle(&self, request: Arc<AnalysisRequest>, as_of: DateTime<Utc>) -> AlphaResult<AlphaVerdict> {
        let timeout = self.config.analysis_timeout();

        let outcome = tokio::time::timeout(timeout, self.engine.conduct_vote(Arc::clone(&request)))
            .await
            .map_err(|_| {
                warn!(market_id = %request.market.id, ?timeout, "Analysis deadline exceeded");
                AlphaError::Timeout(timeout)
            })?;

        Ok(self.assemble_verdict(&request, outcome, as_of))
    }

    fn assemble_verdict(
        &self,
        request: &AnalysisRequest,
        outcome: ConsensusOutcome,
        as_of: DateTime<Utc>,
    ) -> AlphaVerdict {
        let market = &request.market;

        // Nothing to analyze: the verdict abstains whatever the analyzers said
        let (outcome, status) = if request.traders.is_empty() {
            (outcome.into_abstain("no qualifying traders"), VerdictStatus::InsufficientData)
        } else {
            (outcome, VerdictStatus::Complete)
        };
        let has_alpha = outcome.consensus == Vote::Alpha;

        let key_traders: BTreeSet<&str> = match status {
            VerdictStatus::Complete => outcome
                .successful_reports()
                .flat_map(|r| r.flagged_traders.iter().map(String::as_str))
                .collect(),
            VerdictStatus::InsufficientData => BTreeSet::new(),
        };

        let recommended_side = if has_alpha {
            recommended_side(&request.traders, &market.id)
        } else {
            None
        };

        AlphaVerdict {
            market_id: market.id.clone(),
            has_alpha,
            confidence_score: outcome.confidence,
            recommended_side,
            strength: Strength::from_confidence(outcome.confidence),
            status,
            consensus: outcome.summary(),
            agent_analyses: outcome.analyses.iter().map(|r| r.to_agent_analysis()).collect(),
            key_traders: key_traders.into_iter().map(str::to_string).collect(),
            risk_factors: self.risk.assess(market, &request.traders, &outcome, as_of),
            analysis_timestamp: as_of,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AnalysisResult, Analyzer};
    use async_trait::async_trait;
    use chrono::TimeZone;
    use common::{PositionData, TraderRecord};
    use std::time::Duration;

    struct SlowAnalyzer;

    #[async_trait]
    impl Analyzer for SlowAnalyzer {
        fn name(&self) -> &str {
            "Slow"
        }

        fn weight(&self) -> f64 {
            1.0
        }

        async fn analyze(&self, _request: &AnalysisRequest) -> anyhow::Result<AnalysisResult> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(AnalysisResult::new(1.0))
        }

        fn vote(&self, _result: &AnalysisResult) -> Vote {
            Vote::Alpha
        }
    }

    /// Votes the same way on any input, including an empty trader list
    struct FixedAnalyzer {
        name: &'static str,
        weight: f64,
        vote: Vote,
    }

    #[async_trait]
    impl Analyzer for FixedAnalyzer {
        fn name(&self) -> &str {
            self.name
        }

        fn weight(&self) -> f64 {
            self.weight
        }

        async fn analyze(&self, _request: &AnalysisRequest) -> anyhow::Result<AnalysisResult> {
            let mut result = AnalysisResult::new(1.0);
            result.flagged_traders = vec!["0xghost".to_string()];
            Ok(result)
        }

        fn vote(&self, _result: &AnalysisResult) -> Vote {
            self.vote
        }
    }

    fn fixed(name: &'static str, weight: f64, vote: Vote) -> Arc<dyn Analyzer> {
        Arc::new(FixedAnalyzer { name, weight, vote })
    }

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn market() -> MarketData {
        MarketData {
            id: Some("m-1".to_string()),
            title: Some("Will it happen?".to_string()),
            total_liquidity: Some(250_000.0),
            ..Default::default()
        }
    }

    fn trader(address: &str, portfolio: f64, in_market: f64) -> TraderData {
        TraderData {
            address: Some(address.to_string()),
            total_portfolio_value_usd: Some(portfolio),
            positions: vec![PositionData {
                market_id: Some("m-1".to_string()),
                outcome_id: Some("Yes".to_string()),
                position_size_usd: Some(in_market),
                entry_price: Some(0.45),
                current_value_usd: None,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AlphaConfig {
            agent_vote_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(AlphaCoordinator::new(config), Err(AlphaError::Configuration(_))));
    }

    #[test]
    fn test_engine_threshold_validated() {
        for threshold in [0.0, -0.2, 1.5, f64::NAN] {
            let engine = ConsensusEngine::new(threshold).with_analyzer(fixed("Abstainer", 1.0, Vote::Abstain));
            let result = AlphaCoordinator::with_engine(AlphaConfig::default(), engine);
            assert!(
                matches!(result, Err(AlphaError::Configuration(_))),
                "accepted threshold {}",
                threshold
            );
        }
    }

    #[test]
    fn test_engine_weights_validated() {
        for weight in [-5.0, f64::NAN, f64::INFINITY] {
            let engine = ConsensusEngine::new(0.6)
                .with_analyzer(fixed("Abstainer", 1.0, Vote::Abstain))
                .with_analyzer(fixed("Skewed", weight, Vote::Alpha));
            let result = AlphaCoordinator::with_engine(AlphaConfig::default(), engine);
            assert!(
                matches!(result, Err(AlphaError::Configuration(_))),
                "accepted weight {}",
                weight
            );
        }

        let zero_weight = ConsensusEngine::new(0.6)
            .with_analyzer(fixed("Abstainer", 1.0, Vote::Abstain))
            .with_analyzer(fixed("Muted", 0.0, Vote::Alpha));
        assert!(AlphaCoordinator::with_engine(AlphaConfig::default(), zero_weight).is_ok());
    }

    #[test]
    fn test_coordinator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AlphaCoordinator>();
    }

    #[test]
    fn test_default_analyzers() {
        let coordinator = AlphaCoordinator::new(AlphaConfig::default()).unwrap();
        let summary = coordinator.engine_summary();

        let names: Vec<&str> = summary.analyzers.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Portfolio Analyzer", "Success Rate Analyzer"]);
        assert!((summary.total_weight - 2.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_missing_market_id() {
        let coordinator = AlphaCoordinator::new(AlphaConfig::default()).unwrap();
        let result = coordinator
            .analyze_market_at(MarketData::default(), Vec::new(), None, as_of())
            .await;
        assert!(matches!(result, Err(AlphaError::InputValidation(_))));
    }

    #[tokio::test]
    async fn test_split_vote_is_not_alpha() {
        let coordinator = AlphaCoordinator::new(AlphaConfig::default()).unwrap();
        let traders = vec![
            trader("0xc", 20_000.0, 5_000.0),
            trader("0xa", 10_000.0, 3_000.0),
            trader("0xb", 40_000.0, 8_000.0),
        ];

        let verdict = coordinator
            .analyze_market_at(market(), traders, None, as_of())
            .await
            .unwrap();

        // Portfolio votes alpha at 0.9; success rate has no records and votes no_alpha
        assert_eq!(verdict.consensus.vote_counts.alpha, 1);
        assert_eq!(verdict.consensus.vote_counts.no_alpha, 1);
        assert_eq!(verdict.consensus.vote, Vote::Abstain);
        assert!(!verdict.has_alpha);
        assert_eq!(verdict.recommended_side, None);
        assert_eq!(verdict.status, VerdictStatus::Complete);
        assert_eq!(verdict.key_traders, vec!["0xa", "0xb", "0xc"]);
        assert_eq!(verdict.analysis_timestamp, as_of());
        assert_eq!(verdict.agent_analyses.len(), 2);
    }

    #[tokio::test]
    async fn test_everyone_filtered_is_insufficient_data() {
        let coordinator = AlphaCoordinator::new(AlphaConfig::default()).unwrap();
        let verdict = coordinator
            .analyze_market_at(market(), vec![trader("0xa", 500.0, 400.0)], None, as_of())
            .await
            .unwrap();

        assert_eq!(verdict.status, VerdictStatus::InsufficientData);
        assert!(!verdict.has_alpha);
        assert_eq!(verdict.confidence_score, 0.0);
        assert!(verdict.risk_factors.contains(&"insufficient_data".to_string()));
    }

    #[tokio::test]
    async fn test_no_traders_abstains_even_if_analyzers_vote_alpha() {
        let engine = ConsensusEngine::new(0.6).with_analyzer(fixed("Eager", 1.0, Vote::Alpha));
        let coordinator = AlphaCoordinator::with_engine(AlphaConfig::default(), engine).unwrap();

        let verdict = coordinator
            .analyze_market_at(market(), Vec::new(), None, as_of())
            .await
            .unwrap();

        assert_eq!(verdict.status, VerdictStatus::InsufficientData);
        assert!(!verdict.has_alpha);
        assert_eq!(verdict.consensus.vote, Vote::Abstain);
        assert_eq!(verdict.confidence_score, 0.0);
        assert_eq!(verdict.consensus.weighted_scores, common::WeightedScores::abstain_only());
        assert_eq!(verdict.recommended_side, None);
        assert!(verdict.key_traders.is_empty());
        // The analyzer's own vote is still reported
        assert_eq!(verdict.agent_analyses[0].vote, Vote::Alpha);
    }

    #[tokio::test]
    async fn test_invalid_filter_override_falls_back() {
        let coordinator = AlphaCoordinator::new(AlphaConfig::default()).unwrap();
        let lenient_but_invalid = TraderFilters {
            min_portfolio_ratio: 2.0,
            ..Default::default()
        };

        let verdict = coordinator
            .analyze_market_at(
                market(),
                vec![trader("0xa", 100_000.0, 15_000.0)],
                Some(lenient_but_invalid),
                as_of(),
            )
            .await
            .unwrap();

        // Default filters admit the trader
        assert_eq!(verdict.status, VerdictStatus::Complete);
    }

    #[tokio::test]
    async fn test_filter_override_applies() {
        let coordinator = AlphaCoordinator::new(AlphaConfig::default()).unwrap();
        let strict = TraderFilters {
            min_portfolio_value: 1_000_000.0,
            ..Default::default()
        };

        let verdict = coordinator
            .analyze_market_at(market(), vec![trader("0xa", 100_000.0, 15_000.0)], Some(strict), as_of())
            .await
            .unwrap();

        assert_eq!(verdict.status, VerdictStatus::InsufficientData);
    }

    #[tokio::test]
    async fn test_deadline_exceeded() {
        let config = AlphaConfig {
            analysis_timeout_ms: 50,
            ..Default::default()
        };
        let engine = ConsensusEngine::new(config.agent_vote_threshold).with_analyzer(Arc::new(SlowAnalyzer));
        let coordinator = AlphaCoordinator::with_engine(config, engine).unwrap();

        let result = coordinator
            .analyze_market_at(market(), vec![trader("0xa", 100_000.0, 15_000.0)], None, as_of())
            .await;

        assert_eq!(result.unwrap_err(), AlphaError::Timeout(Duration::from_millis(50)));
    }

    #[tokio::test]
    async fn test_analyze_request_skips_screen() {
        let coordinator = AlphaCoordinator::new(AlphaConfig::default()).unwrap();
        let request = AnalysisRequest::new(
            common::MarketSnapshot::new("m-1"),
            vec![TraderRecord::new("0xa", 10.0)],
        );

        let verdict = coordinator.analyze_request(request, as_of()).await.unwrap();
        assert_eq!(verdict.status, VerdictStatus::Complete);
        assert_eq!(verdict.consensus.vote_counts.failed, 0);
    }
}

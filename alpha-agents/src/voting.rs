//! Voting System - Weighted consensus across registered analyzers
//!
//! A cycle fans the shared request out to every analyzer as its own tokio
//! task, collects one report per analyzer in a [`VotingRound`] and resolves
//! the round into a [`ConsensusOutcome`]:
//! - `effective_weight = weight × confidence`, added to the bucket of the vote
//! - `total_weight` sums the configured weight of analyzers that produced a result
//! - alpha wins when its share reaches the threshold, checked before no_alpha
//! - failed or panicking analyzers contribute zero weight

use crate::agent::{AnalysisRequest, AnalysisResult, Analyzer};
use common::{AgentAnalysis, AlphaError, AlphaResult, ConsensusSummary, Vote, VoteCounts, WeightedScores};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

/// One analyzer's contribution to a round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerReport {
    pub analyzer_name: String,
    pub weight: f64,
    pub vote: Vote,
    pub confidence: f64,
    /// `weight × confidence`, zero for failures
    pub effective_weight: f64,
    pub reasoning: String,
    pub key_findings: Vec<String>,
    pub evidence: Map<String, Value>,
    pub flagged_traders: Vec<String>,
    pub succeeded: bool,
}

impl AnalyzerReport {
    pub fn completed(name: &str, weight: f64, vote: Vote, reasoning: String, result: AnalysisResult) -> Self {
        let weight = sanitize_weight(weight);
        let confidence = if result.confidence.is_finite() {
            result.confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            analyzer_name: name.to_string(),
            weight,
            vote,
            confidence,
            effective_weight: weight * confidence,
            reasoning,
            key_findings: result.key_findings,
            evidence: result.evidence,
            flagged_traders: result.flagged_traders,
            succeeded: true,
        }
    }

    /// Zero-weight record of an analyzer that errored, panicked or never reported
    pub fn failed(name: &str, weight: f64, reason: &str) -> Self {
        let mut evidence = Map::new();
        evidence.insert("error".to_string(), Value::String(reason.to_string()));

        Self {
            analyzer_name: name.to_string(),
            weight: sanitize_weight(weight),
            vote: Vote::Abstain,
            confidence: 0.0,
            effective_weight: 0.0,
            reasoning: format!("Analysis failed: {}", reason),
            key_findings: Vec::new(),
            evidence,
            flagged_traders: Vec::new(),
            succeeded: false,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.evidence.get("error").and_then(Value::as_str)
    }

    pub fn to_agent_analysis(&self) -> AgentAnalysis {
        AgentAnalysis {
            agent_name: self.analyzer_name.clone(),
            vote: self.vote,
            confidence: self.confidence,
            reasoning: self.reasoning.clone(),
            key_findings: self.key_findings.clone(),
        }
    }
}

fn sanitize_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        0.0
    }
}

/// Resolved result of one voting round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusOutcome {
    pub consensus: Vote,
    pub confidence: f64,
    pub weighted_scores: WeightedScores,
    pub vote_counts: VoteCounts,
    pub total_weight: f64,
    pub threshold: f64,
    /// In registration order
    pub analyses: Vec<AnalyzerReport>,
    pub reasoning_summary: String,
}

impl ConsensusOutcome {
    pub fn summary(&self) -> ConsensusSummary {
        ConsensusSummary {
            vote: self.consensus,
            weighted_scores: self.weighted_scores,
            vote_counts: self.vote_counts,
            threshold: self.threshold,
        }
    }

    /// Replace the decision with an abstain at zero confidence. Reports and
    /// vote counts are kept.
    pub fn into_abstain(mut self, reason: &str) -> Self {
        self.consensus = Vote::Abstain;
        self.confidence = 0.0;
        self.weighted_scores = WeightedScores::abstain_only();
        self.reasoning_summary = format!("NO CONSENSUS: {}", reason);
        if self.vote_counts.failed > 0 {
            self.reasoning_summary
                .push_str(&format!("; {} analyzer(s) failed", self.vote_counts.failed));
        }
        self
    }

    pub fn has_failures(&self) -> bool {
        self.vote_counts.failed > 0
    }

    pub fn successful_reports(&self) -> impl Iterator<Item = &AnalyzerReport> {
        self.analyses.iter().filter(|r| r.succeeded)
    }
}

/// Pure consensus over a set of reports
pub fn calculate_consensus(analyses: Vec<AnalyzerReport>, threshold: f64) -> ConsensusOutcome {
    let mut vote_counts = VoteCounts::default();
    let mut alpha_weight = 0.0;
    let mut no_alpha_weight = 0.0;
    let mut total_weight = 0.0;

    for report in &analyses {
        if !report.succeeded {
            vote_counts.failed += 1;
            continue;
        }

        vote_counts.record(report.vote);
        total_weight += report.weight;

        match report.vote {
            Vote::Alpha => alpha_weight += report.effective_weight,
            Vote::NoAlpha => no_alpha_weight += report.effective_weight,
            Vote::Abstain => {}
        }
    }

    if total_weight <= 0.0 {
        let reasoning_summary = summarize(Vote::Abstain, &vote_counts, None, threshold);
        return ConsensusOutcome {
            consensus: Vote::Abstain,
            confidence: 0.0,
            weighted_scores: WeightedScores::abstain_only(),
            vote_counts,
            total_weight: 0.0,
            threshold,
            analyses,
            reasoning_summary,
        };
    }

    let alpha_ratio = alpha_weight / total_weight;
    let no_alpha_ratio = no_alpha_weight / total_weight;
    let weighted_scores = WeightedScores {
        alpha: alpha_ratio,
        no_alpha: no_alpha_ratio,
        abstain: (1.0 - alpha_ratio - no_alpha_ratio).max(0.0),
    };

    let (consensus, confidence) = if alpha_ratio >= threshold {
        (Vote::Alpha, alpha_ratio)
    } else if no_alpha_ratio >= threshold {
        (Vote::NoAlpha, no_alpha_ratio)
    } else {
        (Vote::Abstain, 1.0 - alpha_ratio.max(no_alpha_ratio))
    };

    let reasoning_summary = summarize(consensus, &vote_counts, Some(&weighted_scores), threshold);

    ConsensusOutcome {
        consensus,
        confidence: confidence.clamp(0.0, 1.0),
        weighted_scores,
        vote_counts,
        total_weight,
        threshold,
        analyses,
        reasoning_summary,
    }
}

fn summarize(consensus: Vote, counts: &VoteCounts, scores: Option<&WeightedScores>, threshold: f64) -> String {
    let reporting = counts.alpha + counts.no_alpha + counts.abstain;

    let mut summary = match (consensus, scores) {
        (Vote::Alpha, _) => format!(
            "ALPHA DETECTED: {}/{} analyzers voted for alpha",
            counts.alpha, reporting
        ),
        (Vote::NoAlpha, _) => format!(
            "NO ALPHA: {}/{} analyzers voted against alpha",
            counts.no_alpha, reporting
        ),
        (Vote::Abstain, Some(scores)) => format!(
            "NO CONSENSUS: weighted alpha {:.1}%, no alpha {:.1}%, threshold {:.0}%",
            scores.alpha * 100.0,
            scores.no_alpha * 100.0,
            threshold * 100.0
        ),
        (Vote::Abstain, None) => "NO CONSENSUS: no analyzer produced a result".to_string(),
    };

    if counts.failed > 0 {
        summary.push_str(&format!("; {} analyzer(s) failed", counts.failed));
    }

    summary
}

/// A round in the `Collecting` state. `resolve` consumes it, so a resolved
/// round can never take more votes.
pub struct VotingRound {
    threshold: f64,
    participants: Vec<(String, f64)>,
    reports: Vec<Option<AnalyzerReport>>,
}

impl VotingRound {
    /// `participants` are (name, weight) in registration order
    pub fn new(threshold: f64, participants: Vec<(String, f64)>) -> Self {
        let reports = vec![None; participants.len()];
        Self {
            threshold,
            participants,
            reports,
        }
    }

    /// Record the report for participant `index`; later reports for the same
    /// slot are ignored
    pub fn record(&mut self, index: usize, report: AnalyzerReport) {
        match self.reports.get_mut(index) {
            Some(slot) if slot.is_none() => *slot = Some(report),
            Some(_) => warn!(index, "Duplicate report ignored"),
            None => warn!(index, "Report for unknown participant ignored"),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.reports.iter().all(Option::is_some)
    }

    pub fn pending(&self) -> usize {
        self.reports.iter().filter(|r| r.is_none()).count()
    }

    /// Resolve the round; participants that never reported count as failures
    pub fn resolve(self) -> ConsensusOutcome {
        let analyses = self
            .reports
            .into_iter()
            .zip(self.participants)
            .map(|(report, (name, weight))| {
                report.unwrap_or_else(|| AnalyzerReport::failed(&name, weight, "analyzer did not report"))
            })
            .collect();

        calculate_consensus(analyses, self.threshold)
    }
}

/// Registered analyzer as shown in [`EngineSummary`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredAnalyzer {
    pub name: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSummary {
    pub analyzers: Vec<RegisteredAnalyzer>,
    pub total_weight: f64,
    pub threshold: f64,
}

/// Runs registered analyzers concurrently and resolves their votes
pub struct ConsensusEngine {
    analyzers: Vec<Arc<dyn Analyzer>>,
    threshold: f64,
}

impl ConsensusEngine {
    pub fn new(threshold: f64) -> Self {
        Self {
            analyzers: Vec::new(),
            threshold,
        }
    }

    /// Register an analyzer. An analyzer with the same name is replaced in place.
    pub fn register(&mut self, analyzer: Arc<dyn Analyzer>) {
        let name = analyzer.name().to_string();
        let weight = analyzer.weight();

        if let Some(existing) = self.analyzers.iter_mut().find(|a| a.name() == name) {
            warn!(analyzer = %name, "Replacing previously registered analyzer");
            *existing = analyzer;
        } else {
            self.analyzers.push(analyzer);
        }

        info!(analyzer = %name, weight, "Registered analyzer");
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.register(analyzer);
        self
    }

    pub fn registered_analyzers(&self) -> Vec<&str> {
        self.analyzers.iter().map(|a| a.name()).collect()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Reject a threshold outside (0, 1] or an analyzer weight that is
    /// negative or not finite
    pub fn validate(&self) -> AlphaResult<()> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(AlphaError::Configuration(format!(
                "vote threshold must be within (0, 1], got {}",
                self.threshold
            )));
        }

        for analyzer in &self.analyzers {
            let weight = analyzer.weight();
            if !(weight.is_finite() && weight >= 0.0) {
                return Err(AlphaError::Configuration(format!(
                    "analyzer {} has invalid weight {}",
                    analyzer.name(),
                    weight
                )));
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    pub fn summary(&self) -> EngineSummary {
        let analyzers: Vec<RegisteredAnalyzer> = self
            .analyzers
            .iter()
            .map(|a| RegisteredAnalyzer {
                name: a.name().to_string(),
                weight: a.weight(),
            })
            .collect();

        EngineSummary {
            total_weight: analyzers.iter().map(|a| sanitize_weight(a.weight)).sum(),
            analyzers,
            threshold: self.threshold,
        }
    }

    /// Run one voting cycle. Dropping the returned future aborts every
    /// analyzer task still in flight.
    pub async fn conduct_vote(&self, request: Arc<AnalysisRequest>) -> ConsensusOutcome {
        let participants = self
            .analyzers
            .iter()
            .map(|a| (a.name().to_string(), a.weight()))
            .collect();
        let mut round = VotingRound::new(self.threshold, participants);

        let mut tasks = JoinSet::new();
        for (index, analyzer) in self.analyzers.iter().enumerate() {
            let analyzer = Arc::clone(analyzer);
            let request = Arc::clone(&request);
            tasks.spawn(async move { (index, run_analyzer(analyzer.as_ref(), &request).await) });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, report)) => round.record(index, report),
                // Panics are caught inside the task, so this is cancellation
                Err(e) => error!(error = %e, "Analyzer task did not complete"),
            }
        }

        let outcome = round.resolve();

        info!(
            market_id = %request.market.id,
            consensus = %outcome.consensus,
            confidence = outcome.confidence,
            failed = outcome.vote_counts.failed,
            "Voting round resolved"
        );

        outcome
    }
}

async fn run_analyzer(analyzer: &dyn Analyzer, request: &AnalysisRequest) -> AnalyzerReport {
    let name = analyzer.name();
    let weight = analyzer.weight();

    let evaluation = async {
        let result = analyzer.analyze(request).await?;
        let vote = analyzer.vote(&result);
        let reasoning = analyzer.reasoning(&result);
        Ok::<_, anyhow::Error>((result, vote, reasoning))
    };

    match AssertUnwindSafe(evaluation).catch_unwind().await {
        Ok(Ok((result, vote, reasoning))) => {
            debug!(
                analyzer = %name,
                vote = %vote,
                confidence = result.confidence,
                "Analyzer voted"
            );
            AnalyzerReport::completed(name, weight, vote, reasoning, result)
        }
        Ok(Err(e)) => {
            let failure = AlphaError::AnalyzerFailure {
                analyzer: name.to_string(),
                reason: format!("{:#}", e),
            };
            error!(analyzer = %name, error = %failure, "Analyzer failed");
            AnalyzerReport::failed(name, weight, &format!("{:#}", e))
        }
        Err(panic) => {
            let reason = format!("panicked: {}", panic_message(panic.as_ref()));
            error!(analyzer = %name, reason = %reason, "Analyzer panicked");
            AnalyzerReport::failed(name, weight, &reason)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::MarketSnapshot;

    struct StaticAnalyzer {
        name: &'static str,
        weight: f64,
        vote: Vote,
        confidence: f64,
    }

    #[async_trait]
    impl Analyzer for StaticAnalyzer {
        fn name(&self) -> &str {
            self.name
        }

        fn weight(&self) -> f64 {
            self.weight
        }

        async fn analyze(&self, _request: &AnalysisRequest) -> anyhow::Result<AnalysisResult> {
            let mut result = AnalysisResult::new(self.confidence);
            result.flagged_traders = vec![format!("0x{}", self.name.to_lowercase())];
            Ok(result)
        }

        fn vote(&self, _result: &AnalysisResult) -> Vote {
            self.vote
        }
    }

    struct FailingAnalyzer;

    #[async_trait]
    impl Analyzer for FailingAnalyzer {
        fn name(&self) -> &str {
            "Failing"
        }

        fn weight(&self) -> f64 {
            1.0
        }

        async fn analyze(&self, _request: &AnalysisRequest) -> anyhow::Result<AnalysisResult> {
            Err(AlphaError::InsufficientData("no traders".to_string()).into())
        }

        fn vote(&self, _result: &AnalysisResult) -> Vote {
            Vote::Alpha
        }
    }

    struct PanickingAnalyzer;

    #[async_trait]
    impl Analyzer for PanickingAnalyzer {
        fn name(&self) -> &str {
            "Panicking"
        }

        fn weight(&self) -> f64 {
            1.0
        }

        async fn analyze(&self, _request: &AnalysisRequest) -> anyhow::Result<AnalysisResult> {
            panic!("boom");
        }

        fn vote(&self, _result: &AnalysisResult) -> Vote {
            Vote::Alpha
        }
    }

    fn fixed(name: &'static str, weight: f64, vote: Vote, confidence: f64) -> Arc<dyn Analyzer> {
        Arc::new(StaticAnalyzer {
            name,
            weight,
            vote,
            confidence,
        })
    }

    fn report(weight: f64, vote: Vote, confidence: f64) -> AnalyzerReport {
        AnalyzerReport::completed("A", weight, vote, String::new(), AnalysisResult::new(confidence))
    }

    fn request() -> Arc<AnalysisRequest> {
        Arc::new(AnalysisRequest::new(MarketSnapshot::new("m-1"), Vec::new()))
    }

    #[tokio::test]
    async fn test_unanimous_alpha() {
        let engine = ConsensusEngine::new(0.6)
            .with_analyzer(fixed("Portfolio", 1.2, Vote::Alpha, 0.9))
            .with_analyzer(fixed("Success", 1.3, Vote::Alpha, 0.9));

        let outcome = engine.conduct_vote(request()).await;

        assert_eq!(outcome.consensus, Vote::Alpha);
        assert!((outcome.confidence - 0.9).abs() < 1e-12);
        assert!((outcome.total_weight - 2.5).abs() < 1e-12);
        assert_eq!(outcome.vote_counts.alpha, 2);
        assert_eq!(outcome.reasoning_summary, "ALPHA DETECTED: 2/2 analyzers voted for alpha");
    }

    #[tokio::test]
    async fn test_split_vote_abstains() {
        let engine = ConsensusEngine::new(0.6)
            .with_analyzer(fixed("Portfolio", 1.2, Vote::Alpha, 0.9))
            .with_analyzer(fixed("Success", 1.3, Vote::NoAlpha, 0.8));

        let outcome = engine.conduct_vote(request()).await;

        assert_eq!(outcome.consensus, Vote::Abstain);
        // alpha 1.08 / 2.5, no_alpha 1.04 / 2.5
        assert!((outcome.weighted_scores.alpha - 0.432).abs() < 1e-12);
        assert!((outcome.weighted_scores.no_alpha - 0.416).abs() < 1e-12);
        assert!((outcome.confidence - 0.568).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_all_failures_abstain_with_zero_confidence() {
        let engine = ConsensusEngine::new(0.6)
            .with_analyzer(Arc::new(FailingAnalyzer))
            .with_analyzer(Arc::new(PanickingAnalyzer));

        let outcome = engine.conduct_vote(request()).await;

        assert_eq!(outcome.consensus, Vote::Abstain);
        assert_eq!(outcome.confidence, 0.0);
        assert_eq!(outcome.vote_counts.failed, 2);
        assert_eq!(outcome.weighted_scores, WeightedScores::abstain_only());
        assert!(outcome.analyses.iter().all(|r| r.error().is_some()));
        assert!(outcome.reasoning_summary.ends_with("2 analyzer(s) failed"));
    }

    #[tokio::test]
    async fn test_panic_is_isolated() {
        let engine = ConsensusEngine::new(0.6)
            .with_analyzer(Arc::new(PanickingAnalyzer))
            .with_analyzer(fixed("Steady", 1.0, Vote::Alpha, 1.0));

        let outcome = engine.conduct_vote(request()).await;

        assert_eq!(outcome.consensus, Vote::Alpha);
        assert_eq!(outcome.confidence, 1.0);
        assert_eq!(outcome.analyses[0].analyzer_name, "Panicking");
        assert_eq!(outcome.analyses[0].error(), Some("panicked: boom"));
        assert_eq!(outcome.analyses[0].effective_weight, 0.0);
        assert!(outcome.analyses[1].succeeded);
    }

    #[tokio::test]
    async fn test_insufficient_data_failure_is_recorded() {
        let engine = ConsensusEngine::new(0.6).with_analyzer(Arc::new(FailingAnalyzer));
        let outcome = engine.conduct_vote(request()).await;

        let error = outcome.analyses[0].error().unwrap();
        assert!(error.contains("Insufficient data"));
        assert!(outcome.analyses[0].reasoning.starts_with("Analysis failed"));
    }

    #[tokio::test]
    async fn test_empty_engine_abstains() {
        let engine = ConsensusEngine::new(0.6);
        let outcome = engine.conduct_vote(request()).await;

        assert_eq!(outcome.consensus, Vote::Abstain);
        assert_eq!(outcome.confidence, 0.0);
        assert!(outcome.analyses.is_empty());
    }

    #[test]
    fn test_alpha_wins_ties() {
        let outcome = calculate_consensus(
            vec![report(1.0, Vote::Alpha, 1.0), report(1.0, Vote::NoAlpha, 1.0)],
            0.5,
        );
        assert_eq!(outcome.consensus, Vote::Alpha);
        assert_eq!(outcome.confidence, 0.5);
    }

    #[test]
    fn test_threshold_decides_alpha() {
        let threshold = 0.6;
        for alpha_conf in [0.0, 0.2, 0.5, 0.7, 0.9, 1.0] {
            for other_conf in [0.0, 0.3, 0.6, 1.0] {
                for other_vote in [Vote::NoAlpha, Vote::Abstain] {
                    let outcome = calculate_consensus(
                        vec![
                            report(1.2, Vote::Alpha, alpha_conf),
                            report(1.3, other_vote, other_conf),
                        ],
                        threshold,
                    );

                    let scores = outcome.weighted_scores;
                    assert!((scores.total() - 1.0).abs() < 1e-9);
                    assert!((0.0..=1.0).contains(&outcome.confidence));
                    assert_eq!(outcome.consensus == Vote::Alpha, scores.alpha >= threshold);
                }
            }
        }
    }

    #[test]
    fn test_threshold_decides_no_alpha() {
        let votes = [Vote::Alpha, Vote::NoAlpha, Vote::Abstain];
        let mut saw_no_alpha = false;

        for threshold in [0.3, 0.5, 0.6, 0.8] {
            for first in votes {
                for second in votes {
                    for confidence in [0.2, 0.6, 1.0] {
                        let outcome = calculate_consensus(
                            vec![
                                report(1.0, first, confidence),
                                report(1.5, second, 1.0),
                                report(0.5, Vote::NoAlpha, confidence),
                            ],
                            threshold,
                        );

                        let scores = outcome.weighted_scores;
                        let no_alpha_wins = scores.no_alpha >= threshold && scores.alpha < threshold;
                        assert_eq!(outcome.consensus == Vote::NoAlpha, no_alpha_wins);
                        if no_alpha_wins {
                            assert_eq!(outcome.confidence, scores.no_alpha);
                            saw_no_alpha = true;
                        }
                    }
                }
            }
        }

        assert!(saw_no_alpha);
    }

    #[test]
    fn test_abstain_votes_count_toward_total_weight() {
        let outcome = calculate_consensus(
            vec![report(1.0, Vote::Alpha, 1.0), report(1.0, Vote::Abstain, 1.0)],
            0.6,
        );
        assert_eq!(outcome.weighted_scores.alpha, 0.5);
        assert_eq!(outcome.weighted_scores.abstain, 0.5);
        assert_eq!(outcome.consensus, Vote::Abstain);
    }

    #[test]
    fn test_registration_replaces_duplicates() {
        let mut engine = ConsensusEngine::new(0.6);
        engine.register(fixed("Portfolio", 1.2, Vote::Alpha, 0.5));
        engine.register(fixed("Success", 1.3, Vote::Alpha, 0.5));
        engine.register(fixed("Portfolio", 2.0, Vote::NoAlpha, 0.5));

        assert_eq!(engine.registered_analyzers(), vec!["Portfolio", "Success"]);

        let summary = engine.summary();
        assert_eq!(summary.analyzers[0].weight, 2.0);
        assert!((summary.total_weight - 3.3).abs() < 1e-12);
        assert_eq!(summary.threshold, 0.6);
    }

    #[test]
    fn test_round_fills_missing_reports() {
        let mut round = VotingRound::new(
            0.6,
            vec![("First".to_string(), 1.0), ("Second".to_string(), 1.0)],
        );
        round.record(1, report(1.0, Vote::Alpha, 1.0));

        assert!(!round.is_complete());
        assert_eq!(round.pending(), 1);

        let outcome = round.resolve();
        assert_eq!(outcome.vote_counts.failed, 1);
        assert_eq!(outcome.analyses[0].analyzer_name, "First");
        assert_eq!(outcome.analyses[0].error(), Some("analyzer did not report"));
        assert_eq!(outcome.consensus, Vote::Alpha);
    }

    #[test]
    fn test_round_ignores_duplicate_reports() {
        let mut round = VotingRound::new(0.6, vec![("Only".to_string(), 1.0)]);
        round.record(0, report(1.0, Vote::NoAlpha, 1.0));
        round.record(0, report(1.0, Vote::Alpha, 1.0));

        assert!(round.is_complete());
        assert_eq!(round.resolve().consensus, Vote::NoAlpha);
    }
}

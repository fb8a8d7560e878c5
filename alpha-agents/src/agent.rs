//! Analyzer trait and the request/result types it works on
//!
//! Every analyzer implements [`Analyzer`] and is registered with the voting
//! engine together with a fixed weight.

use async_trait::async_trait;
use common::{MarketSnapshot, TraderRecord, Vote};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Normalized input for one decision cycle, shared read-only by all analyzers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub market: MarketSnapshot,
    pub traders: Vec<TraderRecord>,
}

impl AnalysisRequest {
    pub fn new(market: MarketSnapshot, traders: Vec<TraderRecord>) -> Self {
        Self { market, traders }
    }
}

/// What a single analyzer found
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Analyzer-specific evidence; opaque to the engine
    pub evidence: Map<String, Value>,
    /// 0.0 to 1.0
    pub confidence: f64,
    /// Addresses this analyzer considers noteworthy
    pub flagged_traders: Vec<String>,
    pub key_findings: Vec<String>,
}

impl AnalysisResult {
    pub fn new(confidence: f64) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };

        Self {
            evidence: Map::new(),
            confidence,
            flagged_traders: Vec::new(),
            key_findings: Vec::new(),
        }
    }

    pub fn with_evidence(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.evidence.insert(key.to_string(), value.into());
        self
    }

    pub fn evidence_f64(&self, key: &str) -> f64 {
        self.evidence.get(key).and_then(Value::as_f64).unwrap_or(0.0)
    }

    pub fn evidence_count(&self, key: &str) -> usize {
        self.evidence.get(key).and_then(Value::as_u64).unwrap_or(0) as usize
    }
}

/// Base trait that all analyzers implement.
///
/// Implementations must not keep state between calls: `name` and `weight`
/// are fixed configuration and everything else is derived from the request.
#[async_trait]
pub trait Analyzer: Send + Sync {
    fn name(&self) -> &str;

    /// Voting weight, fixed for the analyzer's lifetime
    fn weight(&self) -> f64;

    /// Analyze one request. Errors are recorded by the engine as zero-weight
    /// evidence rather than aborting the cycle.
    async fn analyze(&self, request: &AnalysisRequest) -> anyhow::Result<AnalysisResult>;

    /// Derive a vote from a result produced by this analyzer
    fn vote(&self, result: &AnalysisResult) -> Vote;

    /// Human-readable explanation of a result
    fn reasoning(&self, result: &AnalysisResult) -> String {
        format!("{} analysis completed with confidence {:.2}", self.name(), result.confidence)
    }
}

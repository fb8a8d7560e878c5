//! Votes and the final alpha verdict

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Categorical vote cast by an analyzer, and the consensus outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vote {
    Alpha,
    NoAlpha,
    Abstain,
}

impl Vote {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vote::Alpha => "alpha",
            Vote::NoAlpha => "no_alpha",
            Vote::Abstain => "abstain",
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative strength of a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Weak,
    Moderate,
    Strong,
}

impl Strength {
    /// Fixed breakpoints: >= 0.8 strong, >= 0.6 moderate, else weak
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.8 {
            Strength::Strong
        } else if confidence >= 0.6 {
            Strength::Moderate
        } else {
            Strength::Weak
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictStatus {
    Complete,
    /// No valid trader survived normalization; consensus is forced to abstain
    InsufficientData,
}

/// Share of total analyzer weight behind each outcome; the three sum to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedScores {
    pub alpha: f64,
    pub no_alpha: f64,
    pub abstain: f64,
}

impl WeightedScores {
    /// All mass on abstain, used when no analyzer produced a result
    pub fn abstain_only() -> Self {
        Self {
            alpha: 0.0,
            no_alpha: 0.0,
            abstain: 1.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.alpha + self.no_alpha + self.abstain
    }
}

/// Raw (unweighted) vote counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCounts {
    pub alpha: usize,
    pub no_alpha: usize,
    pub abstain: usize,
    /// Analyzers that failed and were excluded from the tally
    pub failed: usize,
}

impl VoteCounts {
    pub fn record(&mut self, vote: Vote) {
        match vote {
            Vote::Alpha => self.alpha += 1,
            Vote::NoAlpha => self.no_alpha += 1,
            Vote::Abstain => self.abstain += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.alpha + self.no_alpha + self.abstain + self.failed
    }
}

/// Consensus details carried on the verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusSummary {
    pub vote: Vote,
    pub weighted_scores: WeightedScores,
    pub vote_counts: VoteCounts,
    pub threshold: f64,
}

/// One analyzer's contribution as reported to API consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentAnalysis {
    pub agent_name: String,
    pub vote: Vote,
    pub confidence: f64,
    pub reasoning: String,
    pub key_findings: Vec<String>,
}

/// Final decision for one market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlphaVerdict {
    pub market_id: String,
    pub has_alpha: bool,
    pub confidence_score: f64,
    pub recommended_side: Option<String>,
    pub strength: Strength,
    pub status: VerdictStatus,
    pub consensus: ConsensusSummary,
    pub agent_analyses: Vec<AgentAnalysis>,
    pub key_traders: Vec<String>,
    pub risk_factors: Vec<String>,
    pub analysis_timestamp: DateTime<Utc>,
}

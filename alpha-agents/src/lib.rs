//! Alpha Agents - weighted multi-analyzer alpha detection
//!
//! This crate decides whether a prediction market shows a trading edge.
//! It includes:
//! - Base Analyzer trait for implementing specialist analyzers
//! - Portfolio and Success Rate analyzers
//! - Consensus engine that runs analyzers concurrently and resolves a weighted vote
//! - Coordinator that normalizes input, runs a timed cycle and assembles the verdict

pub mod agent;
pub mod config;
pub mod coordinator;
pub mod normalize;
pub mod portfolio;
pub mod risk;
pub mod success_rate;
pub mod voting;

// Re-export commonly used types
pub use agent::{AnalysisRequest, AnalysisResult, Analyzer};
pub use config::{AlphaConfig, TraderFilters};
pub use coordinator::AlphaCoordinator;
pub use normalize::{normalize_market, normalize_trader, normalize_traders, screen_traders};
pub use portfolio::{HighConvictionTrader, PortfolioAnalyzer, PortfolioAnalyzerConfig};
pub use risk::{recommended_side, RiskAssessor};
pub use success_rate::{SuccessRateAnalyzer, SuccessRateAnalyzerConfig, TrackRecord};
pub use voting::{
    calculate_consensus, AnalyzerReport, ConsensusEngine, ConsensusOutcome, EngineSummary,
    RegisteredAnalyzer, VotingRound,
};

// Re-export common types for convenience
pub use common::{AlphaError, AlphaResult, AlphaVerdict, MarketData, TraderData, Vote};

//! Shared types for the alpha detection workspace
//!
//! Market snapshots, trader records, votes and the final verdict live here so
//! that the statistics, analyzer and CLI crates agree on a single model.

pub mod error;
pub mod market;
pub mod trader;
pub mod verdict;

pub use error::{AlphaError, AlphaResult};
pub use market::{MarketData, MarketSnapshot};
pub use trader::{Position, PositionData, TraderData, TraderRecord};
pub use verdict::{
    AgentAnalysis, AlphaVerdict, ConsensusSummary, Strength, VerdictStatus, Vote, VoteCounts,
    WeightedScores,
};

// Re-export for downstream crates
pub use chrono::{DateTime, Utc};

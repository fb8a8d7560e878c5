//! Risk annotations and side recommendation for a verdict

use crate::config::AlphaConfig;
use crate::voting::ConsensusOutcome;
use chrono::Duration;
use common::{DateTime, MarketSnapshot, TraderRecord, Utc, Vote};
use std::collections::BTreeMap;

const IMMINENT_RESOLUTION_HOURS: i64 = 24;
const DISTANT_RESOLUTION_DAYS: i64 = 180;
const LIMITED_SAMPLE_SIZE: usize = 5;
const MIXED_TRACK_RECORD_SPREAD: f64 = 0.4;

/// One side must outweigh the other by this factor to be recommended
const SIDE_BIAS_FACTOR: f64 = 1.2;

/// Tags deterministic risk factors onto a resolved cycle
#[derive(Debug, Clone)]
pub struct RiskAssessor {
    low_liquidity_threshold: f64,
    low_confidence_threshold: f64,
    category_risk: BTreeMap<String, String>,
}

impl RiskAssessor {
    pub fn from_config(config: &AlphaConfig) -> Self {
        Self {
            low_liquidity_threshold: config.low_liquidity_threshold,
            low_confidence_threshold: config.low_confidence_threshold,
            category_risk: config
                .category_risk
                .iter()
                .map(|(category, tag)| (category.to_lowercase(), tag.clone()))
                .collect(),
        }
    }

    pub fn assess(
        &self,
        market: &MarketSnapshot,
        traders: &[TraderRecord],
        outcome: &ConsensusOutcome,
        as_of: DateTime<Utc>,
    ) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        let mut push = |tag: &str| {
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        };

        if traders.is_empty() {
            push("insufficient_data");
        }
        if outcome.has_failures() {
            push("analyzer_failure");
        }

        if outcome.consensus == Vote::Abstain {
            push("no_consensus");
        }
        if outcome.confidence < self.low_confidence_threshold {
            push("low_consensus_confidence");
        }
        if outcome.vote_counts.abstain > outcome.vote_counts.alpha {
            push("high_abstention");
        }

        if let Some(tag) = market
            .category
            .as_deref()
            .and_then(|c| self.category_risk.get(&c.to_lowercase()))
        {
            push(tag.as_str());
        }

        push(resolution_tag(market, as_of));

        if market.total_liquidity < self.low_liquidity_threshold {
            push("low_liquidity");
        }
        if !traders.is_empty() && traders.len() < LIMITED_SAMPLE_SIZE {
            push("limited_trader_sample");
        }
        if success_rate_spread(traders) > MIXED_TRACK_RECORD_SPREAD {
            push("mixed_track_records");
        }

        tags
    }
}

fn resolution_tag(market: &MarketSnapshot, as_of: DateTime<Utc>) -> &'static str {
    match market.time_to_resolution(as_of) {
        None => "unknown_resolution_date",
        Some(left) if left <= Duration::zero() => "resolution_date_passed",
        Some(left) if left < Duration::hours(IMMINENT_RESOLUTION_HOURS) => "imminent_resolution",
        Some(left) if left > Duration::days(DISTANT_RESOLUTION_DAYS) => "distant_resolution",
        Some(_) => "resolution_timing",
    }
}

fn success_rate_spread(traders: &[TraderRecord]) -> f64 {
    let rates = traders.iter().filter_map(|t| t.success_rate);
    let (min, max) = rates.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| (lo.min(r), hi.max(r)));
    if max >= min {
        max - min
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Yes,
    No,
}

fn classify_outcome(outcome_id: &str) -> Option<Side> {
    let outcome = outcome_id.trim().to_lowercase();
    if outcome.contains("yes") || outcome == "1" {
        Some(Side::Yes)
    } else if outcome.contains("no") || outcome == "0" {
        Some(Side::No)
    } else {
        None
    }
}

/// Side favoured by the traders' target-market positions, weighting each
/// position by its share of the holder's portfolio
pub fn recommended_side(traders: &[TraderRecord], market_id: &str) -> Option<String> {
    let mut yes_weight = 0.0;
    let mut no_weight = 0.0;

    for trader in traders {
        let portfolio = trader.total_portfolio_value.max(1.0);
        for position in trader.positions_in(market_id) {
            let weight = position.position_size / portfolio;
            match position.outcome_id.as_deref().and_then(classify_outcome) {
                Some(Side::Yes) => yes_weight += weight,
                Some(Side::No) => no_weight += weight,
                None => {}
            }
        }
    }

    if yes_weight > no_weight * SIDE_BIAS_FACTOR {
        Some("Yes".to_string())
    } else if no_weight > yes_weight * SIDE_BIAS_FACTOR {
        Some("No".to_string())
    } else {
        None
    }
}

//! Trader and position types

use serde::{Deserialize, Serialize};

/// Raw position payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionData {
    #[serde(default)]
    pub market_id: Option<String>,
    #[serde(default)]
    pub outcome_id: Option<String>,
    #[serde(default)]
    pub position_size_usd: Option<f64>,
    #[serde(default)]
    pub entry_price: Option<f64>,
    #[serde(default)]
    pub current_value_usd: Option<f64>,
}

/// Raw trader payload as delivered by the on-chain/off-chain data collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TraderData {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub total_portfolio_value_usd: Option<f64>,
    #[serde(default)]
    pub positions: Vec<PositionData>,
    #[serde(default)]
    pub overall_success_rate: Option<f64>,
    #[serde(default)]
    pub total_markets_traded: Option<u32>,
    #[serde(default)]
    pub markets_resolved: Option<u32>,
}

/// A validated position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub market_id: String,
    pub outcome_id: Option<String>,
    /// Position size in USD, never negative
    pub position_size: f64,
    /// Entry price in [0, 1]
    pub entry_price: f64,
    pub current_value: f64,
}

impl Position {
    pub fn new(market_id: impl Into<String>, position_size: f64, entry_price: f64) -> Self {
        Self {
            market_id: market_id.into(),
            outcome_id: None,
            position_size,
            entry_price,
            current_value: position_size,
        }
    }

    pub fn with_outcome(mut self, outcome_id: impl Into<String>) -> Self {
        self.outcome_id = Some(outcome_id.into());
        self
    }

    pub fn with_current_value(mut self, current_value: f64) -> Self {
        self.current_value = current_value;
        self
    }

    /// Unrealized return relative to the amount put in
    pub fn unrealized_return(&self) -> Option<f64> {
        if self.position_size > 0.0 {
            Some((self.current_value - self.position_size) / self.position_size)
        } else {
            None
        }
    }
}

/// A validated trader record, supplied fresh for every request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraderRecord {
    pub address: String,
    /// Total portfolio value in USD, never negative
    pub total_portfolio_value: f64,
    pub positions: Vec<Position>,
    /// Observed success rate in [0, 1], absent when the trader has no record
    pub success_rate: Option<f64>,
    pub total_markets_traded: u32,
    pub markets_resolved: u32,
}

impl TraderRecord {
    pub fn new(address: impl Into<String>, total_portfolio_value: f64) -> Self {
        Self {
            address: address.into(),
            total_portfolio_value,
            positions: Vec::new(),
            success_rate: None,
            total_markets_traded: 0,
            markets_resolved: 0,
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.positions.push(position);
        self
    }

    pub fn with_track_record(mut self, success_rate: f64, markets_resolved: u32) -> Self {
        self.success_rate = Some(success_rate);
        self.markets_resolved = markets_resolved;
        self.total_markets_traded = self.total_markets_traded.max(markets_resolved);
        self
    }

    /// Winning markets implied by the success rate
    pub fn wins(&self) -> u32 {
        self.success_rate
            .map(|rate| (rate * self.markets_resolved as f64).round() as u32)
            .unwrap_or(0)
    }

    /// Positions held in the given market
    pub fn positions_in<'a>(&'a self, market_id: &'a str) -> impl Iterator<Item = &'a Position> + 'a {
        self.positions.iter().filter(move |p| p.market_id == market_id)
    }

    /// Total USD committed to the given market
    pub fn exposure_to(&self, market_id: &str) -> f64 {
        self.positions_in(market_id).map(|p| p.position_size).sum()
    }

    /// Share of the portfolio committed to the given market.
    ///
    /// `None` when the portfolio is empty or the trader holds nothing there.
    pub fn allocation_ratio(&self, market_id: &str) -> Option<f64> {
        if self.total_portfolio_value <= 0.0 {
            return None;
        }
        if self.positions_in(market_id).next().is_none() {
            return None;
        }
        Some(self.exposure_to(market_id) / self.total_portfolio_value)
    }

    /// Unrealized returns across all positions with a non-zero size
    pub fn position_returns(&self) -> Vec<f64> {
        self.positions.iter().filter_map(Position::unrealized_return).collect()
    }
}

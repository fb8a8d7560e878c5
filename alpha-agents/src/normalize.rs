//! Input normalization and trader pre-screening
//!
//! Raw payloads are defaulted where possible and excluded where not. Only a
//! market without an id is a hard error; everything else is logged and
//! recovered.

use crate::config::TraderFilters;
use common::{
    AlphaError, AlphaResult, DateTime, MarketData, MarketSnapshot, Position, PositionData,
    TraderData, TraderRecord, Utc,
};
use std::collections::HashSet;
use tracing::{debug, warn};

fn non_negative_or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validate a market payload into a snapshot
pub fn normalize_market(data: MarketData) -> AlphaResult<MarketSnapshot> {
    let id = non_empty(data.id)
        .ok_or_else(|| AlphaError::InputValidation("market id is required".to_string()))?;

    for (field, value) in [("total_volume", data.total_volume), ("total_liquidity", data.total_liquidity)] {
        if matches!(value, Some(v) if !(v.is_finite() && v >= 0.0)) {
            warn!(market_id = %id, field, "Invalid market amount, defaulting to 0");
        }
    }

    let end_date = match non_empty(data.end_date) {
        Some(raw) => match DateTime::parse_from_rfc3339(&raw) {
            Ok(parsed) => Some(parsed.with_timezone(&Utc)),
            Err(e) => {
                warn!(market_id = %id, end_date = %raw, error = %e, "Unparseable end date ignored");
                None
            }
        },
        None => None,
    };

    Ok(MarketSnapshot {
        title: data.title.unwrap_or_default(),
        category: non_empty(data.category),
        status: non_empty(data.status).unwrap_or_else(|| "active".to_string()),
        total_volume: non_negative_or_zero(data.total_volume),
        total_liquidity: non_negative_or_zero(data.total_liquidity),
        end_date,
        id,
    })
}

fn normalize_position(address: &str, data: PositionData) -> Option<Position> {
    let Some(market_id) = non_empty(data.market_id) else {
        warn!(trader = %address, "Position without market id dropped");
        return None;
    };

    let position_size = match data.position_size_usd {
        Some(size) if size.is_finite() && size >= 0.0 => size,
        Some(size) => {
            warn!(trader = %address, market_id = %market_id, size, "Position with invalid size dropped");
            return None;
        }
        None => 0.0,
    };

    let entry_price = match data.entry_price {
        Some(price) if price.is_finite() => price.clamp(0.0, 1.0),
        _ => 0.0,
    };

    let current_value = match data.current_value_usd {
        Some(value) if value.is_finite() => value.max(0.0),
        _ => position_size,
    };

    Some(Position {
        market_id,
        outcome_id: non_empty(data.outcome_id),
        position_size,
        entry_price,
        current_value,
    })
}

/// Validate one trader payload. Returns `None` when the record cannot be used.
pub fn normalize_trader(data: TraderData) -> Option<TraderRecord> {
    let Some(address) = non_empty(data.address) else {
        warn!("Trader without address excluded");
        return None;
    };

    let total_portfolio_value = match data.total_portfolio_value_usd {
        Some(value) if value.is_finite() && value >= 0.0 => value,
        Some(value) => {
            warn!(trader = %address, value, "Trader with invalid portfolio value excluded");
            return None;
        }
        None => 0.0,
    };

    let success_rate = match data.overall_success_rate {
        Some(rate) if rate.is_finite() && (0.0..=1.0).contains(&rate) => Some(rate),
        Some(rate) => {
            warn!(trader = %address, rate, "Success rate outside [0, 1] ignored");
            None
        }
        None => None,
    };

    let positions = data
        .positions
        .into_iter()
        .filter_map(|p| normalize_position(&address, p))
        .collect();

    let markets_resolved = data.markets_resolved.unwrap_or(0);
    let total_markets_traded = data.total_markets_traded.unwrap_or(0).max(markets_resolved);

    Some(TraderRecord {
        address,
        total_portfolio_value,
        positions,
        success_rate,
        total_markets_traded,
        markets_resolved,
    })
}

/// Validate a trader list. Later duplicates of an address are dropped.
pub fn normalize_traders(data: Vec<TraderData>) -> Vec<TraderRecord> {
    let mut seen = HashSet::new();
    let mut traders = Vec::with_capacity(data.len());

    for trader in data.into_iter().filter_map(normalize_trader) {
        if seen.insert(trader.address.clone()) {
            traders.push(trader);
        } else {
            warn!(trader = %trader.address, "Duplicate trader record dropped");
        }
    }

    traders
}

impl TraderFilters {
    /// Portfolio floor, then either conviction in the market or a proven record
    pub fn admits(&self, trader: &TraderRecord, market_id: &str) -> bool {
        if trader.total_portfolio_value < self.min_portfolio_value {
            return false;
        }

        let conviction = trader
            .allocation_ratio(market_id)
            .map_or(false, |ratio| ratio >= self.min_portfolio_ratio);

        let track_record = trader.markets_resolved >= self.min_trade_history
            && trader
                .success_rate
                .map_or(false, |rate| rate >= self.min_success_rate);

        conviction || track_record
    }
}

/// Apply the pre-screen, keeping input order
pub fn screen_traders(traders: Vec<TraderRecord>, market_id: &str, filters: &TraderFilters) -> Vec<TraderRecord> {
    let before = traders.len();
    let screened: Vec<TraderRecord> = traders
        .into_iter()
        .filter(|t| filters.admits(t, market_id))
        .collect();

    debug!(
        market_id,
        before,
        after = screened.len(),
        "Trader pre-screen applied"
    );

    screened
}

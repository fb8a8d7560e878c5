//! Market snapshot types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw market payload as delivered by the market-data collaborator.
///
/// Every field is optional; normalization turns this into a [`MarketSnapshot`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub total_liquidity: Option<f64>,
    /// RFC 3339 timestamp; unparseable values are dropped during normalization
    #[serde(default)]
    pub end_date: Option<String>,
}

/// Validated market state for one decision cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub id: String,
    pub title: String,
    pub category: Option<String>,
    pub status: String,
    pub total_volume: f64,
    pub total_liquidity: f64,
    pub end_date: Option<DateTime<Utc>>,
}

impl MarketSnapshot {
    /// Minimal snapshot, mostly useful for tests and demos
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            category: None,
            status: "active".to_string(),
            total_volume: 0.0,
            total_liquidity: 0.0,
            end_date: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_liquidity(mut self, total_liquidity: f64) -> Self {
        self.total_liquidity = total_liquidity;
        self
    }

    pub fn with_end_date(mut self, end_date: DateTime<Utc>) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Time left until resolution, negative once the end date has passed
    pub fn time_to_resolution(&self, as_of: DateTime<Utc>) -> Option<chrono::Duration> {
        self.end_date.map(|end| end - as_of)
    }
}

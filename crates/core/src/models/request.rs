use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::timeframe::Timeframe;

/// Body of `POST /api/backtest`: what the configuration form collects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRequest {
    /// Ticker to backtest (e.g., "AAPL")
    pub symbol: String,

    /// Strategy id from the strategies catalog
    pub strategy: String,

    /// First day of the backtest (serialized as `YYYY-MM-DD`)
    pub start_date: NaiveDate,

    /// Last day of the backtest (serialized as `YYYY-MM-DD`)
    pub end_date: NaiveDate,

    /// Starting cash
    pub initial_capital: f64,

    pub timeframe: Timeframe,

    /// Strategy parameters; values keep whatever JSON type the strategy declares
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

impl BacktestRequest {
    pub fn new(symbol: impl Into<String>, strategy: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            strategy: strategy.into(),
            ..Self::default()
        }
    }

    /// Length of the requested range in days.
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

impl Default for BacktestRequest {
    fn default() -> Self {
        Self {
            symbol: "AAPL".to_string(),
            strategy: "moving_average_crossover".to_string(),
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
            initial_capital: 10_000.0,
            timeframe: Timeframe::OneDay,
            parameters: BTreeMap::new(),
        }
    }
}

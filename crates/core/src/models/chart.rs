use serde::{Deserialize, Serialize};

use super::trade::{AlignedTrade, TradeEvent};

/// A single point of the equity line in the results summary.
///
/// Built by `ChartService`; the frontend only renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityChartPoint {
    pub date: String,
    pub value: f64,
    /// Period return in percent (fraction × 100)
    pub returns_pct: f64,
}

/// Equity line with trade markers overlaid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquityChart {
    pub points: Vec<EquityChartPoint>,
    pub markers: Vec<AlignedTrade>,
}

/// One bar of the price area chart, with optional signal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceChartPoint {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    /// Marker height when a BUY resolved to this bar
    pub buy_signal: Option<f64>,
    /// Marker height when a SELL resolved to this bar
    pub sell_signal: Option<f64>,
}

impl PriceChartPoint {
    pub fn has_signal(&self) -> bool {
        self.buy_signal.is_some() || self.sell_signal.is_some()
    }
}

/// Price area chart with entry/exit scatter series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceChart {
    pub bars: Vec<PriceChartPoint>,
    pub buy_markers: Vec<AlignedTrade>,
    pub sell_markers: Vec<AlignedTrade>,
    /// True when `bars` were derived from equity returns, not real prices
    pub synthesized: bool,
}

/// One month cell of the returns heatmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    /// 0 = January
    pub month_index: u32,
    /// Percent; `None` when the month has no data
    pub return_pct: Option<f64>,
    /// Color strength in `0.0..=1.0`
    pub intensity: f64,
    pub opacity: f64,
}

impl HeatmapCell {
    pub fn is_positive(&self) -> bool {
        self.return_pct.is_some_and(|r| r > 0.0)
    }
}

/// One heatmap row: twelve cells for a calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatmapYear {
    pub year: i32,
    pub cells: Vec<HeatmapCell>,
}

/// Counts and the most recent trades for the trade list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub buy_count: usize,
    pub sell_count: usize,
    pub total: usize,
    /// Newest first
    pub recent: Vec<TradeEvent>,
}

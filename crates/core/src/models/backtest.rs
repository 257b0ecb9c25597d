use serde::{Deserialize, Serialize};

use super::series::TimeSeries;
use super::timeframe::{Timeframe, Tolerance};
use super::trade::TradeEvent;

/// One sample of the portfolio value over the backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: String,
    pub value: f64,
    /// Period return as a fraction (0.01 = 1%)
    #[serde(default)]
    pub returns: Option<f64>,
}

/// One OHLCV bar of the traded instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

/// Return of one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturn {
    /// `YYYY-MM`
    pub month: String,
    /// Percent, already scaled (2.5 = +2.5%)
    #[serde(rename = "return")]
    pub return_pct: f64,
}

/// The backtesting API's response to `POST /api/backtest`.
///
/// Consumed verbatim: the backend owns this format, so every metric is
/// optional and unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BacktestResult {
    #[serde(default)]
    pub equity_curve: Vec<EquityPoint>,

    /// Raw bars; absent for some strategies/backends
    #[serde(default)]
    pub price_data: Option<Vec<PriceBar>>,

    #[serde(default)]
    pub trades: Vec<TradeEvent>,

    #[serde(default)]
    pub monthly_returns: Vec<MonthlyReturn>,

    // ── Identification ──────────────────────────────────────────────
    #[serde(default)]
    pub strategy_name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub timeframe: Option<String>,

    // ── Summary metrics ─────────────────────────────────────────────
    #[serde(default)]
    pub total_return: Option<f64>,
    #[serde(default)]
    pub total_return_pct: Option<f64>,
    #[serde(default)]
    pub sharpe_ratio: Option<f64>,
    #[serde(default)]
    pub sortino_ratio: Option<f64>,
    #[serde(default)]
    pub calmar_ratio: Option<f64>,
    /// Percent, positive magnitude
    #[serde(default)]
    pub max_drawdown: Option<f64>,
    /// Percent of profitable trades
    #[serde(default)]
    pub win_rate: Option<f64>,
    #[serde(default)]
    pub profit_factor: Option<f64>,
    /// 5% value-at-risk, as a fraction
    #[serde(default)]
    pub var_5: Option<f64>,
    /// 5% conditional value-at-risk, as a fraction
    #[serde(default)]
    pub cvar_5: Option<f64>,
    #[serde(default)]
    pub initial_capital: Option<f64>,
    #[serde(default)]
    pub final_capital: Option<f64>,
    #[serde(default)]
    pub total_trades: Option<u64>,
}

impl BacktestResult {
    /// Parsed timeframe; `None` when absent or not a known id.
    pub fn parsed_timeframe(&self) -> Option<Timeframe> {
        self.timeframe.as_deref().and_then(Timeframe::parse)
    }

    /// Alignment tolerance recommended for this result's sampling;
    /// unknown timeframes are treated as daily.
    pub fn recommended_tolerance(&self) -> Tolerance {
        Tolerance::for_timeframe(self.parsed_timeframe().unwrap_or_default())
    }

    /// Equity curve with dates normalised, ready for alignment.
    pub fn equity_timeseries(&self) -> TimeSeries {
        self.equity_curve
            .iter()
            .map(|p| (p.date.as_str(), p.value))
            .collect()
    }

    /// Raw price bars, treating an empty list like a missing one.
    pub fn price_bars(&self) -> Option<&[PriceBar]> {
        self.price_data.as_deref().filter(|bars| !bars.is_empty())
    }

    pub fn has_results(&self) -> bool {
        !self.equity_curve.is_empty()
    }
}

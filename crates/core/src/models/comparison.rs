use serde::{Deserialize, Serialize};

/// Headline metrics of one run, flattened for side-by-side charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub strategy: String,
    pub total_return_pct: f64,
    pub sharpe_ratio: f64,
    /// Positive magnitude
    pub max_drawdown_pct: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
}

/// Metric used to rank comparison rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonMetric {
    TotalReturn,
    SharpeRatio,
    MaxDrawdown,
    WinRate,
    ProfitFactor,
}

impl ComparisonMetric {
    pub fn value_of(&self, row: &ComparisonRow) -> f64 {
        match self {
            ComparisonMetric::TotalReturn => row.total_return_pct,
            ComparisonMetric::SharpeRatio => row.sharpe_ratio,
            ComparisonMetric::MaxDrawdown => row.max_drawdown_pct,
            ComparisonMetric::WinRate => row.win_rate,
            ComparisonMetric::ProfitFactor => row.profit_factor,
        }
    }

    /// Drawdown is the only metric where smaller wins.
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, ComparisonMetric::MaxDrawdown)
    }
}

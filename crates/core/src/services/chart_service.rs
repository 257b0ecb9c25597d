use std::collections::{BTreeMap, HashMap};

use crate::models::backtest::{BacktestResult, EquityPoint, MonthlyReturn, PriceBar};
use crate::models::chart::{
    EquityChart, EquityChartPoint, HeatmapCell, HeatmapYear, PriceChart, PriceChartPoint,
    TradeSummary,
};
use crate::models::series::TimeSeries;
use crate::models::timeframe::Tolerance;
use crate::models::trade::{AlignedTrade, TradeAction, TradeEvent};
use crate::services::alignment_service::align;

/// Starting level of a synthesized price series.
const SYNTHETIC_BASE_PRICE: f64 = 100.0;
/// Volume reported on synthesized bars.
const SYNTHETIC_VOLUME: f64 = 1_000_000.0;
/// Absolute monthly return (percent) that maps to full heatmap intensity.
const HEATMAP_FULL_INTENSITY_PCT: f64 = 10.0;

/// Generates chart-ready data sets from backtest results.
///
/// All numbers are computed here; the frontend only renders them.
/// Both trade overlays go through the same aligner, so the equity and
/// price charts place markers by identical rules.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Equity line for the results summary, with every trade anchored
    /// on the curve.
    pub fn equity_chart(&self, result: &BacktestResult, tolerance: Tolerance) -> EquityChart {
        let points = result
            .equity_curve
            .iter()
            .map(|p| EquityChartPoint {
                date: p.date.clone(),
                value: p.value,
                returns_pct: p.returns.unwrap_or(0.0) * 100.0,
            })
            .collect();

        let markers = align(&result.trades, &result.equity_timeseries(), tolerance);

        EquityChart { points, markers }
    }

    /// Price area chart with BUY/SELL scatter series.
    ///
    /// Uses `price_data` when present. Otherwise bars are synthesized from
    /// the equity curve's returns so the markers still have a line to sit on.
    pub fn price_chart(&self, result: &BacktestResult, tolerance: Tolerance) -> PriceChart {
        let (bars, synthesized) = match result.price_bars() {
            Some(bars) => (bars.to_vec(), false),
            None => {
                let bars = synthesize_price_bars(&result.equity_curve);
                let synthesized = !bars.is_empty();
                if synthesized {
                    tracing::debug!(bars = bars.len(), "no price data in result, using synthesized bars");
                }
                (bars, synthesized)
            }
        };

        let closes: TimeSeries = bars.iter().map(|b| (b.date.as_str(), b.close)).collect();
        let markers = align(&result.trades, &closes, tolerance);

        // First BUY and first SELL per resolved date; later ones stay in the
        // scatter series but do not re-label the bar.
        let mut buys: HashMap<&str, f64> = HashMap::new();
        let mut sells: HashMap<&str, f64> = HashMap::new();
        for marker in &markers {
            let index = match marker.action {
                TradeAction::Buy => &mut buys,
                TradeAction::Sell => &mut sells,
            };
            index.entry(marker.date.as_str()).or_insert(marker.anchor_value);
        }

        let chart_bars = bars
            .iter()
            .map(|bar| PriceChartPoint {
                date: bar.date.clone(),
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                buy_signal: buys.get(bar.date.as_str()).copied(),
                sell_signal: sells.get(bar.date.as_str()).copied(),
            })
            .collect();

        let (buy_markers, sell_markers): (Vec<AlignedTrade>, Vec<AlignedTrade>) = markers
            .into_iter()
            .partition(|m| m.action == TradeAction::Buy);

        PriceChart {
            bars: chart_bars,
            buy_markers,
            sell_markers,
            synthesized,
        }
    }

    /// Monthly returns grouped into one twelve-cell row per year, oldest
    /// year first. Months that cannot be parsed as `YYYY-MM` are skipped.
    pub fn monthly_heatmap(&self, monthly_returns: &[MonthlyReturn]) -> Vec<HeatmapYear> {
        let mut years: BTreeMap<i32, [Option<f64>; 12]> = BTreeMap::new();

        for entry in monthly_returns {
            let Some((year, month)) = parse_year_month(&entry.month) else {
                tracing::warn!(month = %entry.month, "skipping malformed monthly return");
                continue;
            };
            let slot = &mut years.entry(year).or_insert([None; 12])[month as usize - 1];
            if slot.is_none() {
                *slot = Some(entry.return_pct);
            }
        }

        years
            .into_iter()
            .map(|(year, months)| HeatmapYear {
                year,
                cells: months
                    .iter()
                    .enumerate()
                    .map(|(index, ret)| heatmap_cell(index as u32, *ret))
                    .collect(),
            })
            .collect()
    }

    /// Buy/sell counts plus the last `recent` trades, newest first.
    pub fn trade_summary(&self, trades: &[TradeEvent], recent: usize) -> TradeSummary {
        let buy_count = trades.iter().filter(|t| t.action == TradeAction::Buy).count();
        TradeSummary {
            buy_count,
            sell_count: trades.len() - buy_count,
            total: trades.len(),
            recent: trades.iter().rev().take(recent).cloned().collect(),
        }
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

/// Stand-in OHLC bars derived from equity returns.
///
/// `close = 100 × (1 + returns)^(index / 10)`; a missing or zero return
/// keeps the multiplier at 1. Open/high/low are fixed offsets of close.
pub fn synthesize_price_bars(equity_curve: &[EquityPoint]) -> Vec<PriceBar> {
    equity_curve
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let multiplier = match point.returns {
                Some(r) if r != 0.0 && !r.is_nan() => 1.0 + r,
                _ => 1.0,
            };
            let close = SYNTHETIC_BASE_PRICE * multiplier.powf(index as f64 / 10.0);
            PriceBar {
                date: point.date.clone(),
                open: close * 0.999,
                high: close * 1.005,
                low: close * 0.995,
                close,
                volume: SYNTHETIC_VOLUME,
            }
        })
        .collect()
}

fn heatmap_cell(month_index: u32, return_pct: Option<f64>) -> HeatmapCell {
    match return_pct {
        Some(r) => HeatmapCell {
            month_index,
            return_pct: Some(r),
            intensity: (r.abs() / HEATMAP_FULL_INTENSITY_PCT).min(1.0),
            opacity: (0.6 + r.abs() / 20.0 * 0.4).min(1.0),
        },
        None => HeatmapCell {
            month_index,
            return_pct: None,
            intensity: 0.0,
            opacity: 0.3,
        },
    }
}

/// `"2024-03"` → `(2024, 3)`.
fn parse_year_month(raw: &str) -> Option<(i32, u32)> {
    let (year, month) = raw.trim().split_once('-')?;
    let year: i32 = year.parse().ok()?;
    // Tolerate a trailing day component ("2024-03-01").
    let month: u32 = month.split('-').next()?.parse().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

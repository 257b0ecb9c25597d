use crate::models::series::{NormalizedPoint, TimeSeries, TimeSeriesPoint};
use crate::models::timeframe::Tolerance;
use crate::models::timestamp::parse_timestamp_ms;
use crate::models::trade::{AlignedTrade, AnchorSource, TradeEvent};

/// Place every trade on a reference series (equity curve or close prices).
///
/// Pure and infallible: the output has one entry per trade, in input order.
/// Each trade is resolved independently, by the first rule that applies:
///
/// 1. a point with the identical date string;
/// 2. the nearest parseable point, if it lies within `tolerance`
///    (ties go to the earlier point in series order);
/// 3. linear interpolation between the last point at-or-before and the
///    first point at-or-after the trade;
/// 4. the only side that exists (last "before" or first "after" point);
/// 5. `price × quantity` when nothing in the series can be used.
///
/// Rules 1 and 2 snap the marker to the series point's date; rules 3–5 keep
/// the trade's own date. Points whose date cannot be parsed take part in
/// rule 1 only.
pub fn align(trades: &[TradeEvent], series: &TimeSeries, tolerance: Tolerance) -> Vec<AlignedTrade> {
    if trades.is_empty() {
        return Vec::new();
    }

    let unparseable = series.unparseable_count();
    if unparseable > 0 {
        tracing::warn!(
            unparseable,
            total = series.len(),
            "series contains dates that cannot be parsed; they only match exactly"
        );
    }

    trades
        .iter()
        .map(|trade| align_trade(trade, series, tolerance))
        .collect()
}

/// Convenience wrapper for raw points: normalises once, then aligns.
pub fn align_points(
    trades: &[TradeEvent],
    points: &[TimeSeriesPoint],
    tolerance: Tolerance,
) -> Vec<AlignedTrade> {
    align(trades, &TimeSeries::from_points(points), tolerance)
}

/// Resolve a single trade. See [`align`] for the rules.
pub fn align_trade(trade: &TradeEvent, series: &TimeSeries, tolerance: Tolerance) -> AlignedTrade {
    let points = series.points();
    if points.is_empty() {
        return estimated(trade);
    }

    if let Some(point) = points.iter().find(|p| p.date == trade.date) {
        return snapped(trade, point, AnchorSource::Exact);
    }

    let Some(trade_ms) = parse_timestamp_ms(&trade.date) else {
        tracing::trace!(date = %trade.date, "trade date unparseable, using notional");
        return estimated(trade);
    };

    if let Some((point, diff)) = nearest(points, trade_ms) {
        if diff <= tolerance.as_millis() {
            return snapped(trade, point, AnchorSource::Nearest);
        }
    }

    let before = points
        .iter()
        .rev()
        .filter_map(|p| p.epoch_ms.map(|ms| (p, ms)))
        .find(|&(_, ms)| ms <= trade_ms);
    let after = points
        .iter()
        .filter_map(|p| p.epoch_ms.map(|ms| (p, ms)))
        .find(|&(_, ms)| ms >= trade_ms);

    match (before, after) {
        (Some((b, b_ms)), Some((a, a_ms))) => {
            let value = interpolate(b.value, b_ms, a.value, a_ms, trade_ms);
            tracing::trace!(date = %trade.date, value, "trade interpolated");
            AlignedTrade::from_trade(trade, trade.date.clone(), value, AnchorSource::Interpolated)
        }
        (Some((b, _)), None) => {
            AlignedTrade::from_trade(trade, trade.date.clone(), b.value, AnchorSource::LastBefore)
        }
        (None, Some((a, _))) => {
            AlignedTrade::from_trade(trade, trade.date.clone(), a.value, AnchorSource::FirstAfter)
        }
        (None, None) => estimated(trade),
    }
}

/// Closest parseable point and its distance in ms. Strict `<` keeps the
/// first of equally distant points.
fn nearest(points: &[NormalizedPoint], trade_ms: i64) -> Option<(&NormalizedPoint, u64)> {
    let mut best: Option<(&NormalizedPoint, u64)> = None;
    for point in points {
        let Some(ms) = point.epoch_ms else { continue };
        let diff = trade_ms.abs_diff(ms);
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((point, diff)),
        }
    }
    best
}

fn interpolate(before_value: f64, before_ms: i64, after_value: f64, after_ms: i64, at_ms: i64) -> f64 {
    let span = (after_ms - before_ms) as f64;
    if span <= 0.0 {
        return before_value;
    }
    let ratio = (at_ms - before_ms) as f64 / span;
    before_value + (after_value - before_value) * ratio
}

fn snapped(trade: &TradeEvent, point: &NormalizedPoint, anchor: AnchorSource) -> AlignedTrade {
    tracing::trace!(date = %trade.date, chart_date = %point.date, ?anchor, "trade snapped");
    AlignedTrade::from_trade(trade, point.date.clone(), point.value, anchor)
}

fn estimated(trade: &TradeEvent) -> AlignedTrade {
    AlignedTrade::from_trade(trade, trade.date.clone(), trade.notional(), AnchorSource::Estimated)
}

// ═══════════════════════════════════════════════════════════════════
// Alignment Tests — placing trades on equity and price series
// ═══════════════════════════════════════════════════════════════════

use approx::assert_relative_eq;

use backtest_dashboard_core::models::series::{TimeSeries, TimeSeriesPoint};
use backtest_dashboard_core::models::timeframe::Tolerance;
use backtest_dashboard_core::models::trade::{AnchorSource, TradeAction, TradeEvent};
use backtest_dashboard_core::services::alignment_service::{align, align_points, align_trade};

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn series(points: &[(&str, f64)]) -> TimeSeries {
    points.iter().copied().collect()
}

fn buy(date: &str, price: f64, quantity: f64) -> TradeEvent {
    TradeEvent::new(date, TradeAction::Buy, price, quantity)
}

fn sell(date: &str, price: f64, quantity: f64) -> TradeEvent {
    TradeEvent::new(date, TradeAction::Sell, price, quantity)
}

fn two_point_series() -> TimeSeries {
    series(&[("2024-01-01", 100.0), ("2024-01-03", 110.0)])
}

// ═══════════════════════════════════════════════════════════════════
// Reference Scenarios
// ═══════════════════════════════════════════════════════════════════

mod scenarios {
    use super::*;

    #[test]
    fn exact_date_match_uses_series_value() {
        let out = align(
            &[buy("2024-01-01", 50.0, 2.0)],
            &two_point_series(),
            Tolerance::ONE_DAY,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].date, "2024-01-01");
        assert_relative_eq!(out[0].anchor_value, 100.0);
        assert_eq!(out[0].anchor, AnchorSource::Exact);
    }

    #[test]
    fn bracketed_trade_interpolates_halfway() {
        // Both neighbours are a full day away, so a tolerance under a day
        // leaves interpolation as the first rule that applies.
        let out = align(
            &[buy("2024-01-02", 50.0, 2.0)],
            &two_point_series(),
            Tolerance::from_millis(86_399_999),
        );
        assert_eq!(out[0].date, "2024-01-02");
        assert_relative_eq!(out[0].anchor_value, 105.0);
        assert_eq!(out[0].anchor, AnchorSource::Interpolated);
    }

    #[test]
    fn bracketed_trade_within_one_day_tolerance_snaps_to_earlier_point() {
        // Tolerance is inclusive: both neighbours are exactly one day away
        // and the earlier one wins the tie.
        let out = align(
            &[buy("2024-01-02", 50.0, 2.0)],
            &two_point_series(),
            Tolerance::ONE_DAY,
        );
        assert_eq!(out[0].date, "2024-01-01");
        assert_relative_eq!(out[0].anchor_value, 100.0);
        assert_eq!(out[0].anchor, AnchorSource::Nearest);
    }

    #[test]
    fn empty_series_falls_back_to_notional() {
        let out = align(&[buy("2024-01-01", 20.0, 5.0)], &TimeSeries::new(), Tolerance::ONE_DAY);
        assert_eq!(out[0].date, "2024-01-01");
        assert_relative_eq!(out[0].anchor_value, 100.0);
        assert_eq!(out[0].anchor, AnchorSource::Estimated);
    }

    #[test]
    fn trade_before_series_uses_first_point() {
        let out = align(
            &[buy("2024-01-01", 20.0, 5.0)],
            &series(&[("2024-02-01", 200.0)]),
            Tolerance::ONE_DAY,
        );
        assert_eq!(out[0].date, "2024-01-01");
        assert_relative_eq!(out[0].anchor_value, 200.0);
        assert_eq!(out[0].anchor, AnchorSource::FirstAfter);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Rule Ordering & Edge Cases
// ═══════════════════════════════════════════════════════════════════

mod rules {
    use super::*;

    #[test]
    fn trade_after_series_uses_last_point() {
        let out = align(
            &[sell("2024-03-01", 20.0, 5.0)],
            &series(&[("2024-01-01", 100.0), ("2024-02-01", 120.0)]),
            Tolerance::ONE_DAY,
        );
        assert_eq!(out[0].date, "2024-03-01");
        assert_relative_eq!(out[0].anchor_value, 120.0);
        assert_eq!(out[0].anchor, AnchorSource::LastBefore);
    }

    #[test]
    fn nearest_point_within_tolerance_wins_over_interpolation() {
        let s = series(&[
            ("2024-01-01", 100.0),
            ("2024-01-05", 140.0),
            ("2024-01-10", 200.0),
        ]);
        let out = align(&[buy("2024-01-06", 1.0, 1.0)], &s, Tolerance::ONE_DAY);
        assert_eq!(out[0].date, "2024-01-05");
        assert_relative_eq!(out[0].anchor_value, 140.0);
        assert_eq!(out[0].anchor, AnchorSource::Nearest);
    }

    #[test]
    fn equidistant_neighbours_prefer_first_in_series_order() {
        let s = series(&[("2024-01-01", 100.0), ("2024-01-03", 300.0)]);
        let out = align(&[buy("2024-01-02", 1.0, 1.0)], &s, Tolerance::ONE_WEEK);
        assert_eq!(out[0].date, "2024-01-01");
        assert_relative_eq!(out[0].anchor_value, 100.0);
    }

    #[test]
    fn interpolation_is_proportional_to_elapsed_time() {
        let s = series(&[("2024-01-01", 100.0), ("2024-01-11", 200.0)]);
        let out = align(&[buy("2024-01-04", 1.0, 1.0)], &s, Tolerance::ONE_DAY);
        assert_eq!(out[0].anchor, AnchorSource::Interpolated);
        assert_relative_eq!(out[0].anchor_value, 130.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_tolerance_still_matches_exact_strings() {
        let out = align(
            &[buy("2024-01-03", 1.0, 1.0)],
            &two_point_series(),
            Tolerance::ZERO,
        );
        assert_eq!(out[0].anchor, AnchorSource::Exact);
        assert_relative_eq!(out[0].anchor_value, 110.0);
    }

    #[test]
    fn same_instant_in_different_format_snaps_with_zero_tolerance() {
        let s = series(&[("2024-01-02T00:00:00Z", 150.0)]);
        let out = align(&[buy("2024-01-02", 1.0, 1.0)], &s, Tolerance::ZERO);
        assert_eq!(out[0].anchor, AnchorSource::Nearest);
        assert_eq!(out[0].date, "2024-01-02T00:00:00Z");
        assert_eq!(out[0].original_date, "2024-01-02");
    }

    #[test]
    fn intraday_trade_snaps_to_daily_bar_within_a_day() {
        let s = series(&[("2024-01-02", 100.0), ("2024-01-03", 101.0)]);
        let out = align(&[buy("2024-01-02 15:30:00", 1.0, 1.0)], &s, Tolerance::ONE_DAY);
        assert_eq!(out[0].date, "2024-01-03");
        assert_eq!(out[0].anchor, AnchorSource::Nearest);
    }

    #[test]
    fn unparseable_trade_date_without_exact_match_is_estimated() {
        let out = align(
            &[buy("last tuesday", 10.0, 3.0)],
            &two_point_series(),
            Tolerance::ONE_WEEK,
        );
        assert_eq!(out[0].anchor, AnchorSource::Estimated);
        assert_eq!(out[0].date, "last tuesday");
        assert_relative_eq!(out[0].anchor_value, 30.0);
    }

    #[test]
    fn unparseable_series_dates_only_match_exactly() {
        let s = series(&[("n/a", 7.0), ("2024-01-10", 200.0)]);

        let exact = align(&[buy("n/a", 1.0, 1.0)], &s, Tolerance::ONE_DAY);
        assert_eq!(exact[0].anchor, AnchorSource::Exact);
        assert_relative_eq!(exact[0].anchor_value, 7.0);

        let placed = align(&[buy("2024-01-01", 1.0, 1.0)], &s, Tolerance::ONE_DAY);
        assert_eq!(placed[0].anchor, AnchorSource::FirstAfter);
        assert_relative_eq!(placed[0].anchor_value, 200.0);
    }

    #[test]
    fn series_of_only_unparseable_dates_estimates() {
        let s = series(&[("?", 1.0), ("??", 2.0)]);
        let out = align(&[buy("2024-01-01", 4.0, 2.0)], &s, Tolerance::ONE_DAY);
        assert_eq!(out[0].anchor, AnchorSource::Estimated);
        assert_relative_eq!(out[0].anchor_value, 8.0);
    }

    #[test]
    fn single_trade_helper_matches_batch() {
        let s = two_point_series();
        let trade = buy("2024-01-03", 1.0, 1.0);
        let single = align_trade(&trade, &s, Tolerance::ONE_DAY);
        let batch = align(std::slice::from_ref(&trade), &s, Tolerance::ONE_DAY);
        assert_eq!(single, batch[0]);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Output Properties
// ═══════════════════════════════════════════════════════════════════

mod properties {
    use super::*;

    fn mixed_trades() -> Vec<TradeEvent> {
        vec![
            buy("2023-12-01", 10.0, 1.0),
            sell("2024-01-01", 11.0, 1.0).with_pnl(1.0),
            buy("2024-01-02", 12.0, 2.0),
            sell("2024-02-01", 13.0, 2.0).with_pnl(2.0),
            buy("garbage", 14.0, 3.0),
        ]
    }

    #[test]
    fn one_output_per_trade_in_input_order() {
        let trades = mixed_trades();
        let out = align(&trades, &two_point_series(), Tolerance::ONE_DAY);
        assert_eq!(out.len(), trades.len());
        for (aligned, trade) in out.iter().zip(&trades) {
            assert_eq!(aligned.original_date, trade.date);
            assert_eq!(aligned.action, trade.action);
        }
    }

    #[test]
    fn trade_fields_are_carried_through() {
        let trades = mixed_trades();
        let out = align(&trades, &two_point_series(), Tolerance::ONE_DAY);
        for (aligned, trade) in out.iter().zip(&trades) {
            assert_relative_eq!(aligned.price, trade.price);
            assert_relative_eq!(aligned.quantity, trade.quantity);
            assert_relative_eq!(aligned.value, trade.value);
            assert_relative_eq!(aligned.pnl, trade.pnl);
        }
    }

    #[test]
    fn snapped_markers_use_series_dates_and_others_keep_trade_dates() {
        let s = two_point_series();
        let series_dates: Vec<&str> = s.points().iter().map(|p| p.date.as_str()).collect();
        let trades = mixed_trades();

        for (aligned, trade) in align(&trades, &s, Tolerance::ONE_DAY).iter().zip(&trades) {
            if aligned.anchor.is_snapped() {
                assert!(series_dates.contains(&aligned.date.as_str()));
            } else {
                assert_eq!(aligned.date, trade.date);
            }
        }
    }

    #[test]
    fn inputs_are_left_untouched() {
        let trades = mixed_trades();
        let points = vec![
            TimeSeriesPoint::new("2024-01-01", 100.0),
            TimeSeriesPoint::new("2024-01-03", 110.0),
        ];
        let trades_before = trades.clone();
        let points_before = points.clone();

        let _ = align_points(&trades, &points, Tolerance::ONE_DAY);

        assert_eq!(trades, trades_before);
        assert_eq!(points, points_before);
    }

    #[test]
    fn repeated_calls_give_identical_output() {
        let trades = mixed_trades();
        let s = two_point_series();
        assert_eq!(
            align(&trades, &s, Tolerance::ONE_DAY),
            align(&trades, &s, Tolerance::ONE_DAY)
        );
    }

    #[test]
    fn no_trades_gives_no_markers() {
        assert!(align(&[], &two_point_series(), Tolerance::ONE_DAY).is_empty());
        assert!(align(&[], &TimeSeries::new(), Tolerance::ONE_DAY).is_empty());
    }

    #[test]
    fn wider_tolerance_never_unsnaps_a_marker() {
        let s = series(&[
            ("2024-01-01", 100.0),
            ("2024-01-08", 170.0),
            ("2024-01-15", 240.0),
        ]);
        let trades = vec![buy("2024-01-03", 1.0, 1.0), sell("2024-01-12", 1.0, 1.0)];

        let narrow = align(&trades, &s, Tolerance::ONE_DAY);
        let wide = align(&trades, &s, Tolerance::ONE_WEEK);

        assert!(narrow.iter().all(|m| m.anchor == AnchorSource::Interpolated));
        assert!(wide.iter().all(|m| m.anchor.is_snapped()));
        assert_eq!(wide[0].date, "2024-01-01");
        assert_eq!(wide[1].date, "2024-01-15");
    }
}

use chrono::{Days, NaiveDate};

use crate::errors::CoreError;
use crate::models::catalog::StrategyInfo;
use crate::models::request::BacktestRequest;
use crate::models::timeframe::Timeframe;

/// Edits and validates backtest requests the way the configuration form does.
///
/// Every method that depends on the current date takes `today` explicitly,
/// so callers decide the clock (and tests stay deterministic).
pub struct RequestService;

impl RequestService {
    pub fn new() -> Self {
        Self
    }

    /// Switch to `strategy` and reset parameters to its declared defaults.
    pub fn select_strategy(&self, request: &mut BacktestRequest, strategy: &StrategyInfo) {
        request.strategy = strategy.id.clone();
        request.parameters = strategy.default_parameters();
    }

    /// Set a single strategy parameter, replacing any previous value.
    pub fn set_parameter(
        &self,
        request: &mut BacktestRequest,
        key: impl Into<String>,
        value: serde_json::Value,
    ) {
        request.parameters.insert(key.into(), value);
    }

    /// Change the timeframe and reset the range to its default span ending today.
    pub fn set_timeframe(&self, request: &mut BacktestRequest, timeframe: Timeframe, today: NaiveDate) {
        let limits = timeframe.limits();
        request.timeframe = timeframe;
        request.start_date = days_before(today, limits.default_days);
        request.end_date = today;
    }

    /// Set the start date, clamped to the earliest allowed date. If the range
    /// then exceeds the timeframe's maximum span, the end date moves in.
    pub fn set_start_date(&self, request: &mut BacktestRequest, date: NaiveDate, today: NaiveDate) {
        let limits = request.timeframe.limits();
        let earliest = days_before(today, limits.max_days);
        request.start_date = date.max(earliest);

        if request.span_days() > limits.max_days {
            request.end_date = days_after(request.start_date, limits.max_days);
        }
    }

    /// Set the end date, clamped to today. If the range then exceeds the
    /// timeframe's maximum span, the start date moves in.
    pub fn set_end_date(&self, request: &mut BacktestRequest, date: NaiveDate, today: NaiveDate) {
        let limits = request.timeframe.limits();
        request.end_date = date.min(today);

        if request.span_days() > limits.max_days {
            request.start_date = days_before(request.end_date, limits.max_days);
        }
    }

    /// True when the range is longer than the timeframe allows (shown as a
    /// warning; the backend may still accept it).
    pub fn exceeds_range_limit(&self, request: &BacktestRequest) -> bool {
        request.span_days() > request.timeframe.limits().max_days
    }

    /// Reject requests the backend cannot run.
    pub fn validate(&self, request: &BacktestRequest) -> Result<(), CoreError> {
        if request.symbol.trim().is_empty() {
            return Err(CoreError::ValidationError("Symbol must not be empty".into()));
        }
        if request.strategy.trim().is_empty() {
            return Err(CoreError::ValidationError("Strategy must not be empty".into()));
        }
        if !request.initial_capital.is_finite() || request.initial_capital <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Initial capital must be a positive number, got {}",
                request.initial_capital
            )));
        }
        if request.start_date > request.end_date {
            return Err(CoreError::ValidationError(format!(
                "Start date ({}) must not be after end date ({})",
                request.start_date, request.end_date
            )));
        }
        Ok(())
    }
}

impl Default for RequestService {
    fn default() -> Self {
        Self::new()
    }
}

fn days_before(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_sub_days(Days::new(days.unsigned_abs()))
        .unwrap_or(NaiveDate::MIN)
}

fn days_after(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_days(Days::new(days.unsigned_abs()))
        .unwrap_or(NaiveDate::MAX)
}

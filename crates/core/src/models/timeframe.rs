use serde::{Deserialize, Serialize};

use super::timestamp::MILLIS_PER_DAY;

/// Bar size of a backtest, using the backend's timeframe ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[default]
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1wk")]
    OneWeek,
    #[serde(rename = "1mo")]
    OneMonth,
}

/// How far back a backtest may reach for a given timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRangeLimits {
    /// Longest allowed start..end span, also the furthest start from today
    pub max_days: i64,
    /// Span preselected when the timeframe is chosen
    pub default_days: i64,
}

impl Timeframe {
    pub const ALL: [Timeframe; 9] = [
        Timeframe::OneMinute,
        Timeframe::FiveMinutes,
        Timeframe::FifteenMinutes,
        Timeframe::ThirtyMinutes,
        Timeframe::OneHour,
        Timeframe::FourHours,
        Timeframe::OneDay,
        Timeframe::OneWeek,
        Timeframe::OneMonth,
    ];

    pub fn parse(id: &str) -> Option<Timeframe> {
        Self::ALL.into_iter().find(|tf| tf.as_str() == id.trim())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneMinute => "1m",
            Timeframe::FiveMinutes => "5m",
            Timeframe::FifteenMinutes => "15m",
            Timeframe::ThirtyMinutes => "30m",
            Timeframe::OneHour => "1h",
            Timeframe::FourHours => "4h",
            Timeframe::OneDay => "1d",
            Timeframe::OneWeek => "1wk",
            Timeframe::OneMonth => "1mo",
        }
    }

    /// Sub-daily bars; sparse outside trading hours.
    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            Timeframe::OneMinute
                | Timeframe::FiveMinutes
                | Timeframe::FifteenMinutes
                | Timeframe::ThirtyMinutes
                | Timeframe::OneHour
                | Timeframe::FourHours
        )
    }

    pub fn limits(&self) -> DateRangeLimits {
        let (max_days, default_days) = match self {
            Timeframe::OneMinute => (7, 7),
            Timeframe::FiveMinutes => (30, 7),
            Timeframe::FifteenMinutes => (90, 30),
            Timeframe::ThirtyMinutes => (180, 90),
            Timeframe::OneHour => (365, 180),
            Timeframe::FourHours => (725, 365),
            Timeframe::OneDay => (725, 365),
            Timeframe::OneWeek | Timeframe::OneMonth => (1095, 1095),
        };
        DateRangeLimits {
            max_days,
            default_days,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maximum gap between a trade and a series point for them to count as
/// the same moment on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tolerance(u64);

impl Tolerance {
    pub const ZERO: Tolerance = Tolerance(0);
    pub const ONE_DAY: Tolerance = Tolerance(MILLIS_PER_DAY as u64);
    pub const ONE_WEEK: Tolerance = Tolerance(7 * MILLIS_PER_DAY as u64);

    pub const fn from_millis(ms: u64) -> Self {
        Tolerance(ms)
    }

    pub const fn from_days(days: u64) -> Self {
        Tolerance(days * MILLIS_PER_DAY as u64)
    }

    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Recommended window: a week for intraday bars, a day otherwise.
    pub fn for_timeframe(timeframe: Timeframe) -> Self {
        if timeframe.is_intraday() {
            Tolerance::ONE_WEEK
        } else {
            Tolerance::ONE_DAY
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::ONE_DAY
    }
}

use serde::{Deserialize, Serialize};

use super::timestamp::parse_timestamp_ms;

/// A single `(date, value)` sample of an equity curve or price series.
///
/// `date` is kept exactly as the backend sent it: exact matching against
/// trade dates is done on the raw string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub date: String,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }
}

/// A series point with its date normalised to epoch milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPoint {
    pub date: String,
    pub value: f64,
    /// `None` when the date string could not be parsed.
    pub epoch_ms: Option<i64>,
}

/// An ordered series whose dates were parsed once, when it was built.
///
/// Insertion order is kept as given (chronological by upstream contract);
/// nothing is sorted or de-duplicated here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    points: Vec<NormalizedPoint>,
}

impl TimeSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalise raw points, parsing every date exactly once.
    pub fn from_points(points: &[TimeSeriesPoint]) -> Self {
        points
            .iter()
            .map(|p| (p.date.as_str(), p.value))
            .collect()
    }

    pub fn push(&mut self, date: impl Into<String>, value: f64) {
        let date = date.into();
        let epoch_ms = parse_timestamp_ms(&date);
        self.points.push(NormalizedPoint {
            date,
            value,
            epoch_ms,
        });
    }

    pub fn points(&self) -> &[NormalizedPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points whose date could not be parsed.
    pub fn unparseable_count(&self) -> usize {
        self.points.iter().filter(|p| p.epoch_ms.is_none()).count()
    }
}

impl<'a> FromIterator<(&'a str, f64)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut series = TimeSeries::new();
        for (date, value) in iter {
            series.push(date, value);
        }
        series
    }
}

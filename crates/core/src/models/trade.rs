use serde::{Deserialize, Serialize};

/// Side of a simulated execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TradeAction {
    /// Entry / buying
    Buy,
    /// Exit / selling
    Sell,
}

impl std::fmt::Display for TradeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "BUY"),
            TradeAction::Sell => write!(f, "SELL"),
        }
    }
}

/// A single simulated buy or sell, as reported by the backtesting API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    /// Execution date or date-time, verbatim from the backend
    pub date: String,

    /// Buy or Sell
    pub action: TradeAction,

    /// Execution price per unit
    pub price: f64,

    /// Number of units traded
    pub quantity: f64,

    /// Notional at execution (price × quantity)
    #[serde(default)]
    pub value: f64,

    /// Realised profit/loss; entries usually carry none
    #[serde(default, deserialize_with = "null_as_zero")]
    pub pnl: f64,
}

impl TradeEvent {
    /// Build a trade whose `value` is derived from price and quantity.
    pub fn new(date: impl Into<String>, action: TradeAction, price: f64, quantity: f64) -> Self {
        Self {
            date: date.into(),
            action,
            price,
            quantity,
            value: price * quantity,
            pnl: 0.0,
        }
    }

    pub fn with_pnl(mut self, pnl: f64) -> Self {
        self.pnl = pnl;
        self
    }

    /// Anchor used when there is nothing to align against.
    pub fn notional(&self) -> f64 {
        self.price * self.quantity
    }
}

/// How an [`AlignedTrade`]'s anchor was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnchorSource {
    /// Series point with the identical date string
    Exact,
    /// Closest series point inside the tolerance window
    Nearest,
    /// Linear interpolation between the bracketing points
    Interpolated,
    /// Trade lies after the series; last point reused
    LastBefore,
    /// Trade lies before the series; first point reused
    FirstAfter,
    /// No usable series; price × quantity
    Estimated,
}

impl AnchorSource {
    /// True when the anchor reuses an existing series point's date.
    pub fn is_snapped(&self) -> bool {
        matches!(self, AnchorSource::Exact | AnchorSource::Nearest)
    }
}

/// A trade positioned on a chart's time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedTrade {
    /// Resolved x-axis date: a series date when snapped, else the trade's own date
    pub date: String,

    /// Y-axis value for the marker
    pub anchor_value: f64,

    /// Which alignment rule produced the anchor
    pub anchor: AnchorSource,

    /// The trade's own date, kept for tooltips
    pub original_date: String,

    pub action: TradeAction,
    pub price: f64,
    pub quantity: f64,
    pub value: f64,
    pub pnl: f64,
}

impl AlignedTrade {
    pub(crate) fn from_trade(
        trade: &TradeEvent,
        date: impl Into<String>,
        anchor_value: f64,
        anchor: AnchorSource,
    ) -> Self {
        Self {
            date: date.into(),
            anchor_value,
            anchor,
            original_date: trade.date.clone(),
            action: trade.action,
            price: trade.price,
            quantity: trade.quantity,
            value: trade.value,
            pnl: trade.pnl,
        }
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

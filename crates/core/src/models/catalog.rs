use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A tunable parameter declared by a strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Value preselected in the configuration form
    pub default: serde_json::Value,

    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub min: Option<f64>,

    #[serde(default)]
    pub max: Option<f64>,

    #[serde(default)]
    pub description: Option<String>,
}

/// A strategy the backend can run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyInfo {
    /// Stable id sent back in `BacktestRequest::strategy`
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterSpec>,
}

impl StrategyInfo {
    /// Declared defaults, keyed by parameter name.
    pub fn default_parameters(&self) -> BTreeMap<String, serde_json::Value> {
        self.parameters
            .iter()
            .map(|(name, spec)| (name.clone(), spec.default.clone()))
            .collect()
    }
}

/// A tradable instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    #[serde(default)]
    pub name: String,
}

/// A bar size offered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeframeInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

// ── API envelope types ──────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct StrategiesResponse {
    pub strategies: Vec<StrategyInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SymbolsResponse {
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TimeframesResponse {
    pub timeframes: Vec<TimeframeInfo>,
}

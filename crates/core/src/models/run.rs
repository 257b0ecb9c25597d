use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::backtest::BacktestResult;
use super::request::BacktestRequest;

/// A completed backtest: what was asked and what came back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestRun {
    /// Unique identifier
    pub id: Uuid,
    pub request: BacktestRequest,
    pub result: BacktestResult,
}

impl BacktestRun {
    pub fn new(request: BacktestRequest, result: BacktestResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            result,
        }
    }

    /// Label for comparison charts: the backend's strategy name when given,
    /// else the requested strategy id.
    pub fn label(&self) -> &str {
        self.result
            .strategy_name
            .as_deref()
            .unwrap_or(&self.request.strategy)
    }
}

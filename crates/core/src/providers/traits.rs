use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::backtest::BacktestResult;
use crate::models::catalog::{StrategyInfo, SymbolInfo, TimeframeInfo};
use crate::models::market::{Fundamentals, NewsArticle};
use crate::models::request::BacktestRequest;

/// Trait abstraction over the remote backtesting service.
///
/// The HTTP client implements it for the real backend; tests and offline
/// front ends plug in their own implementation. Nothing outside
/// `providers` knows about URLs or status codes.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait BacktestApi: Send + Sync {
    /// Human-readable name of this backend (for logs/errors).
    fn name(&self) -> &str;

    /// Whether the backend answers at all. Never errors: any failure is `false`.
    async fn check_health(&self) -> bool;

    /// Strategies the backend can run, with their tunable parameters.
    async fn get_strategies(&self) -> Result<Vec<StrategyInfo>, CoreError>;

    /// Instruments available for backtesting.
    async fn get_symbols(&self) -> Result<Vec<SymbolInfo>, CoreError>;

    /// Bar sizes the backend supports.
    async fn get_timeframes(&self) -> Result<Vec<TimeframeInfo>, CoreError>;

    /// Run one backtest and return the full result payload.
    async fn run_backtest(&self, request: &BacktestRequest) -> Result<BacktestResult, CoreError>;

    /// Run a parameter optimization. The optimization contract belongs to
    /// the backend, so request and response pass through as raw JSON.
    async fn optimize_strategy(
        &self,
        request: &serde_json::Value,
    ) -> Result<serde_json::Value, CoreError>;

    /// Company fundamentals for a symbol.
    async fn get_fundamentals(&self, symbol: &str) -> Result<Fundamentals, CoreError>;

    /// Recent news for a symbol; an unexpected payload shape yields an empty list.
    async fn get_news(&self, symbol: &str) -> Result<Vec<NewsArticle>, CoreError>;
}

pub mod errors;
pub mod models;
pub mod providers;
pub mod services;

use chrono::NaiveDate;
use models::{
    backtest::BacktestResult,
    catalog::{StrategyInfo, SymbolInfo, TimeframeInfo},
    chart::{EquityChart, HeatmapYear, PriceChart, TradeSummary},
    comparison::ComparisonRow,
    market::{Fundamentals, NewsArticle},
    request::BacktestRequest,
    run::BacktestRun,
    settings::ClientSettings,
    timeframe::Tolerance,
};
use providers::{http::HttpBacktestApi, traits::BacktestApi};
use services::{
    chart_service::ChartService, comparison_service::ComparisonService,
    request_service::RequestService,
};

use errors::CoreError;

/// Main entry point for the backtest dashboard core library.
/// Holds the backend client, the loaded catalogs and the backtest runs.
#[must_use]
pub struct BacktestDashboard {
    api: Box<dyn BacktestApi>,
    chart_service: ChartService,
    comparison_service: ComparisonService,
    request_service: RequestService,
    strategies: Vec<StrategyInfo>,
    symbols: Vec<SymbolInfo>,
    timeframes: Vec<TimeframeInfo>,
    /// Fixed alignment tolerance; derived per result when `None`.
    tolerance_override: Option<Tolerance>,
    connected: bool,
    /// All runs of this session, oldest first. The last one is "current".
    runs: Vec<BacktestRun>,
    /// Whether the last run is still shown (cleared by `clear_results`).
    has_current: bool,
}

impl std::fmt::Debug for BacktestDashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BacktestDashboard")
            .field("api", &self.api.name())
            .field("connected", &self.connected)
            .field("strategies", &self.strategies.len())
            .field("symbols", &self.symbols.len())
            .field("timeframes", &self.timeframes.len())
            .field("runs", &self.runs.len())
            .finish()
    }
}

impl BacktestDashboard {
    /// Create a dashboard on top of any backend implementation.
    pub fn new(api: Box<dyn BacktestApi>) -> Self {
        Self {
            api,
            chart_service: ChartService::new(),
            comparison_service: ComparisonService::new(),
            request_service: RequestService::new(),
            strategies: Vec::new(),
            symbols: Vec::new(),
            timeframes: Vec::new(),
            tolerance_override: None,
            connected: false,
            runs: Vec::new(),
            has_current: false,
        }
    }

    /// Create a dashboard talking HTTP to the backend described by `settings`.
    pub fn from_settings(settings: &ClientSettings) -> Result<Self, CoreError> {
        let api = HttpBacktestApi::new(settings)?;
        let mut dashboard = Self::new(Box::new(api));
        dashboard.tolerance_override = settings.tolerance_override();
        Ok(dashboard)
    }

    /// Force one alignment tolerance for every chart (or `None` to derive
    /// it from each result's timeframe).
    pub fn set_tolerance_override(&mut self, tolerance: Option<Tolerance>) {
        self.tolerance_override = tolerance;
    }

    // ── Connection & Catalogs ───────────────────────────────────────

    /// Check the backend and load strategies, symbols and timeframes.
    pub async fn connect(&mut self) -> Result<(), CoreError> {
        self.connected = self.api.check_health().await;
        if !self.connected {
            return Err(CoreError::BackendUnavailable(format!(
                "{} did not answer the health check",
                self.api.name()
            )));
        }

        self.strategies = self.api.get_strategies().await?;
        self.symbols = self.api.get_symbols().await?;
        self.timeframes = self.api.get_timeframes().await?;

        tracing::info!(
            strategies = self.strategies.len(),
            symbols = self.symbols.len(),
            timeframes = self.timeframes.len(),
            "connected to backend"
        );
        Ok(())
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    #[must_use]
    pub fn strategies(&self) -> &[StrategyInfo] {
        &self.strategies
    }

    #[must_use]
    pub fn symbols(&self) -> &[SymbolInfo] {
        &self.symbols
    }

    #[must_use]
    pub fn timeframes(&self) -> &[TimeframeInfo] {
        &self.timeframes
    }

    #[must_use]
    pub fn find_strategy(&self, id: &str) -> Option<&StrategyInfo> {
        self.strategies.iter().find(|s| s.id == id)
    }

    // ── Requests ────────────────────────────────────────────────────

    /// The form's initial request: default range reset to end `today`,
    /// with the default strategy's parameter defaults when it is known.
    #[must_use]
    pub fn default_request(&self, today: NaiveDate) -> BacktestRequest {
        let mut request = BacktestRequest::default();
        let timeframe = request.timeframe;
        self.request_service
            .set_timeframe(&mut request, timeframe, today);
        if let Some(strategy) = self.find_strategy(&request.strategy) {
            self.request_service.select_strategy(&mut request, strategy);
        }
        request
    }

    #[must_use]
    pub fn request_service(&self) -> &RequestService {
        &self.request_service
    }

    // ── Running Backtests ───────────────────────────────────────────

    /// Validate and run a backtest. The result becomes the current one and
    /// is appended to the run history.
    pub async fn run_backtest(&mut self, request: BacktestRequest) -> Result<&BacktestRun, CoreError> {
        self.request_service.validate(&request)?;
        self.has_current = false;

        let result = self.api.run_backtest(&request).await?;
        tracing::info!(
            symbol = %request.symbol,
            strategy = %request.strategy,
            trades = result.trades.len(),
            points = result.equity_curve.len(),
            "backtest finished"
        );

        self.runs.push(BacktestRun::new(request, result));
        self.has_current = true;
        self.runs.last().ok_or(CoreError::NoResults)
    }

    /// Run several backtests in order, all or nothing: on the first failure
    /// the runs of this batch are dropped and the previous current result
    /// is restored.
    pub async fn run_multiple_backtests(
        &mut self,
        requests: Vec<BacktestRequest>,
    ) -> Result<Vec<uuid::Uuid>, CoreError> {
        for request in &requests {
            self.request_service.validate(request)?;
        }

        let runs_before = self.runs.len();
        let had_current = self.has_current;

        let mut ids = Vec::with_capacity(requests.len());
        for request in requests {
            match self.run_backtest(request).await {
                Ok(run) => ids.push(run.id),
                Err(e) => {
                    tracing::warn!(
                        completed = ids.len(),
                        error = %e,
                        "batch backtest failed, discarding its runs"
                    );
                    self.runs.truncate(runs_before);
                    self.has_current = had_current;
                    return Err(e);
                }
            }
        }
        Ok(ids)
    }

    /// Pass-through to the backend's optimizer.
    pub async fn optimize_strategy(
        &self,
        request: &serde_json::Value,
    ) -> Result<serde_json::Value, CoreError> {
        self.api.optimize_strategy(request).await
    }

    /// Hide the current result. The run history is kept for comparison.
    pub fn clear_results(&mut self) {
        self.has_current = false;
    }

    /// Drop every stored run.
    pub fn clear_history(&mut self) {
        self.runs.clear();
        self.has_current = false;
    }

    #[must_use]
    pub fn current_run(&self) -> Option<&BacktestRun> {
        if self.has_current {
            self.runs.last()
        } else {
            None
        }
    }

    #[must_use]
    pub fn current_result(&self) -> Option<&BacktestResult> {
        self.current_run().map(|run| &run.result)
    }

    #[must_use]
    pub fn runs(&self) -> &[BacktestRun] {
        &self.runs
    }

    // ── Charts ──────────────────────────────────────────────────────

    /// Tolerance used for `result`: the override, else its timeframe's default.
    #[must_use]
    pub fn tolerance_for(&self, result: &BacktestResult) -> Tolerance {
        self.tolerance_override
            .unwrap_or_else(|| result.recommended_tolerance())
    }

    /// Equity line with trade markers for the current result.
    pub fn equity_chart(&self) -> Result<EquityChart, CoreError> {
        let result = self.current_result().ok_or(CoreError::NoResults)?;
        Ok(self
            .chart_service
            .equity_chart(result, self.tolerance_for(result)))
    }

    /// Price chart with BUY/SELL series for the current result.
    pub fn price_chart(&self) -> Result<PriceChart, CoreError> {
        let result = self.current_result().ok_or(CoreError::NoResults)?;
        Ok(self
            .chart_service
            .price_chart(result, self.tolerance_for(result)))
    }

    /// Monthly returns heatmap for the current result.
    pub fn monthly_heatmap(&self) -> Result<Vec<HeatmapYear>, CoreError> {
        let result = self.current_result().ok_or(CoreError::NoResults)?;
        Ok(self.chart_service.monthly_heatmap(&result.monthly_returns))
    }

    /// Trade counts and the last `recent` trades of the current result.
    pub fn trade_summary(&self, recent: usize) -> Result<TradeSummary, CoreError> {
        let result = self.current_result().ok_or(CoreError::NoResults)?;
        Ok(self.chart_service.trade_summary(&result.trades, recent))
    }

    /// Metric rows for every stored run.
    pub fn comparison(&self) -> Result<Vec<ComparisonRow>, CoreError> {
        if self.runs.is_empty() {
            return Err(CoreError::NoResults);
        }
        Ok(self.comparison_service.rows_for_runs(&self.runs))
    }

    // ── Market Data ─────────────────────────────────────────────────

    pub async fn fundamentals(&self, symbol: &str) -> Result<Fundamentals, CoreError> {
        self.api.get_fundamentals(&symbol.trim().to_uppercase()).await
    }

    pub async fn news(&self, symbol: &str) -> Result<Vec<NewsArticle>, CoreError> {
        self.api.get_news(&symbol.trim().to_uppercase()).await
    }
}

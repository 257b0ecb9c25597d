use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::backtest::BacktestResult;
use crate::models::catalog::{
    StrategiesResponse, StrategyInfo, SymbolInfo, SymbolsResponse, TimeframeInfo,
    TimeframesResponse,
};
use crate::models::market::{Fundamentals, NewsArticle, NewsResponse};
use crate::models::request::BacktestRequest;
use crate::models::settings::ClientSettings;
use super::traits::BacktestApi;

const PROVIDER: &str = "Backtest API";

/// HTTP client for the backtesting backend.
///
/// - **Endpoints**: `/api/health`, `/api/strategies`, `/api/symbols`,
///   `/api/timeframes`, `/api/backtest`, `/api/optimize`,
///   `/api/fundamentals?symbol=`, `/api/news?symbol=`
/// - **Errors**: non-2xx answers carry a JSON `detail` field, surfaced as
///   [`CoreError::Api`]; transport failures become [`CoreError::Network`].
pub struct HttpBacktestApi {
    client: Client,
    base_url: String,
}

impl HttpBacktestApi {
    pub fn new(settings: &ClientSettings) -> Result<Self, CoreError> {
        settings.validate()?;

        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(settings.request_timeout_secs));

        Ok(Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: settings.normalized_base_url().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an `/api/...` endpoint.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        failure: &str,
    ) -> Result<T, CoreError> {
        let url = self.endpoint(path);
        tracing::debug!(%url, "GET");

        let resp = self.client.get(&url).query(query).send().await?;
        decode(resp, failure).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B, failure: &str) -> Result<T, CoreError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!(%url, "POST");

        let resp = self.client.post(&url).json(body).send().await?;
        decode(resp, failure).await
    }
}

// ── Backend response types ──────────────────────────────────────────

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Turn a response into `T`, or into an `Api` error carrying the
/// backend's `detail` (falling back to `failure`).
async fn decode<T: DeserializeOwned>(resp: Response, failure: &str) -> Result<T, CoreError> {
    let status = resp.status();

    if !status.is_success() {
        let body = resp
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str::<ErrorBody>(&text).ok());
        let message = error_message(body, failure);
        tracing::warn!(%status, %message, "backend request failed");
        return Err(CoreError::Api {
            provider: PROVIDER.into(),
            message,
        });
    }

    let text = resp.text().await?;
    serde_json::from_str(&text).map_err(|e| {
        tracing::warn!(error = %e, "{failure}: unexpected response body");
        CoreError::from(e)
    })
}

/// Message for a failed request: the `detail` field as-is when it is a
/// string, its JSON text otherwise, or `failure` when there is none.
fn error_message(body: Option<ErrorBody>, failure: &str) -> String {
    match body.and_then(|b| b.detail) {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Null) | None => failure.to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl BacktestApi for HttpBacktestApi {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn check_health(&self) -> bool {
        let url = self.endpoint("health");
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::warn!(error = %CoreError::from(e), "backend health check failed");
                false
            }
        }
    }

    async fn get_strategies(&self) -> Result<Vec<StrategyInfo>, CoreError> {
        let resp: StrategiesResponse = self
            .get_json("strategies", &[], "Failed to fetch strategies")
            .await?;
        Ok(resp.strategies)
    }

    async fn get_symbols(&self) -> Result<Vec<SymbolInfo>, CoreError> {
        let resp: SymbolsResponse = self
            .get_json("symbols", &[], "Failed to fetch symbols")
            .await?;
        Ok(resp.symbols)
    }

    async fn get_timeframes(&self) -> Result<Vec<TimeframeInfo>, CoreError> {
        let resp: TimeframesResponse = self
            .get_json("timeframes", &[], "Failed to fetch timeframes")
            .await?;
        Ok(resp.timeframes)
    }

    async fn run_backtest(&self, request: &BacktestRequest) -> Result<BacktestResult, CoreError> {
        self.post_json("backtest", request, "Backtest failed").await
    }

    async fn optimize_strategy(
        &self,
        request: &serde_json::Value,
    ) -> Result<serde_json::Value, CoreError> {
        self.post_json("optimize", request, "Optimization failed").await
    }

    async fn get_fundamentals(&self, symbol: &str) -> Result<Fundamentals, CoreError> {
        self.get_json("fundamentals", &[("symbol", symbol)], "Failed to fetch fundamentals")
            .await
    }

    async fn get_news(&self, symbol: &str) -> Result<Vec<NewsArticle>, CoreError> {
        let resp: NewsResponse = self
            .get_json("news", &[("symbol", symbol)], "Failed to fetch news")
            .await?;
        Ok(resp.into_articles())
    }
}

use serde::{Deserialize, Serialize};

/// Company fundamentals for a symbol, with backend-computed pros and cons.
///
/// Field names follow the backend payload (camelCase); every figure is
/// optional because coverage varies per instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fundamentals {
    pub long_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub earnings_growth: Option<f64>,
    pub revenue_growth: Option<f64>,
    pub profit_margins: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub beta: Option<f64>,
    pub website: Option<String>,
    #[serde(default)]
    pub pros: Vec<String>,
    #[serde(default)]
    pub cons: Vec<String>,
}

impl Fundamentals {
    /// Display name, falling back to the ticker.
    pub fn display_name<'a>(&'a self, symbol: &'a str) -> &'a str {
        self.long_name.as_deref().unwrap_or(symbol)
    }
}

/// A news headline about a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub summary: Option<String>,
}

/// `GET /api/news` answers with either a bare list or `{ "news": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum NewsResponse {
    List(Vec<NewsArticle>),
    Wrapped { news: Vec<NewsArticle> },
    Other(serde::de::IgnoredAny),
}

impl NewsResponse {
    pub fn into_articles(self) -> Vec<NewsArticle> {
        match self {
            NewsResponse::List(items) | NewsResponse::Wrapped { news: items } => items,
            NewsResponse::Other(_) => Vec::new(),
        }
    }
}

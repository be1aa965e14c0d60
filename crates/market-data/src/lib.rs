//! HTTP client for the market data backend (price history + fundamentals).
//!
//! Timeouts and retries live here, at the fetch boundary. The aggregation
//! core downstream never performs I/O; a failed fetch simply surfaces as an
//! unavailable method in the final breakdown.

use analysis_core::{AnalysisError, Bar, FinancialSnapshot, MarketDataProvider};
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.polygon.io";

#[derive(Clone)]
pub struct MarketDataClient {
    api_key: String,
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct AggregatesResponse {
    results: Option<Vec<AggregateBar>>,
}

#[derive(Debug, Deserialize)]
struct AggregateBar {
    /// Unix millis
    t: i64,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    v: f64,
}

#[derive(Debug, Deserialize)]
struct FinancialsResponse {
    results: Option<Vec<FinancialsEntry>>,
}

#[derive(Debug, Deserialize, Default)]
struct FinancialsEntry {
    #[serde(default)]
    financials: Option<FinancialsBody>,
}

#[derive(Debug, Deserialize, Default)]
struct FinancialsBody {
    #[serde(default)]
    income_statement: Option<StatementItems>,
    #[serde(default)]
    balance_sheet: Option<StatementItems>,
    #[serde(default)]
    cash_flow_statement: Option<StatementItems>,
}

#[derive(Debug, Deserialize, Default)]
struct StatementItems {
    #[serde(default)]
    revenues: Option<LineItem>,
    #[serde(default)]
    gross_profit: Option<LineItem>,
    #[serde(default)]
    operating_income_loss: Option<LineItem>,
    #[serde(default)]
    net_income_loss: Option<LineItem>,
    #[serde(default)]
    basic_earnings_per_share: Option<LineItem>,
    #[serde(default)]
    assets: Option<LineItem>,
    #[serde(default)]
    liabilities: Option<LineItem>,
    #[serde(default)]
    equity: Option<LineItem>,
    #[serde(default)]
    net_cash_flow: Option<LineItem>,
}

#[derive(Debug, Deserialize, Default)]
struct LineItem {
    value: Option<f64>,
}

fn item(items: &Option<StatementItems>, pick: fn(&StatementItems) -> &Option<LineItem>) -> Option<f64> {
    items.as_ref().and_then(|s| pick(s).as_ref()).and_then(|l| l.value)
}

impl MarketDataClient {
    pub fn new(api_key: String) -> Self {
        let base_url = std::env::var("MARKET_DATA_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            api_key,
            base_url,
            client,
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: &str) -> Result<T, AnalysisError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AnalysisError::ApiError(format!(
                "Market data request failed with status {}",
                response.status()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AnalysisError::ApiError(e.to_string()))
    }
}

#[async_trait]
impl MarketDataProvider for MarketDataClient {
    async fn daily_bars(&self, symbol: &str, days_back: i64) -> Result<Vec<Bar>, AnalysisError> {
        let to = Utc::now();
        let from = to - Duration::days(days_back);
        let url = format!(
            "{}/v2/aggs/ticker/{}/range/1/day/{}/{}?adjusted=true&sort=asc&limit=5000",
            self.base_url,
            symbol.to_uppercase(),
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d"),
        );

        let body: AggregatesResponse = self.get_json(&url).await?;
        let results = body.results.unwrap_or_default();
        tracing::debug!("Fetched {} daily bars for {}", results.len(), symbol);

        let bars = results
            .into_iter()
            .filter_map(|r| {
                let timestamp: DateTime<Utc> = Utc.timestamp_millis_opt(r.t).single()?;
                Some(Bar {
                    timestamp,
                    open: r.o,
                    high: r.h,
                    low: r.l,
                    close: r.c,
                    volume: r.v,
                })
            })
            .collect();

        Ok(bars)
    }

    async fn snapshot(&self, symbol: &str) -> Result<FinancialSnapshot, AnalysisError> {
        let symbol = symbol.to_uppercase();
        let url = format!(
            "{}/vX/reference/financials?ticker={}&timeframe=annual&limit=2&sort=period_of_report_date",
            self.base_url, symbol,
        );

        let body: FinancialsResponse = self.get_json(&url).await?;
        let results = body.results.unwrap_or_default();
        let latest = results.first().and_then(|e| e.financials.as_ref()).ok_or_else(|| {
            AnalysisError::InsufficientData(format!("No financials reported for {}", symbol))
        })?;
        let prior = results.get(1).and_then(|e| e.financials.as_ref());

        let income = &latest.income_statement;
        let balance = &latest.balance_sheet;
        let cash = &latest.cash_flow_statement;
        let prior_income = prior.map(|p| &p.income_statement);

        Ok(FinancialSnapshot {
            symbol,
            current_price: None,
            market_cap: None,
            revenue: item(income, |s| &s.revenues),
            revenue_prior_year: prior_income.and_then(|i| item(i, |s| &s.revenues)),
            gross_profit: item(income, |s| &s.gross_profit),
            operating_income: item(income, |s| &s.operating_income_loss),
            net_income: item(income, |s| &s.net_income_loss),
            net_income_prior_year: prior_income.and_then(|i| item(i, |s| &s.net_income_loss)),
            eps: item(income, |s| &s.basic_earnings_per_share),
            eps_prior_year: prior_income.and_then(|i| item(i, |s| &s.basic_earnings_per_share)),
            total_assets: item(balance, |s| &s.assets),
            total_liabilities: item(balance, |s| &s.liabilities),
            shareholders_equity: item(balance, |s| &s.equity),
            free_cash_flow: item(cash, |s| &s.net_cash_flow),
            shares_outstanding: None,
        })
    }
}

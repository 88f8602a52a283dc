use crate::config::Settings;
use crate::ingest::types::MarketDataResponse;
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use reqwest::header::{HeaderMap, HeaderValue};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PATH: &str = "/v1/market_data";

// Two years of daily closes plus a buffer for non-trading days.
const HISTORY_WINDOW_DAYS: i64 = 2 * 365 + 60;

#[async_trait::async_trait]
pub trait MarketDataProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_market_data(&self, tickers: &[&str]) -> Result<MarketDataResponse>;
}

#[derive(Debug, Clone)]
pub struct HttpJsonMarketData {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    path: String,
}

impl HttpJsonMarketData {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings.require_market_data_base_url()?.to_string();
        let api_key = settings.market_data_api_key.clone();

        let timeout_secs = std::env::var("MARKET_DATA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let path = std::env::var("MARKET_DATA_PATH")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_PATH.to_string());

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build market data http client")?;

        Ok(Self {
            http,
            base_url,
            api_key,
            path,
        })
    }

    fn url(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };

        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            headers.insert("x-api-key", HeaderValue::from_str(api_key)?);
        }
        Ok(headers)
    }
}

#[async_trait::async_trait]
impl MarketDataProvider for HttpJsonMarketData {
    fn provider_name(&self) -> &'static str {
        "external_http_json"
    }

    // Single attempt per request: the pipeline treats any failure as
    // "market data unavailable" and surfaces it to the caller.
    async fn fetch_market_data(&self, tickers: &[&str]) -> Result<MarketDataResponse> {
        let url = self.url();
        let headers = self.headers()?;

        let end = Utc::now().date_naive();
        let start = end - Duration::days(HISTORY_WINDOW_DAYS);

        let res = self
            .http
            .get(url)
            .headers(headers)
            .query(&[
                ("tickers", tickers.join(",")),
                ("start", start.to_string()),
                ("end", end.to_string()),
            ])
            .send()
            .await
            .context("market data request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read market data response")?;
        let raw_json = serde_json::from_str::<serde_json::Value>(&text)
            .with_context(|| format!("market data response is not valid JSON: {text}"))?;

        if !status.is_success() {
            anyhow::bail!("market data HTTP {status}: {raw_json}");
        }

        let parsed = serde_json::from_value::<MarketDataResponse>(raw_json)
            .context("failed to parse market data response")?;
        validate_response(&parsed)?;
        Ok(parsed)
    }
}

pub fn validate_response(resp: &MarketDataResponse) -> Result<()> {
    let n_dates = resp.prices.dates.len();
    for (ticker, closes) in &resp.prices.series {
        anyhow::ensure!(
            closes.len() == n_dates,
            "price series length mismatch for {ticker}: expected {n_dates}, got {}",
            closes.len()
        );
    }

    for record in &resp.fundamentals {
        anyhow::ensure!(
            !record.ticker.trim().is_empty(),
            "fundamental ticker must be non-empty"
        );
    }

    Ok(())
}

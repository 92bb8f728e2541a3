//! Price quote source: closing price of a symbol on a past trading day.

mod dates;
mod series;

pub use dates::{
    DATE_FORMAT, can_refresh_date, can_refresh_on, check_date_format, parse_quote_date,
    previous_day,
};
pub use series::parse_daily_series;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{PortfolioError, Result};
use crate::types::Money;

#[async_trait]
pub trait QuoteSource: Send + Sync + 'static {
    /// Close of `symbol` on `date` (`YYYY-MM-DD`, strictly before today).
    async fn get_price_on_date(&self, symbol: &str, date: &str) -> Result<Money>;
}

pub const DEFAULT_QUOTE_BASE_URL: &str = "https://www.alphavantage.co";

/// Daily time-series client for the Alpha Vantage query API.
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl QuoteSource for AlphaVantageClient {
    async fn get_price_on_date(&self, symbol: &str, date: &str) -> Result<Money> {
        if !check_date_format(date, Utc::now().date_naive()) {
            return Err(PortfolioError::InvalidInput(format!(
                "incorrect date, expecting YYYY-MM-DD before today but got {date}"
            )));
        }

        let response = self
            .http
            .get(format!("{}/query", self.base_url))
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("outputsize", "compact"),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .inspect_err(|err| tracing::warn!(%symbol, error = %err, "price query failed"))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%symbol, %status, "price query returned unexpected status");
            return Err(PortfolioError::UpstreamQuoteError(format!(
                "price query for {symbol} returned {status}"
            )));
        }

        let body = response.bytes().await?;
        let closes = parse_daily_series(&body)?;
        closes.get(date).copied().ok_or_else(|| {
            PortfolioError::UpstreamQuoteError(format!("no {symbol} price data for {date}"))
        })
    }
}

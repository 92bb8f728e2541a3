//! Decoding of the daily time-series payload into a date -> close lookup.

use std::collections::BTreeMap;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{PortfolioError, Result};
use crate::types::Money;

#[derive(Debug, Deserialize)]
struct DailySeriesResponse {
    #[serde(rename = "Time Series (Daily)")]
    time_series: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct DailyBar {
    #[serde(rename = "4. close")]
    close: String,
}

/// Maps each date to its closing price. Days that fail to decode are skipped.
pub fn parse_daily_series(body: &[u8]) -> Result<BTreeMap<String, Money>> {
    let response: DailySeriesResponse = serde_json::from_slice(body).map_err(|err| {
        PortfolioError::UpstreamQuoteError(format!("unexpected price payload: {err}"))
    })?;

    let mut closes = BTreeMap::new();
    for (date, value) in response.time_series {
        let close = serde_json::from_value::<DailyBar>(value)
            .map_err(|err| err.to_string())
            .and_then(|bar| Decimal::from_str(bar.close.trim()).map_err(|err| err.to_string()));
        match close {
            Ok(price) => {
                closes.insert(date, price);
            }
            Err(reason) => tracing::debug!(%date, %reason, "skipping malformed price record"),
        }
    }
    Ok(closes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn skips_malformed_days() {
        let body = br#"{
            "Meta Data": {"2. Symbol": "AAPL"},
            "Time Series (Daily)": {
                "2022-01-12": {"1. open": "1", "4. close": "175.53", "5. volume": "10"},
                "2022-01-11": {"1. open": "1", "4. close": "not-a-number"},
                "2022-01-10": {"1. open": "1"},
                "2022-01-07": "garbage",
                "2022-01-06": {"4. close": "172.00"}
            }
        }"#;
        let closes = parse_daily_series(body).unwrap();
        assert_eq!(closes.len(), 2);
        assert_eq!(closes["2022-01-12"], dec!(175.53));
        assert_eq!(closes["2022-01-06"], dec!(172));
    }

    #[test]
    fn error_payload_is_upstream_error() {
        let body = br#"{"Error Message": "Invalid API call."}"#;
        assert!(matches!(
            parse_daily_series(body),
            Err(PortfolioError::UpstreamQuoteError(_))
        ));
        assert!(parse_daily_series(b"<html>").is_err());
    }
}

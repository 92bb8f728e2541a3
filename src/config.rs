//! Runtime configuration read from the environment (`.env` honoured).

use std::net::SocketAddr;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{PortfolioError, Result};
use crate::quote::DEFAULT_QUOTE_BASE_URL;
use crate::types::Money;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// No database configured means the in-memory store.
    pub database_url: Option<String>,
    pub initial_cash: Money,
    pub quote_api_key: String,
    pub quote_base_url: String,
    pub log_format: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|err| PortfolioError::InvalidInput(format!("BIND_ADDR: {err}")))?;

        let initial_cash = match get("INITIAL_CASH") {
            Some(raw) => Decimal::from_str(raw.trim())
                .map_err(|err| PortfolioError::InvalidInput(format!("INITIAL_CASH: {err}")))?,
            None => Decimal::ZERO,
        };
        if initial_cash < Decimal::ZERO {
            return Err(PortfolioError::InvalidInput(
                "INITIAL_CASH must not be negative".into(),
            ));
        }

        Ok(Self {
            bind_addr,
            database_url: get("DATABASE_URL"),
            initial_cash,
            quote_api_key: get("QUOTE_API_KEY").unwrap_or_default(),
            quote_base_url: get("QUOTE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_QUOTE_BASE_URL.to_string()),
            log_format: get("LOG_FORMAT").unwrap_or_else(|| "text".to_string()),
        })
    }
}

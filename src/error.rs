//! Error kinds surfaced by the portfolio core and its collaborators.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not enough cash to enter position: trade costs {required}, cash available {available}")]
    InsufficientFunds {
        required: rust_decimal::Decimal,
        available: rust_decimal::Decimal,
    },

    #[error("cannot find {0} in the portfolio")]
    PositionNotFound(String),

    #[error("cannot sell {requested} shares of {symbol}: only {held} held")]
    OverSell {
        symbol: String,
        requested: u64,
        held: u64,
    },

    #[error("portfolio is in a degenerate state: {0}")]
    DegenerateState(String),

    #[error("position store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("price quote error: {0}")]
    UpstreamQuoteError(String),
}

impl PortfolioError {
    /// Stable machine-readable kind, reported alongside the message.
    pub fn kind(&self) -> &'static str {
        match self {
            PortfolioError::InvalidInput(_) => "invalid_input",
            PortfolioError::InsufficientFunds { .. } => "insufficient_funds",
            PortfolioError::PositionNotFound(_) => "position_not_found",
            PortfolioError::OverSell { .. } => "over_sell",
            PortfolioError::DegenerateState(_) => "degenerate_state",
            PortfolioError::StoreUnavailable(_) => "store_unavailable",
            PortfolioError::UpstreamQuoteError(_) => "upstream_quote_error",
        }
    }
}

impl From<sqlx::Error> for PortfolioError {
    fn from(err: sqlx::Error) -> Self {
        PortfolioError::StoreUnavailable(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for PortfolioError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        PortfolioError::StoreUnavailable(err.to_string())
    }
}

impl From<reqwest::Error> for PortfolioError {
    fn from(err: reqwest::Error) -> Self {
        PortfolioError::UpstreamQuoteError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PortfolioError>;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PortfolioError;
use crate::types::{Money, Qty};

/// Symbol under which the cash balance is stored.
pub const CASH_SYMBOL: &str = "CASH";

/// Partition key shared by every open-position record.
pub const OPEN_POSITION_RECORD_TYPE: &str = "OPEN-POSITION";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashPosition {
    pub balance: Money,
    pub allocation_fraction: Money,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquityPosition {
    pub symbol: String,
    pub shares: Qty,
    pub total_cost_basis: Money,
    pub average_price: Money,
    pub current_price: Money,
    pub allocation_fraction: Money,
    pub percentage_return: Money,
}

/// One holding in the portfolio: the cash balance or a single-symbol equity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    Cash(CashPosition),
    Equity(EquityPosition),
}

impl Position {
    pub fn symbol(&self) -> &str {
        match self {
            Position::Cash(_) => CASH_SYMBOL,
            Position::Equity(equity) => &equity.symbol,
        }
    }

    /// Value counted towards the portfolio total: cash balance or equity cost basis.
    pub fn cost_basis(&self) -> Money {
        match self {
            Position::Cash(cash) => cash.balance,
            Position::Equity(equity) => equity.total_cost_basis,
        }
    }

    pub fn allocation_fraction(&self) -> Money {
        match self {
            Position::Cash(cash) => cash.allocation_fraction,
            Position::Equity(equity) => equity.allocation_fraction,
        }
    }

    pub fn set_allocation_fraction(&mut self, fraction: Money) {
        match self {
            Position::Cash(cash) => cash.allocation_fraction = fraction,
            Position::Equity(equity) => equity.allocation_fraction = fraction,
        }
    }
}

/// Flat shape of an open position as stored and as returned by `GET /positions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub symbol: String,
    pub total_cost_basis: Money,
    pub allocation_fraction: Money,
    pub average_price: Money,
    pub shares: Qty,
    pub current_price: Money,
    #[serde(default)]
    pub percentage_return: Money,
}

impl From<&Position> for PositionRecord {
    fn from(position: &Position) -> Self {
        match position {
            Position::Cash(cash) => PositionRecord {
                symbol: CASH_SYMBOL.to_string(),
                total_cost_basis: cash.balance,
                allocation_fraction: cash.allocation_fraction,
                average_price: Decimal::ZERO,
                shares: 0,
                current_price: Decimal::ZERO,
                percentage_return: Decimal::ZERO,
            },
            Position::Equity(equity) => PositionRecord {
                symbol: equity.symbol.clone(),
                total_cost_basis: equity.total_cost_basis,
                allocation_fraction: equity.allocation_fraction,
                average_price: equity.average_price,
                shares: equity.shares,
                current_price: equity.current_price,
                percentage_return: equity.percentage_return,
            },
        }
    }
}

impl TryFrom<PositionRecord> for Position {
    type Error = PortfolioError;

    fn try_from(record: PositionRecord) -> Result<Self, Self::Error> {
        if record.symbol == CASH_SYMBOL {
            return Ok(Position::Cash(CashPosition {
                balance: record.total_cost_basis,
                allocation_fraction: record.allocation_fraction,
            }));
        }
        // Zero-share equities are deleted on liquidation, so one in the store is corrupt.
        if record.shares == 0 {
            return Err(PortfolioError::DegenerateState(format!(
                "stored position {} has zero shares",
                record.symbol
            )));
        }
        Ok(Position::Equity(EquityPosition {
            symbol: record.symbol,
            shares: record.shares,
            total_cost_basis: record.total_cost_basis,
            average_price: record.average_price,
            current_price: record.current_price,
            allocation_fraction: record.allocation_fraction,
            percentage_return: record.percentage_return,
        }))
    }
}

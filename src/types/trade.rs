use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::PortfolioError;
use crate::types::position::CASH_SYMBOL;
use crate::types::{Money, Qty};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

/// A buy or sell request, consumed once by the trade applier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    #[serde(alias = "Symbol")]
    pub symbol: String,
    #[serde(alias = "Quantity")]
    pub quantity: Qty,
    #[serde(alias = "Price")]
    pub price: Money,
}

impl Trade {
    pub fn new(symbol: &str, quantity: Qty, price: Money) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            quantity,
            price,
        }
    }

    /// Upper-cases the symbol and rejects payloads that can never be applied.
    pub fn validate(mut self) -> Result<Self, PortfolioError> {
        self.symbol = self.symbol.trim().to_uppercase();
        if self.symbol.is_empty() {
            return Err(PortfolioError::InvalidInput("symbol is required".into()));
        }
        if self.symbol == CASH_SYMBOL {
            return Err(PortfolioError::InvalidInput(format!(
                "{CASH_SYMBOL} is reserved for the cash balance"
            )));
        }
        if self.quantity == 0 {
            return Err(PortfolioError::InvalidInput(
                "quantity must be greater than zero".into(),
            ));
        }
        if self.price <= Decimal::ZERO {
            return Err(PortfolioError::InvalidInput(
                "price must be greater than zero".into(),
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn validate_normalises_symbol() {
        let trade = Trade {
            symbol: " aapl ".into(),
            quantity: 1,
            price: dec!(10),
        };
        assert_eq!(trade.validate().unwrap().symbol, "AAPL");
    }

    #[test]
    fn validate_rejects_bad_payloads() {
        for (symbol, quantity, price) in [
            ("", 1, dec!(1)),
            ("cash", 1, dec!(1)),
            ("AAPL", 0, dec!(1)),
            ("AAPL", 1, dec!(0)),
            ("AAPL", 1, dec!(-3.5)),
        ] {
            let trade = Trade {
                symbol: symbol.into(),
                quantity,
                price,
            };
            assert!(matches!(
                trade.validate(),
                Err(PortfolioError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn deserializes_capitalised_keys() {
        let trade: Trade =
            serde_json::from_str(r#"{"Symbol":"TSLA","Quantity":3,"Price":101.5}"#).unwrap();
        assert_eq!(trade.symbol, "TSLA");
        assert_eq!(trade.quantity, 3);
        assert_eq!(trade.price, dec!(101.5));
    }
}

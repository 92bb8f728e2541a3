use crate::error::{PortfolioError, Result};
use crate::portfolio::Portfolio;
use crate::types::Qty;
use crate::types::position::EquityPosition;

/// Result of validating a sell against the held shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SellCheck<'a> {
    /// Index among the portfolio's equities.
    pub index: usize,
    pub position: &'a EquityPosition,
    pub fully_liquidates: bool,
}

/// Looks up `symbol` and checks that `quantity` does not exceed the held shares.
pub fn check_sell<'a>(portfolio: &'a Portfolio, symbol: &str, quantity: Qty) -> Result<SellCheck<'a>> {
    let (index, position) = portfolio
        .find_equity(symbol)
        .ok_or_else(|| PortfolioError::PositionNotFound(symbol.to_string()))?;

    if quantity > position.shares {
        return Err(PortfolioError::OverSell {
            symbol: symbol.to_string(),
            requested: quantity,
            held: position.shares,
        });
    }

    Ok(SellCheck {
        index,
        position,
        fully_liquidates: quantity == position.shares,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::test_support::{cash, equity};
    use rust_decimal_macros::dec;

    fn portfolio() -> Portfolio {
        Portfolio::new(vec![
            cash(dec!(1000)),
            equity("AAPL", 10, dec!(1500)),
            equity("TSLA", 2, dec!(400)),
        ])
        .unwrap()
    }

    #[test]
    fn unknown_symbol() {
        let portfolio = portfolio();
        let err = check_sell(&portfolio, "MSFT", 1).unwrap_err();
        assert!(matches!(err, PortfolioError::PositionNotFound(s) if s == "MSFT"));
    }

    #[test]
    fn cash_is_not_sellable() {
        let portfolio = portfolio();
        let err = check_sell(&portfolio, "CASH", 1).unwrap_err();
        assert!(matches!(err, PortfolioError::PositionNotFound(_)));
    }

    #[test]
    fn over_sell() {
        let portfolio = portfolio();
        let err = check_sell(&portfolio, "TSLA", 3).unwrap_err();
        assert!(matches!(
            err,
            PortfolioError::OverSell { requested: 3, held: 2, .. }
        ));
    }

    #[test]
    fn partial_and_full_liquidation() {
        let portfolio = portfolio();

        let partial = check_sell(&portfolio, "AAPL", 4).unwrap();
        assert_eq!(partial.index, 0);
        assert!(!partial.fully_liquidates);

        let full = check_sell(&portfolio, "TSLA", 2).unwrap();
        assert_eq!(full.index, 1);
        assert_eq!(full.position.symbol, "TSLA");
        assert!(full.fully_liquidates);
    }
}

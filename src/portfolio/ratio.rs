use rust_decimal::Decimal;

use crate::error::{PortfolioError, Result};
use crate::rounding::round_ratio;
use crate::types::Money;
use crate::types::position::Position;

/// Sum of cost basis over every position, cash included.
/// A sum beyond the decimal range means the stored set is corrupt.
pub fn portfolio_total(positions: &[Position]) -> Result<Money> {
    positions.iter().try_fold(Decimal::ZERO, |total, position| {
        total.checked_add(position.cost_basis()).ok_or_else(|| {
            PortfolioError::DegenerateState("portfolio total out of range".into())
        })
    })
}

/// Sets each position's allocation fraction to its share of the portfolio total,
/// rounded to four places. Fails when the total is not positive.
pub fn calculate_portfolio_ratio(positions: &[Position]) -> Result<Vec<Position>> {
    let total = portfolio_total(positions)?;
    if total <= Decimal::ZERO {
        return Err(PortfolioError::DegenerateState(format!(
            "portfolio total is {total}, cannot compute ratios"
        )));
    }

    positions
        .iter()
        .cloned()
        .map(|mut position| {
            let fraction = position.cost_basis().checked_div(total).ok_or_else(|| {
                PortfolioError::DegenerateState(format!(
                    "allocation of {} out of range",
                    position.symbol()
                ))
            })?;
            position.set_allocation_fraction(round_ratio(fraction));
            Ok(position)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::test_support::{cash, equity};
    use rust_decimal_macros::dec;

    fn fractions(positions: &[Position]) -> Vec<Money> {
        positions.iter().map(Position::allocation_fraction).collect()
    }

    #[test]
    fn cash_heavy_portfolio() {
        let positions = vec![
            cash(dec!(1000)),
            equity("AAPL", 1, dec!(100)),
            equity("TSLA", 1, dec!(100)),
        ];
        let result = calculate_portfolio_ratio(&positions).unwrap();
        assert_eq!(fractions(&result), [dec!(0.8333), dec!(0.0833), dec!(0.0833)]);
    }

    #[test]
    fn large_and_small_values() {
        let positions = vec![
            cash(dec!(8612311.44)),
            equity("AAPL", 1, dec!(234424.40)),
            equity("TSLA", 1, dec!(1023.3)),
        ];
        let result = calculate_portfolio_ratio(&positions).unwrap();
        assert_eq!(fractions(&result), [dec!(0.9734), dec!(0.0265), dec!(0.0001)]);
    }

    #[test]
    fn fractions_sum_to_one_within_tolerance() {
        let positions = vec![
            cash(dec!(333.33)),
            equity("A", 3, dec!(123.45)),
            equity("B", 7, dec!(987.65)),
            equity("C", 1, dec!(0.01)),
        ];
        let result = calculate_portfolio_ratio(&positions).unwrap();
        let sum: Money = fractions(&result).into_iter().sum();
        let tolerance = dec!(0.0001) * Decimal::from(result.len());
        assert!((sum - Decimal::ONE).abs() <= tolerance, "sum was {sum}");
    }

    #[test]
    fn order_does_not_change_fractions() {
        let forward = vec![
            cash(dec!(50)),
            equity("A", 1, dec!(20)),
            equity("B", 1, dec!(30)),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let mut a = fractions(&calculate_portfolio_ratio(&forward).unwrap());
        let mut b = fractions(&calculate_portfolio_ratio(&reversed).unwrap());
        b.reverse();
        assert_eq!(a, b);
        a.sort();
        assert_eq!(a, [dec!(0.2), dec!(0.3), dec!(0.5)]);
    }

    #[test]
    fn total_beyond_decimal_range_is_degenerate() {
        let positions = vec![cash(Decimal::MAX), equity("AAPL", 1, dec!(1))];
        assert!(matches!(
            portfolio_total(&positions),
            Err(PortfolioError::DegenerateState(_))
        ));
        assert!(matches!(
            calculate_portfolio_ratio(&positions),
            Err(PortfolioError::DegenerateState(_))
        ));
    }

    #[test]
    fn fraction_beyond_decimal_range_is_degenerate() {
        let mut sold_at_profit = equity("B", 1, dec!(1));
        if let Position::Equity(e) = &mut sold_at_profit {
            e.total_cost_basis = Decimal::MIN;
        }
        let positions = vec![equity("A", 1, Decimal::MAX), sold_at_profit, cash(dec!(0.5))];
        assert!(matches!(
            calculate_portfolio_ratio(&positions),
            Err(PortfolioError::DegenerateState(_))
        ));
    }

    #[test]
    fn zero_total_is_degenerate() {
        let result = calculate_portfolio_ratio(&[cash(dec!(0))]);
        assert!(matches!(result, Err(PortfolioError::DegenerateState(_))));
    }
}

//! Portfolio mutation engine: trade application, sell validation and ratio recomputation.
//! Pure and synchronous; persistence of the result belongs to the caller.

pub mod applier;
pub mod guard;
pub mod ratio;

pub use applier::{PositionChange, TradeOutcome, apply_buy, apply_sell, apply_trade};
pub use guard::{SellCheck, check_sell};
pub use ratio::{calculate_portfolio_ratio, portfolio_total};

use crate::error::{PortfolioError, Result};
use crate::types::Money;
use crate::types::position::{CashPosition, EquityPosition, Position, PositionRecord};

/// The open position set: exactly one cash balance plus the equities, in store order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Portfolio {
    cash: CashPosition,
    // Number of equities listed before the cash record.
    cash_slot: usize,
    equities: Vec<EquityPosition>,
}

impl Portfolio {
    pub fn new(positions: Vec<Position>) -> Result<Self> {
        let mut cash = None;
        let mut cash_slot = 0;
        let mut equities = Vec::with_capacity(positions.len());

        for position in positions {
            match position {
                Position::Cash(found) => {
                    if cash.is_some() {
                        return Err(PortfolioError::DegenerateState(
                            "portfolio has more than one cash position".into(),
                        ));
                    }
                    cash_slot = equities.len();
                    cash = Some(found);
                }
                Position::Equity(equity) => {
                    if equities
                        .iter()
                        .any(|e: &EquityPosition| e.symbol == equity.symbol)
                    {
                        return Err(PortfolioError::DegenerateState(format!(
                            "portfolio holds {} more than once",
                            equity.symbol
                        )));
                    }
                    equities.push(equity);
                }
            }
        }

        let cash = cash.ok_or_else(|| {
            PortfolioError::DegenerateState("portfolio has no cash position".into())
        })?;
        Ok(Self {
            cash,
            cash_slot,
            equities,
        })
    }

    pub fn from_records(records: Vec<PositionRecord>) -> Result<Self> {
        let positions = records
            .into_iter()
            .map(Position::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(positions)
    }

    /// All positions in store order, cash included.
    pub fn positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self
            .equities
            .iter()
            .cloned()
            .map(Position::Equity)
            .collect();
        let slot = self.cash_slot.min(positions.len());
        positions.insert(slot, Position::Cash(self.cash.clone()));
        positions
    }

    pub fn cash(&self) -> &CashPosition {
        &self.cash
    }

    pub fn equities(&self) -> &[EquityPosition] {
        &self.equities
    }

    pub fn find_equity(&self, symbol: &str) -> Option<(usize, &EquityPosition)> {
        self.equities
            .iter()
            .enumerate()
            .find(|(_, equity)| equity.symbol == symbol)
    }

    pub fn total_value(&self) -> Result<Money> {
        portfolio_total(&self.positions())
    }

    /// Recomputes every allocation fraction over the current set.
    pub fn rebalance(&self) -> Result<Self> {
        Self::new(calculate_portfolio_ratio(&self.positions())?)
    }

    pub(crate) fn cash_mut(&mut self) -> &mut CashPosition {
        &mut self.cash
    }

    pub(crate) fn equity_mut(&mut self, index: usize) -> Option<&mut EquityPosition> {
        self.equities.get_mut(index)
    }

    pub(crate) fn push_equity(&mut self, equity: EquityPosition) {
        self.equities.push(equity);
    }

    pub(crate) fn remove_equity(&mut self, index: usize) -> Option<EquityPosition> {
        if index >= self.equities.len() {
            return None;
        }
        if index < self.cash_slot {
            self.cash_slot -= 1;
        }
        Some(self.equities.remove(index))
    }
}

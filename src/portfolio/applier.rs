//! Applies a buy or sell to the position set and reports which records changed.

use rust_decimal::Decimal;

use crate::error::{PortfolioError, Result};
use crate::portfolio::{Portfolio, check_sell};
use crate::rounding::round_money;
use crate::types::Money;
use crate::types::position::{EquityPosition, Position, PositionRecord};
use crate::types::trade::{Trade, TradeSide};

/// A record-level change the caller must persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionChange {
    Insert(PositionRecord),
    Update(PositionRecord),
    Delete(PositionRecord),
}

impl PositionChange {
    pub fn record(&self) -> &PositionRecord {
        match self {
            PositionChange::Insert(r) | PositionChange::Update(r) | PositionChange::Delete(r) => r,
        }
    }
}

/// Everything produced by applying one trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeOutcome {
    pub portfolio: Portfolio,
    pub trade_value: Money,
    pub changes: Vec<PositionChange>,
}

pub fn apply_trade(portfolio: &Portfolio, side: TradeSide, trade: &Trade) -> Result<TradeOutcome> {
    match side {
        TradeSide::Buy => apply_buy(portfolio, trade),
        TradeSide::Sell => apply_sell(portfolio, trade),
    }
}

/// price * quantity, rounded to cents.
fn trade_value(trade: &Trade) -> Result<Money> {
    trade
        .price
        .checked_mul(Decimal::from(trade.quantity))
        .map(round_money)
        .ok_or_else(|| PortfolioError::InvalidInput("trade value out of range".into()))
}

/// Debits cash by the trade value and merges into (or opens) the symbol's position.
/// The input portfolio is never modified; on error nothing needs persisting.
pub fn apply_buy(portfolio: &Portfolio, trade: &Trade) -> Result<TradeOutcome> {
    let trade_value = trade_value(trade)?;
    let available = portfolio.cash().balance;
    if trade_value > available {
        return Err(PortfolioError::InsufficientFunds {
            required: trade_value,
            available,
        });
    }

    let mut next = portfolio.clone();
    next.cash_mut().balance = round_money(available - trade_value);

    let existing = next.find_equity(&trade.symbol).map(|(index, _)| index);
    let created = match existing {
        Some(index) => {
            if let Some(equity) = next.equity_mut(index) {
                merge_buy(equity, trade.quantity, trade_value)?;
            }
            false
        }
        None => {
            next.push_equity(open_position(trade, trade_value));
            true
        }
    };

    let next = next.rebalance()?;
    let changes = next
        .positions()
        .iter()
        .map(|position| match position {
            Position::Equity(equity) if created && equity.symbol == trade.symbol => {
                PositionChange::Insert(PositionRecord::from(position))
            }
            _ => PositionChange::Update(PositionRecord::from(position)),
        })
        .collect();

    Ok(TradeOutcome {
        portfolio: next,
        trade_value,
        changes,
    })
}

fn merge_buy(equity: &mut EquityPosition, quantity: u64, trade_value: Money) -> Result<()> {
    equity.shares = equity
        .shares
        .checked_add(quantity)
        .ok_or_else(|| PortfolioError::InvalidInput("share count out of range".into()))?;
    let cost = equity
        .total_cost_basis
        .checked_add(trade_value)
        .ok_or_else(|| PortfolioError::InvalidInput("cost basis out of range".into()))?;
    equity.total_cost_basis = round_money(cost);
    equity.average_price = round_money(equity.total_cost_basis / Decimal::from(equity.shares));
    Ok(())
}

fn open_position(trade: &Trade, trade_value: Money) -> EquityPosition {
    let price = round_money(trade.price);
    EquityPosition {
        symbol: trade.symbol.clone(),
        shares: trade.quantity,
        total_cost_basis: trade_value,
        average_price: price,
        current_price: price,
        allocation_fraction: Decimal::ZERO,
        percentage_return: Decimal::ZERO,
    }
}

/// Reduces or closes the symbol's position and credits cash once with the sale value.
/// The average price of remaining shares is left as it was.
pub fn apply_sell(portfolio: &Portfolio, trade: &Trade) -> Result<TradeOutcome> {
    let check = check_sell(portfolio, &trade.symbol, trade.quantity)?;
    let (index, fully_liquidates) = (check.index, check.fully_liquidates);
    let sell_value = trade_value(trade)?;

    let mut next = portfolio.clone();
    let mut closed = None;
    if fully_liquidates {
        closed = next.remove_equity(index);
    } else if let Some(equity) = next.equity_mut(index) {
        equity.total_cost_basis = round_money(equity.total_cost_basis - sell_value);
        equity.shares -= trade.quantity;
    }

    let cash = next.cash_mut();
    let balance = cash
        .balance
        .checked_add(sell_value)
        .ok_or_else(|| PortfolioError::InvalidInput("cash balance out of range".into()))?;
    cash.balance = round_money(balance);

    let next = next.rebalance()?;
    let mut changes = Vec::with_capacity(next.equities().len() + 2);
    if let Some(equity) = closed {
        changes.push(PositionChange::Delete(PositionRecord::from(
            &Position::Equity(equity),
        )));
    }
    changes.extend(
        next.positions()
            .iter()
            .map(|position| PositionChange::Update(PositionRecord::from(position))),
    );

    Ok(TradeOutcome {
        portfolio: next,
        trade_value: sell_value,
        changes,
    })
}

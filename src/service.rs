//! Trade submission: read the stored set, apply the trade, write back record by record.
//! One invocation at a time is assumed; there is no locking across invocations.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::{PortfolioError, Result};
use crate::portfolio::{Portfolio, TradeOutcome, apply_trade};
use crate::quote::{QuoteSource, can_refresh_date, previous_day};
use crate::rounding::{round_money, round_ratio};
use crate::store::{PositionStore, persist_changes};
use crate::types::position::{Position, PositionRecord};
use crate::types::trade::{Trade, TradeSide};

pub struct PortfolioService {
    store: Arc<dyn PositionStore>,
    quotes: Arc<dyn QuoteSource>,
}

impl PortfolioService {
    pub fn new(store: Arc<dyn PositionStore>, quotes: Arc<dyn QuoteSource>) -> Self {
        Self { store, quotes }
    }

    pub async fn submit_buy(&self, trade: Trade) -> Result<TradeOutcome> {
        self.submit(TradeSide::Buy, trade).await
    }

    pub async fn submit_sell(&self, trade: Trade) -> Result<TradeOutcome> {
        self.submit(TradeSide::Sell, trade).await
    }

    async fn submit(&self, side: TradeSide, trade: Trade) -> Result<TradeOutcome> {
        let trade = trade.validate()?;
        let portfolio = Portfolio::from_records(self.store.list_open_positions().await?)?;

        let outcome = apply_trade(&portfolio, side, &trade).inspect_err(|err| {
            tracing::info!(
                ?side,
                symbol = %trade.symbol,
                quantity = trade.quantity,
                kind = err.kind(),
                "trade rejected: {err}"
            );
        })?;

        persist_changes(self.store.as_ref(), &outcome.changes).await?;
        tracing::info!(
            ?side,
            symbol = %trade.symbol,
            quantity = trade.quantity,
            trade_value = %outcome.trade_value,
            cash = %outcome.portfolio.cash().balance,
            "trade applied"
        );
        Ok(outcome)
    }

    /// Stored records, verbatim.
    pub async fn list_positions(&self) -> Result<Vec<PositionRecord>> {
        self.store.list_open_positions().await
    }

    /// Updates each equity's current price and return from the previous day's close.
    /// Returns the number of positions refreshed; 0 on days with no new data.
    pub async fn refresh_prices(&self, today: NaiveDate) -> Result<usize> {
        if !can_refresh_date(today) {
            tracing::info!(%today, "no new price data for this day, skipping refresh");
            return Ok(0);
        }
        let date = previous_day(today);
        let portfolio = Portfolio::from_records(self.store.list_open_positions().await?)?;

        let mut refreshed = 0;
        for equity in portfolio.equities() {
            let close = self
                .quotes
                .get_price_on_date(&equity.symbol, &date)
                .await
                .map_err(|err| match err {
                    PortfolioError::UpstreamQuoteError(_) | PortfolioError::InvalidInput(_) => err,
                    other => PortfolioError::UpstreamQuoteError(other.to_string()),
                })?;

            let mut updated = equity.clone();
            updated.current_price = round_money(close);
            if !updated.average_price.is_zero() {
                let ratio = (updated.current_price - updated.average_price)
                    .checked_div(updated.average_price)
                    .ok_or_else(|| {
                        PortfolioError::DegenerateState(format!(
                            "return on {} out of range",
                            updated.symbol
                        ))
                    })?;
                updated.percentage_return = round_ratio(ratio);
            }
            self.store
                .update(&PositionRecord::from(&Position::Equity(updated)))
                .await?;
            refreshed += 1;
        }

        tracing::info!(%date, refreshed, "prices refreshed");
        Ok(refreshed)
    }
}

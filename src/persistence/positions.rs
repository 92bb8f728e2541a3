//! Open-position persistence in Postgres: one row per (record_type, symbol).

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::{PortfolioError, Result};
use crate::store::PositionStore;
use crate::types::position::{OPEN_POSITION_RECORD_TYPE, PositionRecord};

#[derive(Debug, sqlx::FromRow)]
pub struct PositionRow {
    pub symbol: String,
    pub total_cost_basis: Decimal,
    pub allocation_fraction: Decimal,
    pub average_price: Decimal,
    pub shares: i64,
    pub current_price: Decimal,
    pub percentage_return: Decimal,
}

/// A negative share count means the stored set is corrupt.
pub fn position_row_to_record(row: PositionRow) -> Result<PositionRecord> {
    let shares = u64::try_from(row.shares).map_err(|_| {
        PortfolioError::DegenerateState(format!(
            "stored {} has negative share count {}",
            row.symbol, row.shares
        ))
    })?;
    Ok(PositionRecord {
        symbol: row.symbol,
        total_cost_basis: row.total_cost_basis,
        allocation_fraction: row.allocation_fraction,
        average_price: row.average_price,
        shares,
        current_price: row.current_price,
        percentage_return: row.percentage_return,
    })
}

fn shares_column(record: &PositionRecord) -> Result<i64> {
    i64::try_from(record.shares).map_err(|_| {
        PortfolioError::InvalidInput(format!("share count for {} out of range", record.symbol))
    })
}

/// Postgres-backed `PositionStore`.
#[derive(Debug, Clone)]
pub struct PgPositionStore {
    pool: PgPool,
}

impl PgPositionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PositionStore for PgPositionStore {
    async fn list_open_positions(&self) -> Result<Vec<PositionRecord>> {
        let rows = sqlx::query_as::<_, PositionRow>(
            "SELECT symbol, total_cost_basis, allocation_fraction, average_price, shares, \
             current_price, percentage_return \
             FROM open_positions WHERE record_type = $1 ORDER BY symbol",
        )
        .bind(OPEN_POSITION_RECORD_TYPE)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(position_row_to_record).collect()
    }

    async fn insert(&self, record: &PositionRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO open_positions (record_type, symbol, total_cost_basis, allocation_fraction, \
             average_price, shares, current_price, percentage_return) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(OPEN_POSITION_RECORD_TYPE)
        .bind(&record.symbol)
        .bind(record.total_cost_basis)
        .bind(record.allocation_fraction)
        .bind(record.average_price)
        .bind(shares_column(record)?)
        .bind(record.current_price)
        .bind(record.percentage_return)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, record: &PositionRecord) -> Result<()> {
        let result = sqlx::query(
            "UPDATE open_positions SET total_cost_basis = $3, allocation_fraction = $4, \
             average_price = $5, shares = $6, current_price = $7, percentage_return = $8 \
             WHERE record_type = $1 AND symbol = $2",
        )
        .bind(OPEN_POSITION_RECORD_TYPE)
        .bind(&record.symbol)
        .bind(record.total_cost_basis)
        .bind(record.allocation_fraction)
        .bind(record.average_price)
        .bind(shares_column(record)?)
        .bind(record.current_price)
        .bind(record.percentage_return)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(PortfolioError::StoreUnavailable(format!(
                "record {} not found",
                record.symbol
            )));
        }
        Ok(())
    }

    async fn delete(&self, record: &PositionRecord) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM open_positions WHERE record_type = $1 AND symbol = $2")
                .bind(OPEN_POSITION_RECORD_TYPE)
                .bind(&record.symbol)
                .execute(&self.pool)
                .await?;
        if result.rows_affected() == 0 {
            return Err(PortfolioError::StoreUnavailable(format!(
                "record {} not found",
                record.symbol
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(symbol: &str, shares: i64) -> PositionRow {
        PositionRow {
            symbol: symbol.to_string(),
            total_cost_basis: dec!(150),
            allocation_fraction: dec!(0.5),
            average_price: dec!(150),
            shares,
            current_price: dec!(160),
            percentage_return: dec!(0.0667),
        }
    }

    #[test]
    fn row_maps_onto_record() {
        let record = position_row_to_record(row("AAPL", 1)).unwrap();
        assert_eq!(record.symbol, "AAPL");
        assert_eq!(record.shares, 1);
        assert_eq!(record.current_price, dec!(160));
        assert_eq!(shares_column(&record).unwrap(), 1);
    }

    #[test]
    fn negative_shares_are_degenerate() {
        let err = position_row_to_record(row("AAPL", -3)).unwrap_err();
        assert_eq!(err.kind(), "degenerate_state");
    }

    #[test]
    fn share_count_beyond_column_range_is_rejected() {
        let mut record = position_row_to_record(row("AAPL", 1)).unwrap();
        record.shares = u64::MAX;
        assert_eq!(shares_column(&record).unwrap_err().kind(), "invalid_input");
    }
}

//! Connecting the Postgres position store.

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::error::{PortfolioError, Result};
use crate::persistence::PgPositionStore;
use crate::types::position::{CASH_SYMBOL, OPEN_POSITION_RECORD_TYPE};

const MAX_CONNECTIONS: u32 = 5;

/// Connects to `database_url`, brings the `open_positions` table up to date and
/// checks the seeded cash record is there.
pub async fn connect_position_store(database_url: &str) -> Result<PgPositionStore> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await?;
    migrate_open_positions(&pool).await?;
    Ok(PgPositionStore::new(pool))
}

/// Creates `open_positions` and seeds a zero cash balance when none exists.
/// An existing cash record is left as it is.
pub async fn migrate_open_positions(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    let cash_records: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM open_positions WHERE record_type = $1 AND symbol = $2",
    )
    .bind(OPEN_POSITION_RECORD_TYPE)
    .bind(CASH_SYMBOL)
    .fetch_one(pool)
    .await?;
    if cash_records != 1 {
        return Err(PortfolioError::DegenerateState(format!(
            "expected one cash record after migration, found {cash_records}"
        )));
    }
    tracing::info!("open_positions schema ready");
    Ok(())
}

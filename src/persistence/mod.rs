//! Database layer: pool, migrations, and the Postgres position store.

mod pool;
mod positions;

pub use pool::{connect_position_store, migrate_open_positions};
pub use positions::{PgPositionStore, PositionRow, position_row_to_record};
pub use sqlx::PgPool;

//! Position store boundary: the trait the service persists through, plus the in-memory store.

mod memory;

pub use memory::MemoryPositionStore;

use async_trait::async_trait;

use crate::error::{PortfolioError, Result};
use crate::portfolio::PositionChange;
use crate::types::position::PositionRecord;

/// Authoritative list of open positions, keyed by `(OPEN-POSITION, symbol)`.
#[async_trait]
pub trait PositionStore: Send + Sync + 'static {
    async fn list_open_positions(&self) -> Result<Vec<PositionRecord>>;

    /// Fails if a record with the same symbol already exists.
    async fn insert(&self, record: &PositionRecord) -> Result<()>;

    /// Fails if no record with this symbol exists.
    async fn update(&self, record: &PositionRecord) -> Result<()>;

    /// Fails if no record with this symbol exists.
    async fn delete(&self, record: &PositionRecord) -> Result<()>;
}

/// Writes changes one record at a time, in order. Stops at the first failure;
/// records already written stay written.
pub async fn persist_changes(store: &dyn PositionStore, changes: &[PositionChange]) -> Result<()> {
    for (written, change) in changes.iter().enumerate() {
        let result = match change {
            PositionChange::Insert(record) => store.insert(record).await,
            PositionChange::Update(record) => store.update(record).await,
            PositionChange::Delete(record) => store.delete(record).await,
        };
        if let Err(err) = result {
            tracing::error!(
                symbol = %change.record().symbol,
                written,
                total = changes.len(),
                error = %err,
                "persisting trade stopped part way; store may hold a partially applied trade"
            );
            return Err(match err {
                PortfolioError::StoreUnavailable(_) => err,
                other => PortfolioError::StoreUnavailable(other.to_string()),
            });
        }
    }
    Ok(())
}

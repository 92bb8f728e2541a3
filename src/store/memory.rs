use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::error::{PortfolioError, Result};
use crate::store::PositionStore;
use crate::types::Money;
use crate::types::position::{CASH_SYMBOL, PositionRecord};

/// In-process store. Cloning shares the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryPositionStore {
    records: Arc<RwLock<Vec<PositionRecord>>>,
}

impl MemoryPositionStore {
    pub fn new(records: Vec<PositionRecord>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    /// Store holding only a cash balance, fully allocated to cash.
    pub fn with_cash(balance: Money) -> Self {
        let allocation_fraction = if balance > Decimal::ZERO {
            Decimal::ONE
        } else {
            Decimal::ZERO
        };
        Self::new(vec![PositionRecord {
            symbol: CASH_SYMBOL.to_string(),
            total_cost_basis: balance,
            allocation_fraction,
            average_price: Decimal::ZERO,
            shares: 0,
            current_price: Decimal::ZERO,
            percentage_return: Decimal::ZERO,
        }])
    }

    pub async fn snapshot(&self) -> Vec<PositionRecord> {
        self.records.read().await.clone()
    }
}

#[async_trait]
impl PositionStore for MemoryPositionStore {
    async fn list_open_positions(&self) -> Result<Vec<PositionRecord>> {
        Ok(self.records.read().await.clone())
    }

    async fn insert(&self, record: &PositionRecord) -> Result<()> {
        let mut guard = self.records.write().await;
        if guard.iter().any(|r| r.symbol == record.symbol) {
            return Err(PortfolioError::StoreUnavailable(format!(
                "record {} already exists",
                record.symbol
            )));
        }
        guard.push(record.clone());
        Ok(())
    }

    async fn update(&self, record: &PositionRecord) -> Result<()> {
        let mut guard = self.records.write().await;
        let existing = guard
            .iter_mut()
            .find(|r| r.symbol == record.symbol)
            .ok_or_else(|| {
                PortfolioError::StoreUnavailable(format!("record {} not found", record.symbol))
            })?;
        *existing = record.clone();
        Ok(())
    }

    async fn delete(&self, record: &PositionRecord) -> Result<()> {
        let mut guard = self.records.write().await;
        let before = guard.len();
        guard.retain(|r| r.symbol != record.symbol);
        if guard.len() == before {
            return Err(PortfolioError::StoreUnavailable(format!(
                "record {} not found",
                record.symbol
            )));
        }
        Ok(())
    }
}

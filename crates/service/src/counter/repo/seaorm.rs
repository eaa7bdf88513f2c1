use std::sync::atomic::{AtomicBool, Ordering};

use models::player;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::{debug, info};

use crate::counter::errors::CounterError;
use crate::counter::repository::CounterStore;

/// Counter store on the `player` table.
///
/// Increments run as one transaction that starts with the conditional
/// `UPDATE`, so the write lock is held before the new value is read back.
/// Until `ensure_initialized` has succeeded once, query failures are reported
/// as `NotInitialized` because the schema may not exist yet.
pub struct SeaOrmCounterStore {
    db: DatabaseConnection,
    initialized: AtomicBool,
}

impl SeaOrmCounterStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db, initialized: AtomicBool::new(false) }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn classify(&self, e: impl Into<CounterError>) -> CounterError {
        match e.into() {
            CounterError::StorageUnavailable(_) if !self.initialized.load(Ordering::Acquire) => {
                CounterError::NotInitialized
            }
            other => other,
        }
    }

    async fn increment_in_txn(&self) -> Result<i64, CounterError> {
        let txn = self.db.begin().await.map_err(CounterError::storage)?;
        // dropping `txn` on any early return, failed commit included, rolls it back
        let money = apply_increment(&txn).await?;
        txn.commit().await.map_err(CounterError::storage)?;
        Ok(money)
    }
}

/// Write and read back inside `txn`; nothing is visible until the caller commits.
async fn apply_increment(txn: &DatabaseTransaction) -> Result<i64, CounterError> {
    if player::add_one(txn).await? == 0 {
        return Err(CounterError::NotInitialized);
    }
    player::find(txn)
        .await?
        .map(|p| p.money)
        .ok_or(CounterError::NotInitialized)
}

#[async_trait::async_trait]
impl CounterStore for SeaOrmCounterStore {
    async fn ensure_initialized(&self) -> Result<(), CounterError> {
        models::db::migrate(&self.db).await.map_err(CounterError::storage)?;
        if player::insert_if_absent(&self.db).await? {
            info!(event = "counter_created", player_id = player::PLAYER_ID, "counter row created with money=0");
        } else {
            debug!(event = "counter_present", player_id = player::PLAYER_ID, "counter row already exists");
        }
        self.initialized.store(true, Ordering::Release);
        Ok(())
    }

    async fn read(&self) -> Result<i64, CounterError> {
        let row = player::find(&self.db).await.map_err(|e| self.classify(e))?;
        row.map(|p| p.money).ok_or(CounterError::NotInitialized)
    }

    async fn increment_and_get(&self) -> Result<i64, CounterError> {
        self.increment_in_txn().await.map_err(|e| self.classify(e))
    }
}

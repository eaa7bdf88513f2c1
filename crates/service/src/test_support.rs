#![cfg(test)]
use crate::counter::repo::seaorm::SeaOrmCounterStore;

/// Counter store on a private in-memory database with no schema yet.
pub async fn memory_store() -> Result<SeaOrmCounterStore, anyhow::Error> {
    let db = models::db::connect_in_memory().await?;
    Ok(SeaOrmCounterStore::new(db))
}

use std::time::Duration;

use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

pub use configs::DatabaseConfig;

/// Lifetime given to the single in-memory connection. sqlx would otherwise
/// recycle it after its 30 minute default and hand back an empty database.
pub const MEMORY_CONNECTION_LIFETIME: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Build a pool from config. SQLite pools are capped at one connection so
/// writers queue on the pool instead of failing with `SQLITE_BUSY`.
pub async fn connect_with_config(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(cfg.url.clone());
    let (max, min) = if cfg.is_sqlite() {
        (1, 1)
    } else {
        (cfg.max_connections, cfg.min_connections)
    };
    opt.max_connections(max)
        .min_connections(min)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .sqlx_logging(cfg.sqlx_logging);
    // in-memory databases vanish with their connection; keep it for the life of the process
    let (idle, lifetime) = if cfg.url.contains(":memory:") {
        (MEMORY_CONNECTION_LIFETIME, MEMORY_CONNECTION_LIFETIME)
    } else {
        (Duration::from_secs(cfg.idle_timeout_secs), Duration::from_secs(cfg.max_lifetime_secs))
    };
    opt.idle_timeout(idle).max_lifetime(lifetime);
    let db = Database::connect(opt).await?;
    info!(event = "db_connected", sqlite = cfg.is_sqlite(), max_connections = max, "database pool ready");
    Ok(db)
}

/// Fresh private in-memory SQLite database, for tests and throwaway runs.
pub async fn connect_in_memory() -> anyhow::Result<DatabaseConnection> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    connect_with_config(&cfg).await
}

/// Apply pending migrations; a no-op when the schema is current.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    migration::Migrator::up(db, None).await
}

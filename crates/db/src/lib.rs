//! Database layer: pool construction, connection leases, and the book store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use booklist_kernel::settings::DatabaseSettings;
use booklist_kernel::{InitCtx, Module};
use secrecy::ExposeSecret;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::MySqlPool;

pub mod error;
pub mod lease;
pub mod memory;
pub mod models;
pub mod mysql;
pub mod store;

pub use error::{DbError, StoreError};
pub use lease::Lease;
pub use memory::MemoryBookStore;
pub use models::{normalize_delimited, Book, PageWindow, SearchPage, TitleRow};
pub use mysql::MySqlBookStore;
pub use store::BookStore;

/// Build the bounded pool without opening a connection yet.
pub fn build_pool(settings: &DatabaseSettings) -> MySqlPool {
    let options = MySqlConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .database(&settings.name)
        .username(&settings.user)
        .password(settings.password.expose_secret())
        .timezone(settings.timezone.clone());

    MySqlPoolOptions::new()
        .max_connections(settings.max_connections.max(1))
        .acquire_timeout(Duration::from_millis(settings.acquire_timeout_ms))
        .connect_lazy_with(options)
}

/// Open the pool and prove the database answers, the way the server does at boot.
pub async fn connect(settings: &DatabaseSettings) -> Result<MySqlPool, DbError> {
    let pool = build_pool(settings);
    ping(&pool, &settings.endpoint()).await?;
    Ok(pool)
}

async fn ping(pool: &MySqlPool, endpoint: &str) -> Result<(), DbError> {
    use sqlx::Connection;

    let mut conn = pool.acquire().await.map_err(|source| DbError::Connect {
        endpoint: endpoint.to_string(),
        source,
    })?;
    conn.ping().await.map_err(|source| DbError::Ping {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// Core module owning the pool's lifecycle: ping on init, close on stop.
pub struct DatabaseModule {
    pool: MySqlPool,
}

impl DatabaseModule {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Store handle sharing this module's pool.
    pub fn store(&self) -> Arc<dyn BookStore> {
        Arc::new(MySqlBookStore::new(self.pool.clone()))
    }
}

#[async_trait]
impl Module for DatabaseModule {
    fn name(&self) -> &'static str {
        "db"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let endpoint = ctx.settings.database.endpoint();
        tracing::info!(module = self.name(), db = %endpoint, "pinging database");
        ping(&self.pool, &endpoint).await?;
        tracing::info!(
            module = self.name(),
            max_connections = ctx.settings.database.max_connections,
            "database reachable"
        );
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.pool.close().await;
        tracing::info!(module = self.name(), "database pool closed");
        Ok(())
    }
}

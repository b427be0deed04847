use crate::db;
use crate::error::FitError;
use anyhow::Result;
use log::info;
use sqlx::SqlitePool;

/// Owns the pool; every operation borrows a connection for its own duration.
#[derive(Clone)]
pub struct Tracker {
    pub db_pool: SqlitePool,
}

impl Tracker {
    /// Opens (creating if needed) the database at `db_url` and applies the schema.
    pub async fn new(db_url: &str) -> Result<Self> {
        let pool = db::connect(db_url).await?;
        info!("Opened fitness database at {}", db_url);
        Ok(Self { db_pool: pool })
    }

    /// Opens the database named by the process-wide path (`DATABASE_URL` by default).
    pub async fn from_env() -> Result<Self> {
        Self::new(db::get_db_path().await).await
    }

    pub async fn open_in_memory() -> Result<Self> {
        Self::new("sqlite::memory:").await
    }

    /// Deletes every record, leaving the schema in place.
    pub async fn reset(&self) -> Result<(), FitError> {
        db::clear_all_tables(&self.db_pool).await?;
        info!("All records cleared");
        Ok(())
    }

    pub async fn close(&self) {
        self.db_pool.close().await;
    }
}

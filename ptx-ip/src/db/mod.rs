//! Database access layer for ptx-ip
//!
//! SQLite via sqlx. Tables are created on startup if missing; the schema is
//! limited to what provisioning writes.

use std::path::Path;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

pub mod models;
pub mod organizations;
pub mod schema;
pub mod users;

pub use models::{Organization, User, UserOrganization};

/// Open (creating if needed) the database and ensure the schema exists
pub async fn init_database(db_path: &Path) -> ptx_common::Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    // WAL lets readers proceed while a provisioning write is in progress
    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    prepare(&pool).await?;
    Ok(pool)
}

/// Single-connection in-memory database with the schema applied
///
/// Every connection to `sqlite::memory:` is a separate database, so the
/// pool is capped at one connection.
pub async fn init_in_memory() -> ptx_common::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    prepare(&pool).await?;
    Ok(pool)
}

async fn prepare(pool: &SqlitePool) -> ptx_common::Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;
    schema::create_tables(pool).await?;
    Ok(())
}

//! Table creation (idempotent)

use sqlx::SqlitePool;

/// Create every provisioning table if it does not exist
pub async fn create_tables(pool: &SqlitePool) -> sqlx::Result<()> {
    create_organizations_table(pool).await?;
    create_users_table(pool).await?;
    create_user_organizations_table(pool).await?;
    Ok(())
}

pub async fn create_organizations_table(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS organizations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            uuid TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn create_users_table(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            auth0_id TEXT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            cell TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            is_superadmin INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Link table; no UNIQUE(user_id, organization_id, role), repeat links are kept
pub async fn create_user_organizations_table(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user_organizations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL REFERENCES users(id),
            organization_id INTEGER NOT NULL REFERENCES organizations(id),
            role TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_user_organizations_user ON user_organizations(user_id)",
    )
    .execute(pool)
    .await?;

    Ok(())
}

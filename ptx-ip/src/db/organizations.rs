//! Organization queries

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::models::Organization;

/// Insert a new organization
pub async fn insert_organization(pool: &SqlitePool, name: &str) -> sqlx::Result<Organization> {
    sqlx::query_as::<_, Organization>(
        r#"
        INSERT INTO organizations (uuid, name, created_at)
        VALUES (?, ?, ?)
        RETURNING id, uuid, name, created_at
        "#,
    )
    .bind(Uuid::new_v4().to_string())
    .bind(name)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
}

pub async fn get_organization(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Organization>> {
    sqlx::query_as::<_, Organization>(
        "SELECT id, uuid, name, created_at FROM organizations WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

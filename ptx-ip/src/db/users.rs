//! User and user-organization queries
//!
//! Functions take any SQLite executor so provisioning can run them inside
//! one transaction.

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};

use super::models::{User, UserOrganization};

const USER_COLUMNS: &str =
    "id, auth0_id, first_name, last_name, cell, email, is_superadmin, created_at";

/// Fields written when a user is created or updated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserFields<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub cell: &'a str,
    pub is_superadmin: bool,
}

pub async fn find_user_by_email<'e, E>(executor: E, email: &str) -> sqlx::Result<Option<User>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
        .bind(email)
        .fetch_optional(executor)
        .await
}

pub async fn insert_user<'e, E>(
    executor: E,
    email: &str,
    auth0_id: Option<&str>,
    fields: &UserFields<'_>,
) -> sqlx::Result<User>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (auth0_id, first_name, last_name, cell, email, is_superadmin, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(auth0_id)
    .bind(fields.first_name)
    .bind(fields.last_name)
    .bind(fields.cell)
    .bind(email)
    .bind(fields.is_superadmin)
    .bind(Utc::now())
    .fetch_one(executor)
    .await
}

/// Overwrite the mutable fields of an existing user
pub async fn update_user<'e, E>(executor: E, id: i64, fields: &UserFields<'_>) -> sqlx::Result<User>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET first_name = ?, last_name = ?, cell = ?, is_superadmin = ?
        WHERE id = ?
        RETURNING {}
        "#,
        USER_COLUMNS
    ))
    .bind(fields.first_name)
    .bind(fields.last_name)
    .bind(fields.cell)
    .bind(fields.is_superadmin)
    .bind(id)
    .fetch_one(executor)
    .await
}

/// Link a user to an organization; the role is stored upper-cased
///
/// Always inserts, even if an identical link exists.
pub async fn insert_user_organization<'e, E>(
    executor: E,
    user_id: i64,
    organization_id: i64,
    role: &str,
) -> sqlx::Result<UserOrganization>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, UserOrganization>(
        r#"
        INSERT INTO user_organizations (user_id, organization_id, role)
        VALUES (?, ?, ?)
        RETURNING id, user_id, organization_id, role
        "#,
    )
    .bind(user_id)
    .bind(organization_id)
    .bind(role.to_uppercase())
    .fetch_one(executor)
    .await
}

pub async fn list_user_organizations(
    pool: &SqlitePool,
    user_id: i64,
) -> sqlx::Result<Vec<UserOrganization>> {
    sqlx::query_as::<_, UserOrganization>(
        "SELECT id, user_id, organization_id, role FROM user_organizations WHERE user_id = ? ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn count_users(pool: &SqlitePool) -> sqlx::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

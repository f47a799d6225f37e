//! Database models
//!
//! Serialized as-is in provisioning responses.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Organization {
    pub id: i64,
    pub uuid: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    /// Identity-provider account id; null for users created elsewhere
    pub auth0_id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub cell: String,
    pub email: String,
    pub is_superadmin: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct UserOrganization {
    pub id: i64,
    pub user_id: i64,
    pub organization_id: i64,
    /// Always upper case (`ADMIN`, `TEXTER`, ...)
    pub role: String,
}

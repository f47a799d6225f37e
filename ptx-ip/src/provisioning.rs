//! Provisioning writes
//!
//! Payload shape checks, and the organization/user writes behind the two
//! endpoints. The user write is a two-way outcome: a brand-new user (which
//! first needs an identity-provider account) or an update of the row that
//! already owns the email.
//!
//! Organization links are inserted on every call. Repeating a call for the
//! same user and organization therefore yields duplicate link rows.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::db::models::{Organization, User};
use crate::db::{organizations, users};
use crate::error::{ApiError, ApiResult};
use crate::identity::{AccountCreation, IdentityProvider};

pub const ORGANIZATION_ATTRIBUTES: [&str; 1] = ["name"];

pub const USER_ATTRIBUTES: [&str; 7] = [
    "email",
    "first_name",
    "last_name",
    "cell",
    "organization_id",
    "role",
    "is_superadmin",
];

pub const ORGANIZATION_ATTRIBUTES_MISSING: &str = "Organization attributes missing.";
pub const USER_ATTRIBUTES_MISSING: &str = "User attributes missing.";
pub const ORGANIZATION_NOT_FOUND: &str = "Organization not found.";

/// True when `payload` is an object carrying every key in `required`
///
/// Presence is all that is checked; a `null` value still counts.
pub fn has_attributes(payload: &Value, required: &[&str]) -> bool {
    payload
        .as_object()
        .is_some_and(|obj| required.iter().all(|key| obj.contains_key(*key)))
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(deserialize_with = "string_or_number")]
    pub cell: String,
    #[serde(deserialize_with = "id_from_string_or_number")]
    pub organization_id: i64,
    pub role: String,
    #[serde(deserialize_with = "flag")]
    pub is_superadmin: bool,
}

impl CreateOrganizationRequest {
    pub fn from_payload(payload: &Value) -> ApiResult<Self> {
        parse_payload(payload, &ORGANIZATION_ATTRIBUTES, ORGANIZATION_ATTRIBUTES_MISSING)
    }
}

impl CreateUserRequest {
    pub fn from_payload(payload: &Value) -> ApiResult<Self> {
        parse_payload(payload, &USER_ATTRIBUTES, USER_ATTRIBUTES_MISSING)
    }

    fn fields(&self) -> users::UserFields<'_> {
        users::UserFields {
            first_name: &self.first_name,
            last_name: &self.last_name,
            cell: &self.cell,
            is_superadmin: self.is_superadmin,
        }
    }
}

fn parse_payload<T: serde::de::DeserializeOwned>(
    payload: &Value,
    required: &[&str],
    message: &str,
) -> ApiResult<T> {
    if !has_attributes(payload, required) {
        return Err(ApiError::BadRequest(message.to_string()));
    }
    T::deserialize(payload).map_err(|e| {
        tracing::debug!("Payload rejected: {}", e);
        ApiError::BadRequest(message.to_string())
    })
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("expected string or number, got {}", other))),
    }
}

fn id_from_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom("id must be an integer")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom("id must be an integer")),
        other => Err(serde::de::Error::custom(format!("expected id, got {}", other))),
    }
}

fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::String(s) if s.eq_ignore_ascii_case("true") => Ok(true),
        Value::String(s) if s.eq_ignore_ascii_case("false") => Ok(false),
        other => Err(serde::de::Error::custom(format!("expected boolean, got {}", other))),
    }
}

/// Result of a user provisioning write
#[derive(Debug, Clone, PartialEq)]
pub enum ProvisionOutcome {
    /// No user had the email; identity account and local row created
    Created(User),
    /// Existing row updated in place
    Updated(User),
}

impl ProvisionOutcome {
    pub fn user(&self) -> &User {
        match self {
            ProvisionOutcome::Created(user) | ProvisionOutcome::Updated(user) => user,
        }
    }

    pub fn into_user(self) -> User {
        match self {
            ProvisionOutcome::Created(user) | ProvisionOutcome::Updated(user) => user,
        }
    }
}

/// Insert a new organization
pub async fn create_organization(
    db: &SqlitePool,
    request: &CreateOrganizationRequest,
) -> ApiResult<Organization> {
    let org = organizations::insert_organization(db, &request.name).await?;
    info!(id = org.id, name = %org.name, "Organization provisioned");
    Ok(org)
}

/// Create or update the user owning `request.email`
///
/// The organization must exist before any identity account is requested,
/// so a bad `organization_id` never leaves a remote account without a local
/// row. A non-success identity-provider response aborts before anything is
/// written locally and surfaces as [`ApiError::Upstream`].
pub async fn create_or_update_user(
    db: &SqlitePool,
    identity: &dyn IdentityProvider,
    request: &CreateUserRequest,
) -> ApiResult<ProvisionOutcome> {
    if organizations::get_organization(db, request.organization_id)
        .await?
        .is_none()
    {
        warn!(organization_id = request.organization_id, "User provisioning for unknown organization");
        return Err(ApiError::BadRequest(ORGANIZATION_NOT_FOUND.to_string()));
    }

    match users::find_user_by_email(db, &request.email).await? {
        Some(existing) => update_existing_user(db, existing.id, request).await,
        None => create_new_user(db, identity, request).await,
    }
}

async fn create_new_user(
    db: &SqlitePool,
    identity: &dyn IdentityProvider,
    request: &CreateUserRequest,
) -> ApiResult<ProvisionOutcome> {
    let auth0_id = match identity.create_account(&request.email).await? {
        AccountCreation::Created { user_id } => user_id,
        AccountCreation::Rejected { status, body } => {
            return Err(ApiError::Upstream { status, body });
        }
    };

    let mut tx = db.begin().await?;
    let user = users::insert_user(&mut *tx, &request.email, Some(&auth0_id), &request.fields()).await?;
    users::insert_user_organization(&mut *tx, user.id, request.organization_id, &request.role).await?;
    tx.commit().await?;

    info!(user_id = user.id, email = %user.email, "User provisioned");
    Ok(ProvisionOutcome::Created(user))
}

async fn update_existing_user(
    db: &SqlitePool,
    user_id: i64,
    request: &CreateUserRequest,
) -> ApiResult<ProvisionOutcome> {
    let mut tx = db.begin().await?;
    let user = users::update_user(&mut *tx, user_id, &request.fields()).await?;
    users::insert_user_organization(&mut *tx, user.id, request.organization_id, &request.role).await?;
    tx.commit().await?;

    info!(user_id = user.id, email = %user.email, "User updated");
    Ok(ProvisionOutcome::Updated(user))
}

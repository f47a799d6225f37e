//! Provisioning endpoints
//!
//! - `POST /integration/<provider>/create/organization`
//! - `POST /integration/<provider>/create/user`
//!
//! Both sit behind [`shared_secret_middleware`](super::auth::shared_secret_middleware),
//! so by the time a handler runs the body has been parsed and authenticated.

use axum::{extract::State, Extension, Json};

use crate::api::auth::Payload;
use crate::db::models::{Organization, User};
use crate::error::ApiResult;
use crate::provisioning::{self, CreateOrganizationRequest, CreateUserRequest, ProvisionOutcome};
use crate::AppState;

/// POST /integration/<provider>/create/organization
///
/// **Request:** `{"<provider>_shared_secret": "...", "name": "..."}`
/// **Response:** the created organization row
///
/// **Errors:**
/// - 401: invalid shared secret
/// - 400: `name` missing
pub async fn create_organization(
    State(state): State<AppState>,
    Extension(Payload(payload)): Extension<Payload>,
) -> ApiResult<Json<Organization>> {
    let request = CreateOrganizationRequest::from_payload(&payload)?;
    let org = provisioning::create_organization(&state.db, &request).await?;
    Ok(Json(org))
}

/// POST /integration/<provider>/create/user
///
/// **Request:** shared secret plus `email, first_name, last_name, cell,
/// organization_id, role, is_superadmin`
/// **Response:** the created or updated user row
///
/// **Errors:**
/// - 401: invalid shared secret
/// - 400: any attribute missing, or `organization_id` names no organization
/// - 502: identity provider unreachable
/// - identity-provider status and raw body when account creation is refused
pub async fn create_user(
    State(state): State<AppState>,
    Extension(Payload(payload)): Extension<Payload>,
) -> ApiResult<Json<User>> {
    let request = CreateUserRequest::from_payload(&payload)?;
    let outcome: ProvisionOutcome =
        provisioning::create_or_update_user(&state.db, state.identity.as_ref(), &request).await?;
    Ok(Json(outcome.into_user()))
}

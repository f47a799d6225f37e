//! ptx-ip library - Integration Provisioning service
//!
//! Lets an external partner system provision organizations and users over
//! two shared-secret-authenticated endpoints:
//! - `POST /integration/<provider>/create/organization`
//! - `POST /integration/<provider>/create/user`
//!
//! New users also get an identity-provider account before the local row is
//! written.

use std::sync::Arc;

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod identity;
pub mod provisioning;

pub use crate::config::ProvisioningConfig;
pub use crate::error::{ApiError, ApiResult};
pub use crate::identity::{Auth0Client, IdentityProvider};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Injected at construction; never re-read from the environment
    pub config: Arc<ProvisioningConfig>,
    /// Identity provider used when a user is provisioned for the first time
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: ProvisioningConfig, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            identity,
        }
    }
}

/// Build application router
///
/// Provisioning routes require the shared secret; health and the extension
/// descriptor are public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    let base = format!("/integration/{}", state.config.provider);

    // Protected routes (require shared secret)
    let protected = Router::new()
        .route(&format!("{}/create/organization", base), post(api::create_organization))
        .route(&format!("{}/create/user", base), post(api::create_user))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::shared_secret_middleware,
        ));

    // Public routes (no authentication)
    let public = Router::new()
        .route(&base, get(api::get_descriptor))
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

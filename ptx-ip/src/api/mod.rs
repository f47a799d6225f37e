//! HTTP API handlers for ptx-ip

pub mod auth;
pub mod descriptor;
pub mod health;
pub mod integration;

pub use auth::{shared_secret_middleware, Payload};
pub use descriptor::get_descriptor;
pub use health::health_routes;
pub use integration::{create_organization, create_user};

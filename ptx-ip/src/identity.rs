//! Identity-provider client
//!
//! Creates passwordless (email connection) accounts through the Auth0
//! Management API. A management token is obtained with the client-credentials
//! grant immediately before every account creation; tokens are never cached.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::ProvisioningConfig;

/// Connection new accounts are created under
pub const ACCOUNT_CONNECTION: &str = "email";

/// Identity client errors
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Token response missing access_token")]
    MissingToken,

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Outcome of an account creation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountCreation {
    /// Provider returned 201 with the new account's id
    Created { user_id: String },
    /// Provider returned any other status; body kept verbatim
    Rejected { status: u16, body: String },
}

/// Account creation at an external identity provider
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn create_account(&self, email: &str) -> Result<AccountCreation, IdentityError>;
}

/// Result of the client-credentials grant
enum TokenGrant {
    Granted(String),
    /// Non-success token response, passed through like any other rejection
    Rejected(AccountCreation),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedAccount {
    user_id: String,
}

/// Auth0 Management API client
pub struct Auth0Client {
    http_client: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl Auth0Client {
    /// Client for `https://<identity_domain>`
    pub fn from_config(config: &ProvisioningConfig) -> Result<Self, IdentityError> {
        Self::with_base_url(
            config.identity_base_url(),
            config.client_id.clone(),
            config.client_secret.clone(),
        )
    }

    /// Client for an explicit base URL (scheme + host, no trailing slash)
    pub fn with_base_url(
        base_url: impl Into<String>,
        client_id: String,
        client_secret: String,
    ) -> Result<Self, IdentityError> {
        let http_client = reqwest::Client::builder()
            .build()
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client_id,
            client_secret,
        })
    }

    /// Management API audience, `<base>/api/v2/`
    fn audience(&self) -> String {
        format!("{}/api/v2/", self.base_url)
    }

    /// Client-credentials grant
    async fn fetch_token(&self) -> Result<TokenGrant, IdentityError> {
        let url = format!("{}/oauth/token", self.base_url);
        debug!(url = %url, "Requesting management token");

        let response = self
            .http_client
            .post(&url)
            .json(&json!({
                "client_id": self.client_id,
                "client_secret": self.client_secret,
                "audience": self.audience(),
                "grant_type": "client_credentials",
            }))
            .send()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Management token request rejected");
            return Ok(TokenGrant::Rejected(AccountCreation::Rejected {
                status: status.as_u16(),
                body,
            }));
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| IdentityError::Parse(e.to_string()))?;
        token
            .access_token
            .map(TokenGrant::Granted)
            .ok_or(IdentityError::MissingToken)
    }
}

#[async_trait]
impl IdentityProvider for Auth0Client {
    async fn create_account(&self, email: &str) -> Result<AccountCreation, IdentityError> {
        let token = match self.fetch_token().await? {
            TokenGrant::Granted(token) => token,
            TokenGrant::Rejected(rejected) => return Ok(rejected),
        };

        let url = format!("{}/api/v2/users", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token)
            .json(&json!({
                "email": email,
                "connection": ACCOUNT_CONNECTION,
            }))
            .send()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IdentityError::Network(e.to_string()))?;

        if status != reqwest::StatusCode::CREATED {
            warn!(status = status.as_u16(), "Identity account creation rejected");
            return Ok(AccountCreation::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let created: CreatedAccount =
            serde_json::from_str(&body).map_err(|e| IdentityError::Parse(e.to_string()))?;
        info!(user_id = %created.user_id, "Identity account created");
        Ok(AccountCreation::Created {
            user_id: created.user_id,
        })
    }
}

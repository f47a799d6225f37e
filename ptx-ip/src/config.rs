//! Provisioning configuration
//!
//! **Priority:** command line / environment → TOML `[provisioning]` → default
//!
//! Missing identity-provider credentials or shared secret do not stop the
//! service from starting; requests simply fail authentication or token
//! retrieval at runtime, and a warning is logged at startup.

use clap::Args;
use ptx_common::config::{first_non_empty, ProvisioningSection};
use tracing::warn;

/// Provider name used in routes and the shared-secret field
pub const DEFAULT_PROVIDER: &str = "empower";

/// Environment variables read by the provisioning service
pub const ENVIRONMENT_VARIABLES: [&str; 4] = [
    "AUTH0_DOMAIN",
    "AUTH0_MANAGEMENT_API_CLIENT_ID",
    "AUTH0_MANAGEMENT_API_CLIENT_SECRET",
    "EMPOWER_SHARED_SECRET",
];

/// Command-line / environment overrides
#[derive(Args, Debug, Clone, Default)]
pub struct ProvisioningArgs {
    /// Integration provider name (routes and secret field derive from it)
    #[arg(long, env = "PTX_PROVIDER")]
    pub provider: Option<String>,

    /// Identity-provider tenant domain, e.g. `tenant.auth0.com`
    #[arg(long, env = "AUTH0_DOMAIN")]
    pub identity_domain: Option<String>,

    /// Management API client id
    #[arg(long, env = "AUTH0_MANAGEMENT_API_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Management API client secret
    #[arg(long, env = "AUTH0_MANAGEMENT_API_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Shared secret expected in every provisioning request
    #[arg(long, env = "EMPOWER_SHARED_SECRET", hide_env_values = true)]
    pub shared_secret: Option<String>,
}

/// Resolved provisioning configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningConfig {
    pub provider: String,
    pub identity_domain: String,
    pub client_id: String,
    pub client_secret: String,
    pub shared_secret: String,
}

impl Default for ProvisioningConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            identity_domain: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            shared_secret: String::new(),
        }
    }
}

impl ProvisioningConfig {
    /// Merge command-line/environment values over the TOML section
    pub fn resolve(args: &ProvisioningArgs, toml: &ProvisioningSection) -> Self {
        let pick = |cli: &Option<String>, file: &Option<String>| {
            first_non_empty([cli.as_deref(), file.as_deref()]).unwrap_or_default()
        };

        let config = Self {
            provider: first_non_empty([
                args.provider.as_deref(),
                toml.provider.as_deref(),
                Some(DEFAULT_PROVIDER),
            ])
            .unwrap_or_else(|| DEFAULT_PROVIDER.to_string()),
            identity_domain: pick(&args.identity_domain, &toml.identity_domain),
            client_id: pick(&args.client_id, &toml.client_id),
            client_secret: pick(&args.client_secret, &toml.client_secret),
            shared_secret: pick(&args.shared_secret, &toml.shared_secret),
        };

        for (name, value) in [
            ("identity domain", &config.identity_domain),
            ("management client id", &config.client_id),
            ("management client secret", &config.client_secret),
            ("shared secret", &config.shared_secret),
        ] {
            if value.is_empty() {
                warn!("Provisioning {} not configured", name);
            }
        }

        config
    }

    /// JSON field carrying the shared secret, e.g. `empower_shared_secret`
    pub fn secret_field(&self) -> String {
        format!("{}_shared_secret", self.provider)
    }

    /// True only for an exact match against a configured (non-empty) secret
    pub fn authenticates(&self, candidate: Option<&str>) -> bool {
        !self.shared_secret.is_empty() && candidate == Some(self.shared_secret.as_str())
    }

    /// `https://<domain>`
    pub fn identity_base_url(&self) -> String {
        format!("https://{}", self.identity_domain)
    }
}

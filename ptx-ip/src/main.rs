//! ptx-ip (Integration Provisioning) - organization/user provisioning service
//!
//! Lets a partner system create organizations and users over two
//! shared-secret-authenticated endpoints. New users also get an
//! identity-provider account.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use ptx_common::config::TomlConfig;
use ptx_common::logging::init_tracing;
use ptx_ip::config::ProvisioningArgs;
use ptx_ip::{build_router, AppState, Auth0Client, ProvisioningConfig};

/// Command-line arguments for ptx-ip
#[derive(Parser, Debug)]
#[command(name = "ptx-ip")]
#[command(about = "Integration provisioning service")]
#[command(version)]
struct Args {
    /// TOML config file (defaults to <config dir>/ptx/ptx-ip.toml)
    #[arg(long, env = "PTX_IP_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PTX_IP_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "PTX_IP_BIND")]
    bind: Option<String>,

    /// SQLite database file
    #[arg(long, env = "PTX_DATABASE")]
    database: Option<PathBuf>,

    #[command(flatten)]
    provisioning: ProvisioningArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = TomlConfig::load("ptx-ip", args.config.as_deref())?;
    init_tracing(&toml_config.logging);

    info!("Starting ptx-ip (Integration Provisioning) v{}", env!("CARGO_PKG_VERSION"));

    let config = ProvisioningConfig::resolve(&args.provisioning, &toml_config.provisioning);

    let db_path = args
        .database
        .or(toml_config.database_path)
        .unwrap_or_else(ptx_common::config::default_database_path);
    info!("Database path: {}", db_path.display());

    let pool = match ptx_ip::db::init_database(&db_path).await {
        Ok(pool) => {
            info!("✓ Connected to database");
            pool
        }
        Err(e) => {
            error!("Failed to open database: {}", e);
            return Err(e.into());
        }
    };

    let identity = Auth0Client::from_config(&config).context("Failed to build identity client")?;

    let provider = config.provider.clone();
    let state = AppState::new(pool, config, Arc::new(identity));
    let app = build_router(state);

    let bind = args.bind.unwrap_or(toml_config.bind_address);
    let port = args.port.unwrap_or(toml_config.port);
    let addr = format!("{}:{}", bind, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("ptx-ip listening on http://{}", addr);
    info!("Provisioning routes under http://{}/integration/{}", addr, provider);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

//! ptx-cu - Contact Upload loader
//!
//! Command-line front end for the contact CSV loader:
//! - `inspect` parses a file and reports what would be uploaded
//! - `upload` parses, compresses and PUTs it to a pre-signed storage URL,
//!   then prints the storage key for the campaign to reference

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use ptx_common::config::{first_non_empty, TomlConfig};
use ptx_common::logging::init_tracing;
use ptx_cu::phone::DEFAULT_PHONE_COUNTRY;
use ptx_cu::{ParseOptions, StorageClient, StorageTarget, UploadPipeline, UploadState};

/// Command-line arguments for ptx-cu
#[derive(Parser, Debug)]
#[command(name = "ptx-cu")]
#[command(about = "Contact CSV upload loader")]
#[command(version)]
struct Args {
    /// TOML config file (defaults to <config dir>/ptx/ptx-cu.toml)
    #[arg(long, env = "PTX_CU_CONFIG")]
    config: Option<PathBuf>,

    /// Country for national-format phone numbers
    #[arg(long, env = "PTX_PHONE_COUNTRY")]
    country: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a file and print contact and validation stats
    Inspect {
        /// Contact CSV file
        file: PathBuf,
    },
    /// Parse a file and upload it to storage
    Upload {
        /// Contact CSV file
        file: PathBuf,

        /// Client choice data JSON: {"s3Url": "...", "s3key": "..."}
        #[arg(long, env = "PTX_CLIENT_CHOICE_DATA")]
        client_choice_data: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = TomlConfig::load("ptx-cu", args.config.as_deref())?;
    init_tracing(&config.logging);

    info!("Starting ptx-cu v{}", env!("CARGO_PKG_VERSION"));

    let country = first_non_empty([
        args.country.as_deref(),
        config.upload.phone_country.as_deref(),
        Some(DEFAULT_PHONE_COUNTRY),
    ])
    .unwrap_or_else(|| DEFAULT_PHONE_COUNTRY.to_string());

    let timeout = config.upload.transfer_timeout_secs.map(Duration::from_secs);
    let storage = StorageClient::new(timeout)?;
    let mut pipeline = UploadPipeline::new(ParseOptions::with_country(country), storage);

    match args.command {
        Command::Inspect { file } => {
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let name = file.file_name().map(|n| n.to_string_lossy().into_owned());
            let outcome = pipeline.prepare(name.as_deref(), &data);
            report(pipeline.state());
            outcome?;
        }
        Command::Upload {
            file,
            client_choice_data,
        } => {
            let target = StorageTarget::from_client_choice_data(&client_choice_data)?;
            let outcome = pipeline.upload_file(&file, &target).await;
            report(pipeline.state());
            let key = outcome?;
            println!("{}", key);
        }
    }

    Ok(())
}

fn report(state: &UploadState) {
    for line in state.contact_summary() {
        eprintln!("{}", line);
    }
    for line in state.validation_messages() {
        eprintln!("warning: {}", line);
    }
    if let Some(message) = state.error_message() {
        error!("{}", message);
    }
}

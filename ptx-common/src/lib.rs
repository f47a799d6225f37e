//! # PTX Common Library
//!
//! Shared code for the peer-texting extensions:
//! - Error type shared by the loader and the provisioning service
//! - Bootstrap TOML configuration
//! - Tracing initialization

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};

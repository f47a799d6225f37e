//! Tests for bootstrap configuration loading and graceful degradation
//!
//! - Missing TOML files SHALL NOT cause termination
//! - Present-but-invalid TOML files are reported as configuration errors

use ptx_common::config::TomlConfig;
use ptx_common::Error;
use std::io::Write;
use std::path::PathBuf;

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let path = PathBuf::from(format!("/tmp/ptx-missing-{}.toml", std::process::id()));
    let _ = std::fs::remove_file(&path);

    let config = TomlConfig::load("ptx-test", Some(&path)).expect("missing file is not fatal");

    assert_eq!(config.port, 5780);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_existing_file_is_loaded() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
bind_address = "0.0.0.0"
port = 5790

[provisioning]
provider = "empower"
client_id = "abc"
"#
    )
    .unwrap();

    let config = TomlConfig::load("ptx-test", Some(file.path())).unwrap();

    assert_eq!(config.bind_address, "0.0.0.0");
    assert_eq!(config.port, 5790);
    assert_eq!(config.provisioning.provider.as_deref(), Some("empower"));
    assert_eq!(config.provisioning.client_id.as_deref(), Some("abc"));
}

#[test]
fn test_malformed_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[logging\nlevel = ").unwrap();

    let result = TomlConfig::load("ptx-test", Some(file.path()));

    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_default_config_path_is_module_scoped() {
    if let Some(path) = ptx_common::config::default_config_path("ptx-ip") {
        assert!(path.ends_with("ptx/ptx-ip.toml"));
    }
}

#[test]
fn test_default_database_path_names_ptx_db() {
    let path = ptx_common::config::default_database_path();
    assert!(path.ends_with("ptx/ptx.db") || path.ends_with("ptx_data/ptx.db"));
}

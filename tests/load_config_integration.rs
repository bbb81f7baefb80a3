//! Integration tests for configuration loading precedence.
//!
//! These tests drive `load_config` end to end with real files on disk and
//! a parsed CLI, asserting the layered precedence the loader promises.

use clap::Parser;
use gangway::config::{Cli, load_config};
use rstest::rstest;

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn write_config(dir: &tempfile::TempDir, contents: &str) -> Result<String, std::io::Error> {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents)?;
    Ok(path.to_string_lossy().into_owned())
}

#[rstest]
fn file_values_are_loaded_through_an_explicit_config_path() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = write_config(
        &dir,
        r#"
        listen_addr = "127.0.0.1:4100"
        engine_socket = "/tmp/pinned.sock"

        [provider]
        default_provider = "podman"
        "#,
    )?;

    let cli = Cli::parse_from(["gangway", "--config", path.as_str()]);
    let config = load_config(&cli)?;

    assert_eq!(config.listen_addr.as_deref(), Some("127.0.0.1:4100"));
    assert_eq!(config.engine_socket.as_deref(), Some("/tmp/pinned.sock"));
    assert_eq!(config.provider.default_provider.as_deref(), Some("podman"));
    Ok(())
}

#[rstest]
fn cli_flags_override_file_values() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = write_config(
        &dir,
        r#"
        listen_addr = "127.0.0.1:4100"
        engine_socket = "/tmp/from-file.sock"
        "#,
    )?;

    let cli = Cli::parse_from([
        "gangway",
        "--config",
        path.as_str(),
        "--listen-addr",
        "127.0.0.1:4200",
    ]);
    let config = load_config(&cli)?;

    assert_eq!(config.listen_addr.as_deref(), Some("127.0.0.1:4200"));
    // Untouched fields keep their file-layer values.
    assert_eq!(config.engine_socket.as_deref(), Some("/tmp/from-file.sock"));
    Ok(())
}

#[rstest]
fn malformed_configuration_files_are_rejected() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = write_config(&dir, "listen_addr = [not toml")?;

    let cli = Cli::parse_from(["gangway", "--config", path.as_str()]);
    assert!(load_config(&cli).is_err());
    Ok(())
}

#[rstest]
fn provider_section_defaults_to_empty() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = write_config(&dir, r#"listen_addr = "127.0.0.1:4300""#)?;

    let cli = Cli::parse_from(["gangway", "--config", path.as_str()]);
    let config = load_config(&cli)?;

    assert!(config.provider.default_provider.is_none());
    assert!(config.provider.state_path.is_none());
    Ok(())
}

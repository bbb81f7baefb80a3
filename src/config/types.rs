//! Configuration data types for gangway.

use std::net::SocketAddr;

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Address the gateway listens on when none is configured.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

/// Provider selection configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider used when no preference has been persisted.
    ///
    /// Interpreted leniently like the persisted preference itself; unset
    /// means colima.
    pub default_provider: Option<String>,

    /// Path of the persisted provider preference file.
    ///
    /// Unset keeps the preference in memory only, so the gateway reverts
    /// to the default provider on restart.
    pub state_path: Option<Utf8PathBuf>,
}

/// Root application configuration.
///
/// This structure is loaded from configuration files, environment
/// variables, and command-line arguments with layered precedence. The
/// precedence order (lowest to highest) is: defaults, configuration file,
/// environment variables, command-line arguments.
///
/// Configuration files are discovered in this order:
/// 1. Path specified via `GANGWAY_CONFIG_PATH` environment variable
/// 2. `.gangway.toml` in the current working directory
/// 3. `.gangway.toml` in the home directory
/// 4. `~/.config/gangway/config.toml` (XDG default)
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(
    prefix = "GANGWAY",
    post_merge_hook,
    discovery(
        app_name = "gangway",
        env_var = "GANGWAY_CONFIG_PATH",
        config_file_name = "config.toml",
        dotfile_name = ".gangway.toml",
        config_cli_long = "config",
        config_cli_visible = true,
    )
)]
pub struct AppConfig {
    /// Address the HTTP gateway listens on.
    pub listen_addr: Option<String>,

    /// Explicit engine socket path or URL, bypassing provider resolution.
    pub engine_socket: Option<String>,

    /// Provider selection configuration.
    #[serde(default)]
    #[ortho_config(skip_cli)]
    pub provider: ProviderConfig,
}

impl AppConfig {
    /// The configured listen address, parsed and defaulted.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when the configured value does
    /// not parse as a socket address.
    pub fn listen_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let configured = self.listen_addr.as_deref().unwrap_or(DEFAULT_LISTEN_ADDR);
        configured
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                field: String::from("listen_addr"),
                reason: format!("'{configured}' is not a socket address"),
            })
    }
}

impl PostMergeHook for AppConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        // Listen-address validation happens at the call site so the error
        // carries the field name; nothing to normalise here yet.
        Ok(())
    }
}

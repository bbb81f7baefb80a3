//! Configuration system for gangway.
//!
//! This module provides the configuration structures and CLI definitions
//! for the gateway. Configuration loading and precedence merging is handled
//! by the `ortho_config` crate. Intended precedence: CLI flags override
//! environment variables, which override configuration files, which
//! override defaults.
//!
//! The configuration file is expected at `~/.config/gangway/config.toml`
//! by default.
//!
//! # Example Configuration
//!
//! ```toml
//! listen_addr = "127.0.0.1:3000"
//!
//! [provider]
//! default_provider = "colima"
//! state_path = "/home/user/.config/gangway/provider"
//! ```

mod cli;
mod loader;
mod types;

#[cfg(test)]
mod tests;

pub use cli::Cli;
pub use loader::{env_var_names, load_config};
pub use types::{AppConfig, DEFAULT_LISTEN_ADDR, ProviderConfig};

//! `gangway` application entry point.
//!
//! This binary serves the container-engine gateway over HTTP. It uses
//! `eyre` for opaque error handling at the application boundary, converting
//! domain-specific errors into human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`~/.config/gangway/config.toml` or path from `GANGWAY_CONFIG_PATH`)
//! 3. Environment variables (`GANGWAY_*`)
//! 4. Command-line arguments

use std::sync::Arc;

use camino::Utf8PathBuf;
use clap::Parser;
use eyre::{Report, Result as EyreResult};
use gangway::api::{self, AppState};
use gangway::config::{AppConfig, Cli, load_config};
use gangway::engine::{
    BollardFactory, CliFallback, ClientFactory, ConnectionManager, FileProviderStore,
    MemoryProviderStore, ProviderStore,
};
use gangway::provider::{Provider, ProviderResolver, ProviderValidator, SystemCommandRunner};
use tracing_subscriber::EnvFilter;

/// Application entry point.
///
/// Loads configuration with layered precedence, assembles the shared
/// gateway state, and serves the router until interrupted.
#[tokio::main]
async fn main() -> EyreResult<()> {
    // Parse CLI first (for --config and direct overrides).
    let cli = Cli::parse();

    // Load configuration with layered precedence: defaults < file < env < CLI.
    let config = load_config(&cli).map_err(Report::from)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gangway=info")),
        )
        .init();

    let addr = config.listen_socket_addr().map_err(Report::from)?;
    let state = build_state(&config);
    tracing::info!(
        %addr,
        provider = %state.manager.configured_provider(),
        "gangway listening"
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, api::router(state)).await?;
    Ok(())
}

/// Assemble the shared gateway state from configuration.
///
/// The connection manager and provider validator get independent resolver
/// instances over the same command and environment seams; the validator
/// must never share the manager's cached handle.
fn build_state(config: &AppConfig) -> AppState {
    let store: Arc<dyn ProviderStore> = config
        .provider
        .state_path
        .clone()
        .or_else(default_state_path)
        .map_or_else(
            || Arc::new(MemoryProviderStore::new()) as Arc<dyn ProviderStore>,
            |path| Arc::new(FileProviderStore::new(path)) as Arc<dyn ProviderStore>,
        );

    let default_provider = Provider::parse_or(
        config.provider.default_provider.as_deref(),
        Provider::default(),
    );

    let factory: Arc<dyn ClientFactory> = Arc::new(BollardFactory);
    let manager = ConnectionManager::new(ProviderResolver::system(), store, Arc::clone(&factory))
        .with_default_provider(default_provider)
        .with_socket_override(config.engine_socket.clone())
        .with_cli_fallback(CliFallback::new(Arc::new(SystemCommandRunner)));

    let validator = ProviderValidator::new(ProviderResolver::system(), factory);

    AppState {
        manager: Arc::new(manager),
        validator: Arc::new(validator),
    }
}

/// Conventional location of the persisted provider preference.
fn default_state_path() -> Option<Utf8PathBuf> {
    std::env::var("HOME")
        .ok()
        .filter(|home| !home.is_empty())
        .map(|home| Utf8PathBuf::from(home).join(".config/gangway/provider"))
}

//! Semantic error types for the gangway gateway.
//!
//! This module defines the error hierarchy for gangway, following the
//! principle of using semantic error enums (via `thiserror`) for conditions
//! the caller might inspect or map to an HTTP status, while reserving opaque
//! errors (`eyre::Report`) for the application boundary.
//!
//! Discovery-layer failures (`ProviderError::DiscoveryFailed`) are absorbed
//! inside the resolver by falling back to a conventional socket path; only
//! connection-layer and validation-layer failures cross the API surface.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The provider preference state could not be read or written.
    #[error("failed to access provider state at '{path}': {message}")]
    StateAccess {
        /// The path to the provider state file.
        path: PathBuf,
        /// A description of the access failure.
        message: String,
    },

    /// The `OrthoConfig` library returned an error during configuration loading.
    ///
    /// This wraps errors from the layered configuration system, including
    /// configuration file parsing errors, environment variable parsing
    /// errors, CLI argument parsing errors, and missing required fields
    /// after layer merging.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors that can occur while resolving a provider to an endpoint.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider name is not one of the supported kinds.
    ///
    /// Raised only by the strict parse used for explicit provider
    /// validation; the normal resolution path degrades to the default
    /// provider instead.
    #[error("unknown container provider: '{name}'")]
    UnknownKind {
        /// The unrecognised provider name as supplied by the caller.
        name: String,
    },

    /// A provider's CLI discovery command failed.
    ///
    /// Always recovered locally by falling back to the conventional socket
    /// path; never surfaced to API callers.
    #[error("discovery command '{command}' failed: {message}")]
    DiscoveryFailed {
        /// The command that was attempted.
        command: String,
        /// A description of the command failure.
        message: String,
    },
}

/// Errors that can occur during container engine operations.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Failed to connect to the container engine socket.
    #[error("failed to connect to container engine: {message}")]
    ConnectionFailed {
        /// A description of the connection failure.
        message: String,
    },

    /// The container engine socket was not found.
    #[error("container engine socket not found: {path}")]
    SocketNotFound {
        /// The path where the socket was expected.
        path: PathBuf,
    },

    /// Permission denied when accessing the container engine socket.
    #[error("permission denied accessing container socket: {path}")]
    PermissionDenied {
        /// The path to the socket.
        path: PathBuf,
    },

    /// The requested container action is not one of start, stop or restart.
    ///
    /// Rejected before any engine call is made.
    #[error("invalid container action: '{action}'")]
    InvalidAction {
        /// The unsupported action as supplied by the caller.
        action: String,
    },

    /// A container lifecycle action failed at the engine.
    #[error("failed to {action} container '{container_id}': {message}")]
    ActionFailed {
        /// The ID of the target container.
        container_id: String,
        /// The action that was attempted.
        action: String,
        /// A description of the engine failure.
        message: String,
    },

    /// A container or image listing call failed at the engine.
    #[error("failed to list {subject}: {message}")]
    ListFailed {
        /// What was being listed (`containers` or `images`).
        subject: String,
        /// A description of the engine failure.
        message: String,
    },

    /// The engine info query failed.
    #[error("failed to query engine info: {message}")]
    InfoFailed {
        /// A description of the engine failure.
        message: String,
    },

    /// An image removal failed at the engine.
    #[error("failed to remove image '{image_id}': {message}")]
    RemoveImageFailed {
        /// The ID of the target image.
        image_id: String,
        /// A description of the engine failure.
        message: String,
    },

    /// The container log stream could not be opened or failed mid-flight.
    #[error("log stream for container '{container_id}' failed: {message}")]
    LogStreamFailed {
        /// The ID of the container whose logs were requested.
        container_id: String,
        /// A description of the stream failure.
        message: String,
    },

    /// A validation health check timed out.
    #[error("container engine health check timed out after {seconds} seconds")]
    HealthCheckTimeout {
        /// The timeout duration in seconds.
        seconds: u64,
    },
}

/// Top-level error type for the gangway gateway.
///
/// This enum aggregates all domain-specific errors into a single type that
/// can be used throughout the application. At the application boundary
/// (main.rs), these errors are converted to `eyre::Report` for
/// human-readable error reporting.
#[derive(Debug, Error)]
pub enum GangwayError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred during provider resolution or validation.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// An error occurred during container engine operations.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// A specialised `Result` type for gangway operations.
pub type Result<T> = std::result::Result<T, GangwayError>;

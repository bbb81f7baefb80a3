//! HTTP surface of the gateway.
//!
//! Thin axum handlers over the connection manager and provider validator.
//! Handlers translate engine outcomes into the JSON shapes the dashboard
//! expects and never leak partial or ambiguous payloads on error paths:
//! every failure is either a structured JSON error body or, for the log
//! stream, a silently closed response.

mod containers;
mod images;
mod logs;
mod provider;
mod system;


use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use crate::engine::ConnectionManager;
use crate::error::{EngineError, GangwayError};
use crate::provider::ProviderValidator;

/// Shared state handed to every request handler.
///
/// The connection manager is the only cross-request mutable resource; it is
/// injected here rather than looked up through any ambient global.
#[derive(Clone)]
pub struct AppState {
    /// The single connection manager fronting all engine operations.
    pub manager: Arc<ConnectionManager>,
    /// Validator for candidate providers, independent of the manager.
    pub validator: Arc<ProviderValidator>,
}

/// Generic JSON error body: `{ "error": "..." }`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ErrorBody {
    /// Human-readable description of the failure.
    pub error: String,
}

/// Whether an error means the engine endpoint itself is unreachable,
/// as opposed to a reachable engine rejecting a call.
pub(crate) fn is_connectivity_error(error: &GangwayError) -> bool {
    matches!(
        error,
        GangwayError::Engine(
            EngineError::ConnectionFailed { .. }
                | EngineError::SocketNotFound { .. }
                | EngineError::PermissionDenied { .. }
        )
    )
}

/// Build the gateway router.
///
/// Cross-origin access is permitted (the event-stream endpoint requires it;
/// the rest of the surface is harmless local JSON).
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/containers", get(containers::list))
        .route("/containers/:id/:action", post(containers::action))
        .route("/images", get(images::list))
        .route("/images/:id", delete(images::remove))
        .route("/docker-info", get(system::info))
        .route("/logs/:id", get(logs::stream))
        .route("/validate-provider", post(provider::validate))
        .layer(cors)
        .with_state(state)
}

//! Engine status endpoint.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use super::{AppState, is_connectivity_error};
use crate::engine::EngineInfo;

/// Response body for `GET /docker-info` when the engine is reachable.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct InfoResponse {
    /// Always `true` on this shape.
    pub connected: bool,
    /// Version and counters reported by the engine.
    #[serde(flatten)]
    pub info: EngineInfo,
}

/// `GET /docker-info` — engine version and container/image counters.
pub(super) async fn info(State(state): State<AppState>) -> Response {
    match state.manager.engine_info().await {
        Ok(info) => Json(InfoResponse {
            connected: true,
            info,
        })
        .into_response(),
        Err(error) if is_connectivity_error(&error) => {
            tracing::warn!(%error, "engine unreachable");
            Json(super::images::DisconnectedBody {
                connected: false,
                error: String::from("Cannot connect to the container engine"),
            })
            .into_response()
        }
        Err(error) => {
            tracing::error!(%error, "failed to fetch engine info");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(super::images::DisconnectedBody {
                    connected: false,
                    error: String::from("Failed to fetch engine information"),
                }),
            )
                .into_response()
        }
    }
}

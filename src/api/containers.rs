//! Container listing and lifecycle endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use super::{AppState, ErrorBody};
use crate::engine::Container;
use crate::error::{EngineError, GangwayError};

/// Response body for `GET /containers`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ContainersResponse {
    /// Running containers.
    pub containers: Vec<Container>,
    /// Number of running containers.
    #[serde(rename = "runningCount")]
    pub running_count: usize,
}

/// Response body for `POST /containers/:id/:action`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ActionResponse {
    /// Whether the action was applied.
    pub success: bool,
    /// Success message, present on the happy path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Failure description, present on the error path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `GET /containers` — list running containers.
pub(super) async fn list(State(state): State<AppState>) -> Response {
    match state.manager.list_containers(false).await {
        Ok(containers) => {
            let running_count = containers.len();
            Json(ContainersResponse {
                containers,
                running_count,
            })
            .into_response()
        }
        Err(error) => {
            tracing::error!(%error, "failed to fetch containers");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: String::from("Failed to fetch containers"),
                }),
            )
                .into_response()
        }
    }
}

/// `POST /containers/:id/:action` — apply start/stop/restart.
///
/// Unsupported actions are rejected with 400 before any engine call; engine
/// failures surface as 500 with the tagged failure message.
pub(super) async fn action(
    State(state): State<AppState>,
    Path((container_id, action)): Path<(String, String)>,
) -> Response {
    match state.manager.perform_action(&container_id, &action).await {
        Ok(applied) => Json(ActionResponse {
            success: true,
            message: Some(format!("Container {} successfully", applied.past_tense())),
            error: None,
        })
        .into_response(),
        Err(GangwayError::Engine(EngineError::InvalidAction { action })) => (
            StatusCode::BAD_REQUEST,
            Json(ActionResponse {
                success: false,
                message: None,
                error: Some(format!(
                    "Invalid action '{action}'. Must be start, stop, or restart"
                )),
            }),
        )
            .into_response(),
        Err(error) => {
            tracing::error!(%error, container = %container_id, "container action failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ActionResponse {
                    success: false,
                    message: None,
                    error: Some(error.to_string()),
                }),
            )
                .into_response()
        }
    }
}

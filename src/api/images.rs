//! Image listing and removal endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use super::{AppState, is_connectivity_error};
use crate::engine::Image;

/// Response body for `GET /images`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ImagesResponse {
    /// Images known to the engine.
    pub info: Vec<Image>,
}

/// Body reported when the engine endpoint is unreachable.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct DisconnectedBody {
    /// Always `false`.
    pub connected: bool,
    /// Human-readable description of the failure.
    pub error: String,
}

/// Response body for `DELETE /images/:id`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct RemoveImageResponse {
    /// Whether the image was removed.
    pub success: bool,
    /// Failure description, present on the error path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `GET /images` — list images.
///
/// An unreachable engine reports `connected: false` without an error
/// status (the dashboard polls this); a reachable engine rejecting the
/// call is a 500.
pub(super) async fn list(State(state): State<AppState>) -> Response {
    match state.manager.list_images(false).await {
        Ok(images) => Json(ImagesResponse { info: images }).into_response(),
        Err(error) if is_connectivity_error(&error) => {
            tracing::warn!(%error, "engine unreachable while listing images");
            Json(DisconnectedBody {
                connected: false,
                error: String::from("Cannot connect to the container engine"),
            })
            .into_response()
        }
        Err(error) => {
            tracing::error!(%error, "failed to fetch images");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DisconnectedBody {
                    connected: false,
                    error: String::from("Failed to fetch images"),
                }),
            )
                .into_response()
        }
    }
}

/// `DELETE /images/:id` — remove an image.
pub(super) async fn remove(
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> Response {
    match state.manager.remove_image(&image_id).await {
        Ok(()) => Json(RemoveImageResponse {
            success: true,
            error: None,
        })
        .into_response(),
        Err(error) => {
            tracing::error!(%error, image = %image_id, "image removal failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(RemoveImageResponse {
                    success: false,
                    error: Some(error.to_string()),
                }),
            )
                .into_response()
        }
    }
}

//! Candidate provider validation endpoint.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use super::AppState;

/// Request body for `POST /validate-provider`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ValidateRequest {
    /// Candidate provider name.
    pub provider: Option<String>,
}

/// Response body for `POST /validate-provider`.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ValidateResponse {
    /// Whether the candidate denotes a live, reachable engine.
    pub valid: bool,
    /// The candidate echoed back, when one was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Failure description for malformed requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// `POST /validate-provider` — test a candidate before committing a switch.
///
/// Validation is side-effect free with respect to the connection manager:
/// it opens its own throwaway connection against the candidate's endpoint.
pub(super) async fn validate(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Response {
    let Some(provider) = request.provider.filter(|name| !name.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ValidateResponse {
                valid: false,
                provider: None,
                error: Some(String::from("Provider name is required")),
            }),
        )
            .into_response();
    };

    let valid = state.validator.validate(&provider).await;
    Json(ValidateResponse {
        valid,
        provider: Some(provider),
        error: None,
    })
    .into_response()
}

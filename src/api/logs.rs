//! Live container log streaming over Server-Sent Events.
//!
//! One `data:` event per demultiplexed log line, in arrival order. The
//! response stays open until the engine's log stream ends, fails, or the
//! client disconnects. Disconnection drops the event stream, which drops
//! the demultiplexer and with it the upstream engine stream — no buffered
//! lines are written after cancellation.

use std::convert::Infallible;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use futures_util::StreamExt;

use super::{AppState, ErrorBody};
use crate::logs::LogLineStream;

/// `GET /logs/:id` — follow a container's logs as an SSE stream.
pub(super) async fn stream(
    State(state): State<AppState>,
    Path(container_id): Path<String>,
) -> Response {
    let raw = match state.manager.container_logs(&container_id).await {
        Ok(raw) => raw,
        Err(error) => {
            tracing::error!(%error, container = %container_id, "failed to open log stream");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: String::from("Failed to stream logs"),
                }),
            )
                .into_response();
        }
    };

    let events = LogLineStream::new(raw).filter_map(|item| {
        std::future::ready(match item {
            Ok(line) => Some(Ok::<Event, Infallible>(Event::default().data(line))),
            Err(error) => {
                // An upstream failure ends the sequence on the next poll;
                // log it server-side and emit nothing partial.
                tracing::error!(%error, "container log stream failed");
                None
            }
        })
    });

    let mut response = Sse::new(events).keep_alive(KeepAlive::default()).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-cache, no-transform"),
    );
    // Proxies must not buffer the event stream.
    headers.insert(
        HeaderName::from_static("x-accel-buffering"),
        HeaderValue::from_static("no"),
    );
    response
}

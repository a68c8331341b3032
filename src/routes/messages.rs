//! Messages endpoint
//!
//! Accepts messages-protocol requests, translates them for the upstream
//! responses service, executes exactly one upstream call, and returns
//! either a single JSON response or a reconstructed event stream.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::stream;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::AppError,
    messages::request::MessagesRequest,
    messages::response::MessagesResponse,
    messages::streaming::{format_sse_event, reconstruct_events},
    routes::metrics::{record_request, record_tokens},
    translate,
    AppState,
};

/// Handler for POST /v1/messages
///
/// Translation failures reject the request before any upstream call is
/// attempted; once the upstream call succeeds, the exchange cannot fail.
pub async fn create_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<MessagesRequest>,
) -> Result<Response, AppError> {
    let start_time = Instant::now();
    let exchange_id = Uuid::new_v4();

    let defaults = state.config.translation_defaults();
    let upstream_request = translate::translate_request(&request, &defaults)?;

    info!(
        exchange_id = %exchange_id,
        backend = state.backend.name(),
        model = %upstream_request.model,
        stream = request.stream,
        input_items = upstream_request.input.len(),
        "Processing messages request"
    );

    let result = state.backend.execute(&upstream_request).await?;
    let response = translate::translate_response(&result, &upstream_request.model);

    let duration = start_time.elapsed().as_secs_f64();
    let status_label = if request.stream { "streaming" } else { "success" };
    record_request(status_label, &upstream_request.model, duration);
    record_tokens("input", response.usage.input_tokens, &upstream_request.model);
    record_tokens("output", response.usage.output_tokens, &upstream_request.model);

    info!(
        exchange_id = %exchange_id,
        model = %response.model,
        stop_reason = ?response.stop_reason,
        content_blocks = response.content.len(),
        input_tokens = response.usage.input_tokens,
        output_tokens = response.usage.output_tokens,
        duration_ms = %format!("{:.2}", duration * 1000.0),
        "Messages request completed"
    );

    if request.stream {
        stream_response(&response)
    } else {
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}

/// Re-express a completed response as an SSE event stream
///
/// The frame sequence is finite and fully known up front; the body is a
/// plain iterator stream, written out frame by frame and then closed.
fn stream_response(response: &MessagesResponse) -> Result<Response, AppError> {
    let frames: Vec<_> = reconstruct_events(response)
        .iter()
        .map(format_sse_event)
        .collect();
    let body = Body::from_stream(stream::iter(
        frames.into_iter().map(Ok::<_, Infallible>),
    ));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .header("X-Accel-Buffering", "no")
        .body(body)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build response: {}", e)))
}

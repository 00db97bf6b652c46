use axum::{
    body::{to_bytes, Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::time::Instant;
use uuid::Uuid;

/// Largest body the logger will buffer; bigger requests are refused.
const BODY_BUFFER_LIMIT: usize = 1024 * 1024;
/// Bytes of body text a log line carries before truncation kicks in.
const LOG_EXCERPT_LEN: usize = 2000;

/// Logs every request and response pair, correlated by a generated id.
///
/// Bodies are buffered so they can appear in the log and still be replayed
/// downstream. The credit-mutating endpoints only carry small JSON payloads.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let (parts, body) = request.into_parts();
    let request_bytes = match to_bytes(body, BODY_BUFFER_LIMIT).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(request_id = %request_id, "Failed to buffer request body: {}", e);
            return (StatusCode::BAD_REQUEST, "Failed to read request body").into_response();
        }
    };

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        body = %excerpt(&String::from_utf8_lossy(&request_bytes), LOG_EXCERPT_LEN),
        "→ Request"
    );

    let response = next
        .run(Request::from_parts(parts, Body::from(request_bytes)))
        .await;

    let status = response.status();
    let (parts, body) = response.into_parts();
    let response_bytes = match to_bytes(body, BODY_BUFFER_LIMIT).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(request_id = %request_id, "Failed to buffer response body: {}", e);
            Bytes::new()
        }
    };

    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %status.as_u16(),
        latency_ms = %started.elapsed().as_millis(),
        body = %excerpt(&String::from_utf8_lossy(&response_bytes), LOG_EXCERPT_LEN),
        "← Response"
    );

    Response::from_parts(parts, Body::from(response_bytes))
}

/// Body excerpt for a log line. Place names and descriptions are free text,
/// so the byte limit can land inside a multibyte character; the cut backs up
/// to the nearest char boundary at or below it.
fn excerpt(body: &str, max_len: usize) -> String {
    let body = body.trim();
    if body.len() <= max_len {
        return body.to_string();
    }
    let mut cut = max_len;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!(
        "{}...[truncated, {} bytes total]",
        &body[..cut],
        body.len()
    )
}

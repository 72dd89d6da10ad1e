//! HTTP middleware

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{Instrument, info, info_span, warn};

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Request logging middleware
///
/// Runs the rest of the stack inside a span carrying a fresh request id, so
/// icon fetch and render logs can be tied back to the request that caused
/// them. The id is echoed to the client in `x-request-id`.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = uuid::Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let span = info_span!("request", method = %method, path = %path, request_id = %request_id);

    let mut response = next.run(request).instrument(span.clone()).await;
    let status = response.status().as_u16();
    let duration_ms = start.elapsed().as_millis();

    span.in_scope(|| {
        if status >= 400 {
            warn!(status, duration_ms, "Request failed");
        } else {
            info!(status, duration_ms, "Request served");
        }
    });

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(REQUEST_ID_HEADER.clone(), value);
    }
    response
}

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, debug, error, info_span, warn};
use uuid::Uuid;

use crate::application::error::ErrorReport;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Runs the request inside a span carrying a fresh request id, echoes the id
/// back in `x-request-id`, and logs failures with their [`ErrorReport`].
pub async fn trace_requests(request: Request<Body>, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = info_span!(
        "http.request",
        request_id = %request_id,
        method = %method,
        path = %path
    );

    async move {
        let start = Instant::now();
        let mut response = next.run(request).await;
        let elapsed_ms = start.elapsed().as_millis();
        let status = response.status();

        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        if !(status.is_client_error() || status.is_server_error()) {
            debug!(status = status.as_u16(), elapsed_ms, "request served");
            return response;
        }

        let (source, messages) = match response.extensions_mut().remove::<ErrorReport>() {
            Some(report) => (report.source, report.messages),
            None => ("unknown", Vec::new()),
        };
        let detail = messages
            .first()
            .map(String::as_str)
            .unwrap_or("no diagnostic available");

        if status.is_server_error() {
            error!(
                target = "postboard::http::response",
                status = status.as_u16(),
                elapsed_ms,
                source,
                detail,
                chain = ?messages,
                "request failed"
            );
        } else {
            warn!(
                target = "postboard::http::response",
                status = status.as_u16(),
                elapsed_ms,
                source,
                detail,
                chain = ?messages,
                "client request error"
            );
        }

        response
    }
    .instrument(span)
    .await
}

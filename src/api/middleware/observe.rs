//! Request observation middleware.
//!
//! One explicit middleware replaces the pre-request and after-request
//! hooks of the request pipeline: it records the incoming request,
//! dispatches, then unconditionally injects the CORS headers and records
//! the outgoing response. Because it is the outermost layer, error
//! responses and caught panics pass through it too.

use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
};

use crate::config::{BODY_PREVIEW_LIMIT, CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS};

/// Placeholder used when a body cannot be read or rendered.
const UNREADABLE_BODY: &str = "<unreadable>";

/// Observe a request and its response; never rejects.
pub async fn observe_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let origin = request
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    // Mutating methods get their body echoed to the log; everything else
    // passes through untouched.
    let request = if matches!(method, Method::POST | Method::PUT) {
        let (request, body) = buffer_request_body(request).await;
        tracing::info!(
            %method,
            %path,
            origin = origin.as_deref().unwrap_or("none"),
            %body,
            "incoming request"
        );
        request
    } else {
        tracing::info!(
            %method,
            %path,
            origin = origin.as_deref().unwrap_or("none"),
            "incoming request"
        );
        request
    };

    let started = Instant::now();
    let mut response = next.run(request).await;

    // CORS headers are set regardless of route or outcome.
    let headers = response.headers_mut();
    if let Some(ref origin) = origin {
        if let Ok(value) = HeaderValue::from_str(origin) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
        }
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );

    let status = response.status();
    let (response, body) = buffer_response_body(response).await;
    tracing::info!(
        %method,
        %path,
        status = status.as_u16(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        %body,
        "outgoing response"
    );

    response
}

/// Buffer the request body so it can be logged, then hand it back intact.
async fn buffer_request_body(request: Request) -> (Request, String) {
    let (parts, body) = request.into_parts();
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            let preview = render_preview(&bytes);
            (Request::from_parts(parts, Body::from(bytes)), preview)
        }
        // A body that cannot be read belongs to a connection that is
        // already failing; hand the handler an empty one and move on.
        Err(_) => (
            Request::from_parts(parts, Body::empty()),
            UNREADABLE_BODY.to_string(),
        ),
    }
}

/// Buffer the response body for the log, then hand it back intact.
async fn buffer_response_body(response: Response) -> (Response, String) {
    let (parts, body) = response.into_parts();
    match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            let preview = render_preview(&bytes);
            (Response::from_parts(parts, Body::from(bytes)), preview)
        }
        Err(_) => (
            Response::from_parts(parts, Body::empty()),
            UNREADABLE_BODY.to_string(),
        ),
    }
}

/// Render a truncated body preview: compact JSON when the body parses,
/// lossy text otherwise, a fixed placeholder when empty.
fn render_preview(bytes: &Bytes) -> String {
    if bytes.is_empty() {
        return "<empty>".to_string();
    }

    let text = match serde_json::from_slice::<serde_json::Value>(bytes) {
        Ok(value) => value.to_string(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    };

    if text.chars().count() > BODY_PREVIEW_LIMIT {
        let truncated: String = text.chars().take(BODY_PREVIEW_LIMIT).collect();
        format!("{truncated}...")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_body_renders_placeholder() {
        assert_eq!(render_preview(&Bytes::new()), "<empty>");
    }

    #[test]
    fn json_body_renders_compact() {
        let bytes = Bytes::from_static(b"{\n  \"status\": \"ok\"\n}");
        assert_eq!(render_preview(&bytes), r#"{"status":"ok"}"#);
    }

    #[test]
    fn long_body_is_truncated() {
        let bytes = Bytes::from(vec![b'x'; 500]);
        let preview = render_preview(&bytes);
        assert_eq!(preview.chars().count(), BODY_PREVIEW_LIMIT + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn non_utf8_body_never_panics() {
        let bytes = Bytes::from_static(&[0xff, 0xfe, 0x00, 0x01]);
        assert!(!render_preview(&bytes).is_empty());
    }
}

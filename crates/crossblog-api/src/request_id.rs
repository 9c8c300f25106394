//! Request correlation
//!
//! Reads `x-request-id` (and optional `x-trace-id`) from the request, or
//! generates a request id, stores a `RequestContext` in the request
//! extensions and echoes the id on the response.

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use crossblog_core_types::schema::{HEADER_REQUEST_ID, HEADER_TRACE_ID};
use crossblog_core_types::{RequestContext, RequestId, TraceId};

/// Build the request context from incoming headers
pub fn context_from_headers(headers: &HeaderMap) -> RequestContext {
    let request_id = header_str(headers, HEADER_REQUEST_ID)
        .map(|id| RequestId::from_string(id.to_string()))
        .unwrap_or_default();

    let ctx = RequestContext::with_request_id(request_id);
    match header_str(headers, HEADER_TRACE_ID) {
        Some(trace) => ctx.with_trace_id(TraceId::from_string(trace.to_string())),
        None => ctx,
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Middleware attaching a [`RequestContext`] to every request
///
/// Runs outside the trace layer, so a generated id is already in the request
/// headers when the span is created.
pub async fn propagate_request_id(mut req: Request, next: Next) -> Response {
    let ctx = context_from_headers(req.headers());
    let header_value = HeaderValue::from_str(ctx.request_id.as_str()).ok();

    if let Some(value) = &header_value {
        req.headers_mut().insert(HEADER_REQUEST_ID, value.clone());
    }
    req.extensions_mut().insert(ctx);

    let mut response = next.run(req).await;
    if let Some(value) = header_value {
        response.headers_mut().insert(HEADER_REQUEST_ID, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_uses_incoming_ids() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_REQUEST_ID, HeaderValue::from_static("req-42"));
        headers.insert(HEADER_TRACE_ID, HeaderValue::from_static("trace-7"));

        let ctx = context_from_headers(&headers);
        assert_eq!(ctx.request_id.as_str(), "req-42");
        assert_eq!(ctx.trace_id.as_ref().map(|t| t.as_str()), Some("trace-7"));
    }

    #[test]
    fn test_context_generates_missing_id() {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER_REQUEST_ID, HeaderValue::from_static("   "));

        let ctx = context_from_headers(&headers);
        assert!(!ctx.request_id.as_str().trim().is_empty());
        assert!(ctx.trace_id.is_none());
    }
}

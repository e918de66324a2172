use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use uuid::Uuid;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Newtype wrapping a trace ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct TraceId(pub String);

/// Axum middleware that extracts or generates a trace ID.
///
/// If the incoming request has a non-empty `x-trace-id` header, that value is
/// used. Otherwise a new `UUIDv4` is generated. The ID is:
/// - Inserted into request extensions as [`TraceId`]
/// - Set on the response as the `x-trace-id` header
pub async fn trace_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(TraceId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(TRACE_ID_HEADER, val);
    }

    res
}

//! /api/merchant/{resource}[/{*rest}]: merchant admin pass-through.

use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use shopgate_upstream::{AdminClient, AdminResource, AdminResponse};

use super::{ApiError, AppState};

pub(super) async fn collection(
    State(state): State<AppState>,
    method: Method,
    Path(resource): Path<String>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Response, ApiError> {
    forward(&state, method, &resource, None, query.as_deref(), &body).await
}

pub(super) async fn item(
    State(state): State<AppState>,
    method: Method,
    Path((resource, rest)): Path<(String, String)>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<Response, ApiError> {
    forward(&state, method, &resource, Some(&rest), query.as_deref(), &body).await
}

async fn forward(
    state: &AppState,
    method: Method,
    resource: &str,
    rest: Option<&str>,
    query: Option<&str>,
    body: &[u8],
) -> Result<Response, ApiError> {
    let resource: AdminResource = resource.parse().map_err(ApiError::not_found)?;
    let body = json_body(body)?;

    let client = AdminClient::from_config(state.http.clone(), &state.config)
        .map_err(|e| ApiError::from_upstream(&e, "merchant admin not configured"))?;

    let result = match rest {
        None if method == Method::POST => {
            let body = body.unwrap_or_else(|| json!({}));
            client.create(resource, query, &body).await
        }
        None => {
            client
                .request(method, resource.as_str(), query, body.as_ref())
                .await
        }
        Some(rest) => {
            let path = format!("{}/{}", resource.as_str(), rest.trim_start_matches('/'));
            client.request(method, &path, query, body.as_ref()).await
        }
    };

    let response =
        result.map_err(|e| ApiError::from_upstream(&e, "merchant admin request failed"))?;
    Ok(replay(response))
}

/// Parses an optional JSON request body; an empty body is `None`.
fn json_body(body: &[u8]) -> Result<Option<Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body)
        .map(Some)
        .map_err(|e| ApiError::bad_request(format!("invalid JSON body: {e}")))
}

fn replay(response: AdminResponse) -> Response {
    let status = StatusCode::from_u16(response.status).unwrap_or(StatusCode::OK);
    match response.body {
        Some(body) if status != StatusCode::NO_CONTENT => (status, Json(body)).into_response(),
        _ => (StatusCode::NO_CONTENT, Json(json!({"success": true}))).into_response(),
    }
}

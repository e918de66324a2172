//! Session-cookie proxy routes: `/questions`, accounts exchange, and reviews
//! verification exchange.
//!
//! These forward the browser's request to cookie-authenticated backends and
//! replay status, headers, body, and every `Set-Cookie` back unchanged.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::Response,
};
use serde::Deserialize;
use shopgate_upstream::{target_url, ProxiedResponse, SessionProxy, UpstreamError};

use super::{required, ApiError, AppState};

#[derive(Debug, Deserialize)]
struct ExchangeRequest {
    token: Option<String>,
}

pub(super) async fn questions(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let accounts = state.config.accounts().map_err(|e| ApiError::not_configured(&e))?;
    let url = target_url(&accounts.base_url, uri.path(), uri.query());

    let proxied = SessionProxy::new(state.http.clone())
        .forward(method, &url, &headers, &[], body.to_vec())
        .await
        .map_err(|e| transport_error(&e))?;
    Ok(replay(proxied))
}

pub(super) async fn accounts_exchange(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request: ExchangeRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("invalid JSON body: {e}")))?;
    let Some(token) = required(request.token.as_deref()) else {
        return Err(ApiError::bad_request("token is required"));
    };
    let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| ApiError::bad_request("token contains invalid characters"))?;

    let accounts = state.config.accounts().map_err(|e| ApiError::not_configured(&e))?;
    let url = target_url(&accounts.base_url, "auth/exchange", None);

    let proxied = SessionProxy::new(state.http.clone())
        .forward(
            Method::POST,
            &url,
            &headers,
            &[(AUTHORIZATION, bearer)],
            body.to_vec(),
        )
        .await
        .map_err(|e| transport_error(&e))?;
    Ok(replay(proxied))
}

pub(super) async fn reviews_exchange(
    State(state): State<AppState>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let reviews = state.config.reviews().map_err(|e| ApiError::not_configured(&e))?;
    let url = target_url(&reviews.base_url, "verification/exchange", uri.query());

    let proxied = SessionProxy::new(state.http.clone())
        .forward(Method::POST, &url, &headers, &[], body.to_vec())
        .await
        .map_err(|e| transport_error(&e))?;
    Ok(replay(proxied))
}

fn transport_error(error: &UpstreamError) -> ApiError {
    tracing::error!(error = %error, "session proxy request failed");
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "upstream unavailable")
        .with_detail(error.to_string())
}

fn replay(proxied: ProxiedResponse) -> Response {
    let headers = proxied.replay_header_map();
    let mut response = Response::new(Body::from(proxied.body));
    *response.status_mut() = proxied.status;
    *response.headers_mut() = headers;
    response
}

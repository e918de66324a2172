mod agent;
mod merchant;
mod pdp;
mod session;
mod similar;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{any, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use shopgate_core::{AppConfig, Backend, ConfigError, CreatorDirectory};
use shopgate_upstream::{client_status, UpstreamError};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{trace_id, TRACE_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    /// One pooled client shared by every upstream.
    pub http: reqwest::Client,
    pub creators: Arc<CreatorDirectory>,
}

/// A failed request: the status plus a `{error, detail?, ...context}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(flatten)]
    pub context: Map<String, Value>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct BackendStatus {
    agent: bool,
    merchant: bool,
    accounts: bool,
    reviews: bool,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    timestamp: DateTime<Utc>,
    backends: BackendStatus,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.into(),
                detail: None,
                context: Map::new(),
            },
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid request").with_detail(detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not found").with_detail(detail)
    }

    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.body.detail = Some(detail.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.body.context.insert(key.to_string(), value.into());
        self
    }

    /// Like [`ApiError::with_context`], but keeps a value already present.
    #[must_use]
    pub fn with_context_default(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.body
            .context
            .entry(key.to_string())
            .or_insert_with(|| value.into());
        self
    }

    /// Maps an upstream failure to the browser-facing error.
    ///
    /// Validation failures are 400. Classified upstream failures keep their
    /// status only when it is in the pass-through set; everything else is
    /// 500. The recovered upstream status is exposed as `upstreamStatus`.
    pub fn from_upstream(error: &UpstreamError, label: &str) -> Self {
        if error.is_validation() {
            return Self::bad_request(error.to_string());
        }
        if let UpstreamError::NotConfigured(_) | UpstreamError::Http(_) = error {
            tracing::error!(error = %error, "{label}");
            return Self::new(StatusCode::INTERNAL_SERVER_ERROR, label)
                .with_detail(error.to_string());
        }

        let envelope = error.envelope();
        tracing::warn!(
            error = %error,
            upstream_status = envelope.status,
            "{label}"
        );
        let status = StatusCode::from_u16(client_status(envelope.status))
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, label)
            .with_detail(envelope.detail)
            .with_context("upstreamStatus", envelope.status)
    }

    /// A backend required by the route has no configuration.
    pub fn not_configured(error: &ConfigError) -> Self {
        tracing::error!(error = %error, "request needs an unconfigured backend");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "backend not configured")
            .with_detail(error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Unwraps a JSON body, turning malformed input into a 400.
pub(super) fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// `None` for absent or whitespace-only strings, otherwise the trimmed value.
pub(super) fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Builds the shared outbound client.
///
/// No request timeout is set, so transport defaults apply. Redirects are not
/// followed; session routes replay them to the browser.
///
/// # Errors
///
/// Returns `reqwest::Error` if the TLS backend cannot be initialised.
pub fn build_http_client(user_agent: &str) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .redirect(reqwest::redirect::Policy::none())
        .build()
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(TRACE_ID_HEADER),
        ])
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/api/agent/turn", post(agent::agent_turn))
        .route("/api/pdp", post(pdp::get_pdp))
        .route("/api/products/similar", post(similar::similar_products))
        .route(
            "/api/merchant/{resource}",
            get(merchant::collection).post(merchant::collection),
        )
        .route(
            "/api/merchant/{resource}/{*rest}",
            get(merchant::item)
                .post(merchant::item)
                .patch(merchant::item)
                .delete(merchant::item),
        )
        .route("/questions", any(session::questions))
        .route("/questions/{*rest}", any(session::questions))
        .route("/api/accounts/exchange", post(session::accounts_exchange))
        .route(
            "/api/reviews/verification/exchange",
            post(session::reviews_exchange),
        )
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .merge(api_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(trace_id)),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let config = &state.config;
    Json(HealthData {
        status: "ok",
        timestamp: Utc::now(),
        backends: BackendStatus {
            agent: config.is_configured(Backend::Agent),
            merchant: config.is_configured(Backend::Merchant),
            accounts: config.is_configured(Backend::Accounts),
            reviews: config.is_configured(Backend::Reviews),
        },
    })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;

//! Client for the merchant admin backend.
//!
//! A thin authenticated pass-through: the caller supplies verb, path, raw
//! query string, and an optional JSON body; the client adds `X-Admin-Key`.

use std::fmt;
use std::str::FromStr;

use reqwest::{Client, Method, Url};
use serde_json::Value;
use shopgate_core::{AppConfig, Backend, MerchantSettings};

use crate::envelope::extract_field;
use crate::error::{require_fields, UpstreamError};
use crate::transport::target_url;

pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Admin resources exposed through the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminResource {
    Promotions,
    Disputes,
    Returns,
}

impl AdminResource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AdminResource::Promotions => "promotions",
            AdminResource::Disputes => "disputes",
            AdminResource::Returns => "returns",
        }
    }

    /// Body fields a create (`POST` to the collection) must carry.
    #[must_use]
    pub fn create_fields(self) -> &'static [&'static str] {
        match self {
            AdminResource::Promotions => &[],
            AdminResource::Disputes | AdminResource::Returns => &["order_id"],
        }
    }
}

impl fmt::Display for AdminResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdminResource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "promotions" => Ok(AdminResource::Promotions),
            "disputes" => Ok(AdminResource::Disputes),
            "returns" => Ok(AdminResource::Returns),
            other => Err(format!("unknown admin resource: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminResponse {
    pub status: u16,
    /// `None` when the upstream returned an empty body (e.g. 204).
    pub body: Option<Value>,
}

impl AdminResponse {
    /// `field` located through the standard envelope shapes.
    #[must_use]
    pub fn payload(&self, field: &str) -> Option<&Value> {
        self.body.as_ref().and_then(|b| extract_field(b, field))
    }
}

#[derive(Debug, Clone)]
pub struct AdminClient {
    client: Client,
    settings: MerchantSettings,
}

impl AdminClient {
    #[must_use]
    pub fn new(client: Client, settings: MerchantSettings) -> Self {
        Self { client, settings }
    }

    /// Builds a client from application config.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::NotConfigured`] when the merchant base URL or
    /// admin key is missing.
    pub fn from_config(client: Client, config: &AppConfig) -> Result<Self, UpstreamError> {
        let settings = config
            .merchant()
            .map_err(|_| UpstreamError::NotConfigured(Backend::Merchant))?;
        Ok(Self::new(client, settings))
    }

    /// Creates a record in `resource` after checking its required fields.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::MissingField`] when the body lacks a field from
    ///   [`AdminResource::create_fields`]. No request is sent.
    /// - Any error from [`AdminClient::request`].
    pub async fn create(
        &self,
        resource: AdminResource,
        query: Option<&str>,
        body: &Value,
    ) -> Result<AdminResponse, UpstreamError> {
        require_fields(body, resource.create_fields())?;
        self.request(Method::POST, resource.as_str(), query, Some(body))
            .await
    }

    /// Sends one admin request.
    ///
    /// `path` is relative to the merchant base URL; `query` is the raw query
    /// string without the leading `?`.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::InvalidUrl`] if base URL and path do not form a URL.
    /// - [`UpstreamError::Http`] on network failure.
    /// - [`UpstreamError::Status`] on a non-2xx response.
    /// - [`UpstreamError::Deserialize`] if a non-empty 2xx body is not JSON.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: Option<&Value>,
    ) -> Result<AdminResponse, UpstreamError> {
        let url = self.build_url(path, query)?;

        let mut request = self
            .client
            .request(method.clone(), url)
            .header(ADMIN_KEY_HEADER, &self.settings.admin_key);
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, path, "invoking merchant admin");
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%method, path, status = status.as_u16(), "merchant admin call failed");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let body = if text.trim().is_empty() {
            None
        } else {
            Some(
                serde_json::from_str(&text).map_err(|e| UpstreamError::Deserialize {
                    context: format!("{method} {path}"),
                    source: e,
                })?,
            )
        };

        Ok(AdminResponse {
            status: status.as_u16(),
            body,
        })
    }

    fn build_url(&self, path: &str, query: Option<&str>) -> Result<Url, UpstreamError> {
        let raw = target_url(&self.settings.base_url, path, query);
        Url::parse(&raw).map_err(|e| UpstreamError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })
    }
}

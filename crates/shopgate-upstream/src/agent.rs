//! Client for the shopping-agent invocation endpoint.
//!
//! Every call is a single JSON envelope `{operation, payload, metadata}`
//! POSTed to one configured URL. Responses are parsed leniently: payload
//! fields are located with [`extract_field`] and product lists go through
//! the catalog normalizer.

use std::fmt;

use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use shopgate_catalog::products_from_value;
use shopgate_core::{AgentSettings, AppConfig, Backend, Product};

use crate::envelope::extract_field;
use crate::error::{require_fields, UpstreamError};

pub const API_KEY_HEADER: &str = "X-API-Key";
const SOURCE: &str = "shopgate";

/// Agent operations the gateway invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    GetPdpPayload,
    CreatorAgentTurn,
    FindSimilarProducts,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::GetPdpPayload => write!(f, "get_pdp_payload"),
            Operation::CreatorAgentTurn => write!(f, "creator_agent_turn"),
            Operation::FindSimilarProducts => write!(f, "find_similar_products"),
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    operation: Operation,
    payload: &'a Value,
    metadata: Metadata<'a>,
}

#[derive(Serialize)]
struct Metadata<'a> {
    source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PdpRequest {
    pub merchant_id: String,
    pub product_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PdpResponse {
    pub pdp_payload: Value,
    /// The full agent response, for debug output.
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// One conversational turn with a creator's shopping agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgentTurn {
    pub creator_id: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recent_queries: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchParams>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AgentTurnReply {
    pub reply: Option<String>,
    pub products: Vec<Product>,
    pub page_info: Option<Value>,
    pub raw: Value,
}

/// Client for the agent invocation endpoint.
///
/// Shares the caller's `reqwest::Client` so every upstream uses one
/// connection pool.
#[derive(Debug, Clone)]
pub struct AgentClient {
    client: Client,
    settings: AgentSettings,
}

impl AgentClient {
    #[must_use]
    pub fn new(client: Client, settings: AgentSettings) -> Self {
        Self { client, settings }
    }

    /// Builds a client from application config.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::NotConfigured`] when no agent URL is set.
    pub fn from_config(client: Client, config: &AppConfig) -> Result<Self, UpstreamError> {
        let settings = config
            .agent()
            .map_err(|_| UpstreamError::NotConfigured(Backend::Agent))?;
        Ok(Self::new(client, settings))
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.settings.url
    }

    /// Fetches the PDP payload for one merchant product.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::MissingField`] when `merchant_id` or `product_id`
    ///   is blank. No request is sent.
    /// - [`UpstreamError::MissingPayload`] when the response carries no
    ///   `pdp_payload`.
    /// - Any error from [`AgentClient::invoke`].
    pub async fn get_pdp_payload(
        &self,
        request: &PdpRequest,
        trace_id: Option<&str>,
    ) -> Result<PdpResponse, UpstreamError> {
        let payload = to_payload(request)?;
        require_fields(&payload, &["merchant_id", "product_id"])?;

        let raw = self
            .invoke(Operation::GetPdpPayload, &payload, trace_id)
            .await?;
        let pdp_payload = extract_field(&raw, "pdp_payload")
            .cloned()
            .ok_or(UpstreamError::MissingPayload {
                field: "pdp_payload",
            })?;

        Ok(PdpResponse { pdp_payload, raw })
    }

    /// Runs one agent turn and normalizes the products it recommends.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::MissingField`] when `creator_id` is blank or
    ///   `messages` is empty. No request is sent.
    /// - Any error from [`AgentClient::invoke`].
    pub async fn creator_agent_turn(
        &self,
        turn: &AgentTurn,
        trace_id: Option<&str>,
    ) -> Result<AgentTurnReply, UpstreamError> {
        let payload = to_payload(turn)?;
        require_fields(&payload, &["creator_id", "messages"])?;

        let raw = self
            .invoke(Operation::CreatorAgentTurn, &payload, trace_id)
            .await?;

        let reply = extract_field(&raw, "reply")
            .and_then(Value::as_str)
            .map(str::to_owned);
        let products = extract_field(&raw, "products")
            .map(products_from_value)
            .unwrap_or_default();
        let page_info = extract_field(&raw, "page_info").cloned();

        Ok(AgentTurnReply {
            reply,
            products,
            page_info,
            raw,
        })
    }

    /// Products similar to `product_id` from the creator's catalog.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::MissingField`] when `creator_id` or `product_id`
    ///   is blank. No request is sent.
    /// - Any error from [`AgentClient::invoke`].
    pub async fn find_similar_products(
        &self,
        creator_id: &str,
        product_id: &str,
        limit: Option<u32>,
        trace_id: Option<&str>,
    ) -> Result<Vec<Product>, UpstreamError> {
        let mut payload = serde_json::json!({
            "creator_id": creator_id,
            "product_id": product_id,
        });
        if let Some(limit) = limit {
            payload["limit"] = Value::from(limit);
        }
        require_fields(&payload, &["creator_id", "product_id"])?;

        let raw = self
            .invoke(Operation::FindSimilarProducts, &payload, trace_id)
            .await?;
        Ok(extract_field(&raw, "products")
            .map(products_from_value)
            .unwrap_or_default())
    }

    /// Sends one operation envelope and returns the parsed JSON response.
    ///
    /// # Errors
    ///
    /// - [`UpstreamError::Http`] on network failure.
    /// - [`UpstreamError::Status`] on a non-2xx response, carrying the raw
    ///   body text.
    /// - [`UpstreamError::Deserialize`] if a 2xx body is not JSON.
    pub async fn invoke(
        &self,
        operation: Operation,
        payload: &Value,
        trace_id: Option<&str>,
    ) -> Result<Value, UpstreamError> {
        let envelope = Envelope {
            operation,
            payload,
            metadata: Metadata {
                source: SOURCE,
                trace_id,
            },
        };

        let mut request = self.client.post(&self.settings.url).json(&envelope);
        if let Some(token) = non_blank(self.settings.bearer_token.as_deref()) {
            request = request.bearer_auth(token);
        }
        if let Some(key) = non_blank(self.settings.api_key.as_deref()) {
            request = request.header(API_KEY_HEADER, key);
        }

        tracing::debug!(%operation, trace_id, "invoking agent");
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(%operation, status = status.as_u16(), "agent call failed");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| UpstreamError::Deserialize {
            context: format!("{operation} response"),
            source: e,
        })
    }
}

fn to_payload<T: Serialize>(value: &T) -> Result<Value, UpstreamError> {
    serde_json::to_value(value).map_err(|e| UpstreamError::Deserialize {
        context: "agent payload".to_string(),
        source: e,
    })
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn envelope_serializes_operation_and_metadata() {
        let payload = json!({"creator_id": "c1"});
        let envelope = Envelope {
            operation: Operation::FindSimilarProducts,
            payload: &payload,
            metadata: Metadata {
                source: SOURCE,
                trace_id: Some("t-1"),
            },
        };
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({
                "operation": "find_similar_products",
                "payload": {"creator_id": "c1"},
                "metadata": {"source": "shopgate", "trace_id": "t-1"}
            })
        );
    }

    #[test]
    fn metadata_omits_unknown_trace_id() {
        let metadata = Metadata {
            source: SOURCE,
            trace_id: None,
        };
        assert_eq!(
            serde_json::to_value(&metadata).unwrap(),
            json!({"source": "shopgate"})
        );
    }

    #[test]
    fn turn_payload_omits_absent_fields() {
        let turn = AgentTurn {
            creator_id: "creator_001".to_string(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: "hi".to_string(),
            }],
            user_id: None,
            recent_queries: Vec::new(),
            search: None,
        };
        let payload = to_payload(&turn).unwrap();
        assert_eq!(
            payload,
            json!({
                "creator_id": "creator_001",
                "messages": [{"role": "user", "content": "hi"}]
            })
        );
    }

    #[test]
    fn operation_display_matches_wire_name() {
        for op in [
            Operation::GetPdpPayload,
            Operation::CreatorAgentTurn,
            Operation::FindSimilarProducts,
        ] {
            assert_eq!(serde_json::to_value(op).unwrap(), json!(op.to_string()));
        }
    }

    #[test]
    fn non_blank_filters_whitespace() {
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(None), None);
        assert_eq!(non_blank(Some("k")), Some("k"));
    }
}

use serde_json::Value;
use shopgate_core::Backend;
use thiserror::Error;

/// Errors returned by the agent, admin, and session upstream clients.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// A required identifying field was missing or blank. Raised before any
    /// network call.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// The backend for this call has no configured base URL or credential.
    #[error("{0} backend not configured")]
    NotConfigured(Backend),

    /// The upstream answered with a non-2xx status.
    #[error("upstream request failed: status {status}, body: {body}")]
    Status { status: u16, body: String },

    /// A 2xx response did not contain the expected payload field under any
    /// envelope shape.
    #[error("upstream response has no {field} field")]
    MissingPayload { field: &'static str },

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The configured base URL and request path do not form a valid URL.
    #[error("invalid upstream URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl UpstreamError {
    /// `true` for failures raised before any network I/O because the caller
    /// sent an incomplete request.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingField(_))
    }
}

/// Rejects `payload` unless every field in `fields` is present, with strings
/// non-blank and arrays non-empty.
///
/// # Errors
///
/// Returns [`UpstreamError::MissingField`] naming the first missing field.
pub fn require_fields(payload: &Value, fields: &[&str]) -> Result<(), UpstreamError> {
    for field in fields {
        let present = match payload.get(field) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(Value::Array(items)) => !items.is_empty(),
            Some(_) => true,
        };
        if !present {
            return Err(UpstreamError::MissingField((*field).to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn require_fields_accepts_complete_payload() {
        let payload = json!({"order_id": "o1", "items": [{"sku": "a"}], "restock": false});
        assert!(require_fields(&payload, &["order_id", "items", "restock"]).is_ok());
    }

    #[test]
    fn require_fields_rejects_blank_and_null() {
        let payload = json!({"merchant_id": "  ", "product_id": null});
        let err = require_fields(&payload, &["merchant_id", "product_id"]).unwrap_err();
        assert!(matches!(err, UpstreamError::MissingField(ref f) if f == "merchant_id"));
        assert!(err.is_validation());

        let err = require_fields(&json!({"merchant_id": "m1"}), &["merchant_id", "product_id"])
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required field: product_id");
    }

    #[test]
    fn require_fields_rejects_empty_array() {
        let err = require_fields(&json!({"messages": []}), &["messages"]).unwrap_err();
        assert!(matches!(err, UpstreamError::MissingField(ref f) if f == "messages"));
    }

    #[test]
    fn status_error_message_embeds_status_and_body() {
        let err = UpstreamError::Status {
            status: 503,
            body: r#"{"detail":"rate limited"}"#.to_string(),
        };
        assert_eq!(
            err.to_string(),
            r#"upstream request failed: status 503, body: {"detail":"rate limited"}"#
        );
    }

    #[test]
    fn not_configured_names_backend() {
        let err = UpstreamError::NotConfigured(Backend::Merchant);
        assert_eq!(err.to_string(), "merchant backend not configured");
    }
}

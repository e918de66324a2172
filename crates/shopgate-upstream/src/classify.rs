//! Upstream failure classification.
//!
//! Upstream failures reach the gateway as free-form messages such as
//! `request failed: status 503, body: {"detail":"rate limited"}`. This module
//! recovers the upstream status and a human-readable detail from them, and
//! decides which status the browser sees.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::error::UpstreamError;

/// Upstream statuses that are passed through to the browser unchanged. They
/// signal retryable or conflicting states the UI can act on.
pub const PASSTHROUGH_STATUSES: [u16; 4] = [409, 429, 503, 504];

const BODY_MARKER: &str = "body:";

static STATUS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)status\s*[:=]?\s*(\d{3})").expect("status regex is valid")
});

/// Status and detail recovered from an upstream failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    pub status: Option<u16>,
    pub detail: String,
}

/// Parses an upstream failure message.
///
/// The first `status NNN` occurrence supplies the status. Everything after
/// the first `body:` marker is the body; a JSON body with a string `detail`
/// yields that detail, any other body yields its trimmed text. Without a
/// marker the whole message is the detail.
#[must_use]
pub fn classify_message(message: &str) -> ErrorEnvelope {
    let status = STATUS_RE
        .captures(message)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u16>().ok());

    let detail = match message.find(BODY_MARKER) {
        Some(idx) => detail_from_body(&message[idx + BODY_MARKER.len()..]),
        None => message.to_string(),
    };

    ErrorEnvelope { status, detail }
}

/// Detail text for a raw upstream body.
#[must_use]
pub fn detail_from_body(body: &str) -> String {
    let body = body.trim();
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(obj)) => match obj.get("detail") {
            Some(Value::String(detail)) => detail.clone(),
            _ => body.to_string(),
        },
        _ => body.to_string(),
    }
}

/// Maps an upstream status to the status returned to the browser: members of
/// [`PASSTHROUGH_STATUSES`] pass through, everything else (unknown included)
/// becomes 500.
#[must_use]
pub fn client_status(upstream: Option<u16>) -> u16 {
    match upstream {
        Some(status) if PASSTHROUGH_STATUSES.contains(&status) => status,
        _ => 500,
    }
}

impl UpstreamError {
    /// Classifies this failure. Status errors are read structurally; every
    /// other variant goes through [`classify_message`].
    #[must_use]
    pub fn envelope(&self) -> ErrorEnvelope {
        match self {
            Self::Status { status, body } if body.trim().is_empty() => ErrorEnvelope {
                status: Some(*status),
                detail: format!("upstream returned status {status}"),
            },
            Self::Status { status, body } => ErrorEnvelope {
                status: Some(*status),
                detail: detail_from_body(body),
            },
            other => classify_message(&other.to_string()),
        }
    }
}

//! Success payload extraction.
//!
//! Upstream services disagree on where the payload lives: some return it
//! flat, some under `output`, some under `data`. Extraction tries each shape
//! in [`ENVELOPE_PRIORITY`] order and takes the first hit.

use serde_json::Value;

/// One place a payload field can live in an upstream response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopePath {
    /// `body.<field>`
    Flat,
    /// `body.output.<field>`
    Output,
    /// `body.data.<field>`
    Data,
}

pub const ENVELOPE_PRIORITY: [EnvelopePath; 3] =
    [EnvelopePath::Flat, EnvelopePath::Output, EnvelopePath::Data];

impl EnvelopePath {
    fn container<'a>(self, body: &'a Value) -> Option<&'a Value> {
        match self {
            EnvelopePath::Flat => Some(body),
            EnvelopePath::Output => body.get("output"),
            EnvelopePath::Data => body.get("data"),
        }
    }

    /// The field at this path, ignoring explicit `null`s.
    #[must_use]
    pub fn lookup<'a>(self, body: &'a Value, field: &str) -> Option<&'a Value> {
        self.container(body)?.get(field).filter(|v| !v.is_null())
    }
}

/// First non-null `field` across [`ENVELOPE_PRIORITY`].
#[must_use]
pub fn extract_field<'a>(body: &'a Value, field: &str) -> Option<&'a Value> {
    ENVELOPE_PRIORITY
        .iter()
        .find_map(|path| path.lookup(body, field))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn priority_order_is_flat_output_data() {
        assert_eq!(
            ENVELOPE_PRIORITY,
            [EnvelopePath::Flat, EnvelopePath::Output, EnvelopePath::Data]
        );
    }

    #[test]
    fn flat_field_wins_over_nested() {
        let body = json!({
            "reply": "flat",
            "output": {"reply": "output"},
            "data": {"reply": "data"}
        });
        assert_eq!(extract_field(&body, "reply"), Some(&json!("flat")));
    }

    #[test]
    fn output_wins_over_data() {
        let body = json!({"output": {"reply": "output"}, "data": {"reply": "data"}});
        assert_eq!(extract_field(&body, "reply"), Some(&json!("output")));
    }

    #[test]
    fn falls_back_to_data() {
        let body = json!({"data": {"pdp_payload": {"product": {}}}});
        assert_eq!(
            extract_field(&body, "pdp_payload"),
            Some(&json!({"product": {}}))
        );
    }

    #[test]
    fn null_does_not_shadow_later_shapes() {
        let body = json!({"products": null, "output": {"products": []}});
        assert_eq!(extract_field(&body, "products"), Some(&json!([])));
    }

    #[test]
    fn missing_everywhere_is_none() {
        assert!(extract_field(&json!({"output": "text"}), "reply").is_none());
        assert!(extract_field(&json!([1, 2]), "reply").is_none());
    }
}

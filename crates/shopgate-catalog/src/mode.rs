//! Beauty vs generic product classification.
//!
//! A keyword heuristic over the product's descriptive text. It decides which
//! attribute vocabulary the PDP shows; it is not a taxonomy.

use serde::Serialize;
use serde_json::Value;

const BEAUTY_KEYWORDS: &[&str] = &[
    "beauty",
    "makeup",
    "cosmetic",
    "skincare",
    "lip",
    "lips",
    "lipstick",
    "foundation",
    "concealer",
    "blush",
    "mascara",
    "eyeshadow",
    "fragrance",
    "perfume",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductMode {
    Beauty,
    Generic,
}

/// The text fields the classifier reads. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModeSignals {
    pub category_path: Vec<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub brand: Option<String>,
    pub tags: Vec<String>,
    pub department: Option<String>,
}

impl ModeSignals {
    /// Reads signals from an untyped PDP product object.
    ///
    /// Accepts `category_path` as an array or a `" > "`-separated string,
    /// and `brand` as a string or an object with a `name`. Anything missing
    /// or of an unexpected type is treated as absent.
    #[must_use]
    pub fn from_product_value(product: &Value) -> Self {
        let text = |key: &str| {
            product
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_owned)
        };
        let strings = |value: Option<&Value>| -> Vec<String> {
            match value {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_owned)
                    .collect(),
                Some(Value::String(s)) => s.split('>').map(|p| p.trim().to_owned()).collect(),
                _ => Vec::new(),
            }
        };

        let brand = match product.get("brand") {
            Some(Value::String(name)) => Some(name.clone()),
            Some(Value::Object(obj)) => obj.get("name").and_then(Value::as_str).map(str::to_owned),
            _ => None,
        };

        Self {
            category_path: strings(
                product
                    .get("category_path")
                    .or_else(|| product.get("categoryPath")),
            ),
            title: text("title"),
            subtitle: text("subtitle"),
            brand,
            tags: strings(product.get("tags")),
            department: text("department"),
        }
    }

    fn haystack(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        parts.extend(self.category_path.iter().map(String::as_str));
        parts.push(self.title.as_deref().unwrap_or_default());
        parts.push(self.subtitle.as_deref().unwrap_or_default());
        parts.push(self.brand.as_deref().unwrap_or_default());
        parts.extend(self.tags.iter().map(String::as_str));
        parts.push(self.department.as_deref().unwrap_or_default());
        parts.join(" ").to_lowercase()
    }
}

/// Classifies a product as [`ProductMode::Beauty`] when any beauty keyword
/// occurs anywhere in its signals.
#[must_use]
pub fn detect_mode(signals: &ModeSignals) -> ProductMode {
    let haystack = signals.haystack();
    if BEAUTY_KEYWORDS.iter().any(|kw| haystack.contains(kw)) {
        ProductMode::Beauty
    } else {
        ProductMode::Generic
    }
}

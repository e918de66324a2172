use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A product in the canonical shape the storefront UI consumes.
///
/// Built only by the catalog normalizer from an upstream record. Optional
/// fields the upstream did not send are omitted from the serialized JSON
/// rather than emitted as `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Price in major currency units, e.g. `24.0` for $24.00.
    pub price: f64,
    /// ISO 4217 currency code, passed through as upstream sent it.
    pub currency: String,
    pub image_url: String,
    pub inventory_quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    /// How many times creators mentioned the product.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator_mentions: Option<i64>,
    /// `true` when the creator sells the product directly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_creator_directly: Option<bool>,
    /// Merchant product page outside the creator storefront.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_deal: Option<Deal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all_deals: Option<Vec<Deal>>,
    /// Whole-number discount derived from `best_deal`, for badge display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percent: Option<u32>,
}

impl Product {
    /// Whether `best_deal` also appears in `all_deals`.
    ///
    /// `None` when there is no best deal or no deal list to compare against.
    /// Upstream does not guarantee membership; callers may only log this.
    #[must_use]
    pub fn best_deal_is_listed(&self) -> Option<bool> {
        let best = self.best_deal.as_ref()?;
        let all = self.all_deals.as_ref()?;
        Some(all.iter().any(|d| d == best))
    }
}

/// Urgency tier attached to a flash sale. Unknown tiers are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
    #[serde(untagged)]
    Other(String),
}

/// A merchandising deal supplied by upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Deal {
    /// Percentage off once the cart holds at least `min_quantity` units.
    #[serde(rename_all = "camelCase")]
    MultiBuyDiscount {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        deal_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        discount_percent: f64,
        min_quantity: u32,
    },
    /// Absolute sale price until `end_at`.
    #[serde(rename_all = "camelCase")]
    FlashSale {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        deal_id: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        flash_price: f64,
        /// Expiry timestamp exactly as upstream sent it, string or number.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        end_at: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        urgency_level: Option<UrgencyLevel>,
    },
}

/// A single free-text option on a variant, e.g. `Color: Rose`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    pub name: String,
    pub value: String,
}

impl VariantOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Beauty-specific variant metadata. Each field, when present, takes
/// precedence over an equivalent free-text option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeautyMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undertone: Option<String>,
}

/// One purchasable configuration of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub options: Vec<VariantOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beauty_meta: Option<BeautyMeta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flash_sale() -> Deal {
        Deal::FlashSale {
            deal_id: Some("d-1".to_string()),
            label: None,
            flash_price: 19.0,
            end_at: Some("2026-11-01T00:00:00Z".into()),
            urgency_level: Some(UrgencyLevel::High),
        }
    }

    fn make_product() -> Product {
        Product {
            id: "prod_1".to_string(),
            title: "Velvet Lip Tint".to_string(),
            description: "Long-wear tint.".to_string(),
            price: 24.0,
            currency: "USD".to_string(),
            image_url: "https://cdn.example.com/tint.jpg".to_string(),
            inventory_quantity: 3,
            merchant_id: None,
            merchant_name: None,
            creator_mentions: None,
            from_creator_directly: None,
            external_url: None,
            best_deal: None,
            all_deals: None,
            discount_percent: None,
        }
    }

    #[test]
    fn absent_optionals_are_omitted_from_json() {
        let json = serde_json::to_value(make_product()).expect("serialize");
        let obj = json.as_object().expect("object");
        assert!(!obj.contains_key("merchantId"));
        assert!(!obj.contains_key("bestDeal"));
        assert!(!obj.contains_key("discountPercent"));
        assert_eq!(obj["imageUrl"], "https://cdn.example.com/tint.jpg");
    }

    #[test]
    fn deal_serializes_with_type_tag() {
        let json = serde_json::to_value(flash_sale()).expect("serialize");
        assert_eq!(json["type"], "FLASH_SALE");
        assert_eq!(json["flashPrice"], 19.0);
        assert_eq!(json["urgencyLevel"], "high");
    }

    #[test]
    fn unknown_urgency_level_is_preserved() {
        let level: UrgencyLevel = serde_json::from_str("\"critical\"").expect("deserialize");
        assert_eq!(level, UrgencyLevel::Other("critical".to_string()));
        assert_eq!(
            serde_json::from_str::<UrgencyLevel>("\"medium\"").unwrap(),
            UrgencyLevel::Medium
        );
    }

    #[test]
    fn best_deal_membership() {
        let mut product = make_product();
        assert_eq!(product.best_deal_is_listed(), None);

        product.best_deal = Some(flash_sale());
        product.all_deals = Some(vec![flash_sale()]);
        assert_eq!(product.best_deal_is_listed(), Some(true));

        product.all_deals = Some(vec![]);
        assert_eq!(product.best_deal_is_listed(), Some(false));
    }
}

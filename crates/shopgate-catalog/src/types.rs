//! Upstream product record types as the shopping agent returns them.
//!
//! ## Field naming
//! Agent responses use snake_case (`image_url`, `inventory_quantity`). Every
//! field also accepts the canonical camelCase spelling as an alias, so a
//! [`shopgate_core::Product`] serialized by this gateway parses back into a
//! [`RawProduct`] and normalizes to the same value.
//!
//! ## Identity
//! Older agent builds send `product_id` instead of `id`, and some send both.
//! `id` wins when it is non-blank; a record with neither key is rejected.
//! Variants follow the same rule with `variant_id`.
//!
//! ## Deals
//! `best_deal` is zero-or-one deal object; `all_deals` is an ordered list.
//! Deals are tagged on `type` (`MULTI_BUY_DISCOUNT` or `FLASH_SALE`). Upstream
//! does not promise that `best_deal` is one of `all_deals`.
//!
//! ## Expiry
//! `end_at` is opaque: RFC 3339 strings and epoch numbers are both passed
//! through untouched.
//!
//! ## Prices
//! `price` and `flash_price` are JSON numbers in major currency units.

use serde::Deserialize;
use serde_json::Value;
use shopgate_core::{BeautyMeta, UrgencyLevel, VariantOption};

/// A single product record from the agent backend.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProduct {
    #[serde(flatten)]
    pub id: ProductId,

    pub title: String,

    pub description: String,

    pub price: f64,

    pub currency: String,

    #[serde(alias = "imageUrl")]
    pub image_url: String,

    #[serde(alias = "inventoryQuantity")]
    pub inventory_quantity: i64,

    #[serde(default, alias = "merchantId")]
    pub merchant_id: Option<String>,

    #[serde(default, alias = "merchantName")]
    pub merchant_name: Option<String>,

    #[serde(default, alias = "creatorMentions")]
    pub creator_mentions: Option<i64>,

    #[serde(default, alias = "fromCreatorDirectly")]
    pub from_creator_directly: Option<bool>,

    #[serde(default, alias = "externalUrl")]
    pub external_url: Option<String>,

    #[serde(default, alias = "bestDeal")]
    pub best_deal: Option<RawDeal>,

    /// Absent and `null` both deserialize to `None`; an empty list stays `Some([])`.
    #[serde(default, alias = "allDeals")]
    pub all_deals: Option<Vec<RawDeal>>,
}

/// A deal as the merchandising system sends it.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RawDeal {
    MultiBuyDiscount {
        #[serde(default, alias = "dealId")]
        deal_id: Option<String>,
        #[serde(default)]
        label: Option<String>,
        #[serde(alias = "discountPercent")]
        discount_percent: f64,
        #[serde(alias = "minQuantity")]
        min_quantity: u32,
    },
    FlashSale {
        #[serde(default, alias = "dealId")]
        deal_id: Option<String>,
        #[serde(default)]
        label: Option<String>,
        #[serde(alias = "flashPrice")]
        flash_price: f64,
        #[serde(default, alias = "endAt")]
        end_at: Option<Value>,
        #[serde(default, alias = "urgencyLevel")]
        urgency_level: Option<UrgencyLevel>,
    },
}

/// A purchasable variant inside a PDP payload.
///
/// Option names are free text (`"Color"`, `"Shade"`, `"Colour Way"`), so the
/// option list is kept as-is and interpreted by [`crate::variants`].
#[derive(Debug, Clone, Deserialize)]
pub struct RawVariant {
    #[serde(flatten)]
    pub id: VariantId,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub options: Vec<VariantOption>,

    #[serde(default, alias = "beautyMeta")]
    pub beauty_meta: Option<BeautyMeta>,

    #[serde(default)]
    pub price: Option<f64>,

    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,

    #[serde(default)]
    pub available: Option<bool>,
}

/// Product identifier taken from `id`, falling back to `product_id`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "ProductIdKeys")]
pub struct ProductId(pub String);

#[derive(Deserialize)]
struct ProductIdKeys {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    product_id: Option<String>,
}

impl TryFrom<ProductIdKeys> for ProductId {
    type Error = String;

    fn try_from(keys: ProductIdKeys) -> Result<Self, Self::Error> {
        first_non_blank(keys.id, keys.product_id)
            .map(Self)
            .ok_or_else(|| "missing field `id` (or `product_id`)".to_string())
    }
}

/// Variant identifier taken from `id`, falling back to `variant_id`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "VariantIdKeys")]
pub struct VariantId(pub String);

#[derive(Deserialize)]
struct VariantIdKeys {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, alias = "variantId")]
    variant_id: Option<String>,
}

impl TryFrom<VariantIdKeys> for VariantId {
    type Error = String;

    fn try_from(keys: VariantIdKeys) -> Result<Self, Self::Error> {
        first_non_blank(keys.id, keys.variant_id)
            .map(Self)
            .ok_or_else(|| "missing field `id` (or `variant_id`)".to_string())
    }
}

fn first_non_blank(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    primary
        .filter(|v| !v.trim().is_empty())
        .or_else(|| fallback.filter(|v| !v.trim().is_empty()))
}

//! Normalization from raw agent records to [`shopgate_core::Product`].
//!
//! Every canonical field is assigned from exactly one raw field. The only
//! computed field is `discount_percent`, which is derived from the best deal.

use serde_json::Value;
use shopgate_core::{Deal, Product, Variant};

use crate::types::{RawDeal, RawProduct, RawVariant};

/// Normalizes a raw [`RawProduct`] into a [`Product`].
///
/// Total: every well-typed raw record produces a product.
#[must_use]
pub fn normalize_product(raw: RawProduct) -> Product {
    let best_deal = raw.best_deal.map(normalize_deal);
    let all_deals = raw
        .all_deals
        .map(|deals| deals.into_iter().map(normalize_deal).collect::<Vec<_>>());
    let discount_percent = best_deal
        .as_ref()
        .and_then(|deal| discount_percent(raw.price, deal));

    let product = Product {
        id: raw.id.0,
        title: raw.title,
        description: raw.description,
        price: raw.price,
        currency: raw.currency,
        image_url: raw.image_url,
        inventory_quantity: raw.inventory_quantity,
        merchant_id: raw.merchant_id,
        merchant_name: raw.merchant_name,
        creator_mentions: raw.creator_mentions,
        from_creator_directly: raw.from_creator_directly,
        external_url: raw.external_url,
        best_deal,
        all_deals,
        discount_percent,
    };

    if product.best_deal_is_listed() == Some(false) {
        tracing::debug!(
            product_id = %product.id,
            "best deal is not among the product's listed deals"
        );
    }

    product
}

/// Normalizes an optional list of raw products. An absent list yields an
/// empty vector.
#[must_use]
pub fn normalize_products(raw: Option<Vec<RawProduct>>) -> Vec<Product> {
    raw.unwrap_or_default()
        .into_iter()
        .map(normalize_product)
        .collect()
}

/// Parses and normalizes an untyped product list taken from an agent
/// response.
///
/// Entries that do not match the raw product shape are skipped and logged;
/// one malformed record never drops the rest of the list. A value that is not
/// an array (including `null`) yields an empty vector.
#[must_use]
pub fn products_from_value(value: &Value) -> Vec<Product> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(
            |(idx, item)| match serde_json::from_value::<RawProduct>(item.clone()) {
                Ok(raw) => Some(normalize_product(raw)),
                Err(e) => {
                    tracing::warn!(index = idx, error = %e, "skipping malformed upstream product");
                    None
                }
            },
        )
        .collect()
}

/// Normalizes raw variants into canonical [`Variant`] values, keeping order.
#[must_use]
pub fn normalize_variants(raw: Vec<RawVariant>) -> Vec<Variant> {
    raw.into_iter().map(normalize_variant).collect()
}

fn normalize_variant(raw: RawVariant) -> Variant {
    Variant {
        id: raw.id.0,
        title: raw.title,
        options: raw.options,
        beauty_meta: raw.beauty_meta,
        price: raw.price,
        image_url: raw.image_url,
        available: raw.available,
    }
}

fn normalize_deal(raw: RawDeal) -> Deal {
    match raw {
        RawDeal::MultiBuyDiscount {
            deal_id,
            label,
            discount_percent,
            min_quantity,
        } => Deal::MultiBuyDiscount {
            deal_id,
            label,
            discount_percent,
            min_quantity,
        },
        RawDeal::FlashSale {
            deal_id,
            label,
            flash_price,
            end_at,
            urgency_level,
        } => Deal::FlashSale {
            deal_id,
            label,
            flash_price,
            end_at,
            urgency_level,
        },
    }
}

/// Whole-number discount badge for `deal` against the list `price`.
///
/// Multi-buy deals report their own percentage. Flash sales report the
/// relative saving, and only when the flash price is actually below a
/// positive list price.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn discount_percent(price: f64, deal: &Deal) -> Option<u32> {
    let percent = match deal {
        Deal::MultiBuyDiscount {
            discount_percent, ..
        } => *discount_percent,
        Deal::FlashSale { flash_price, .. } => {
            if price <= 0.0 || *flash_price >= price {
                return None;
            }
            (price - flash_price) / price * 100.0
        }
    };

    if !percent.is_finite() || percent <= 0.0 {
        return None;
    }
    // Clamped to 0..=100 above, so the cast cannot truncate or lose sign.
    Some(percent.round().min(100.0) as u32)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

//! Derived PDP view: mode, option vocabulary, per-variant display
//! attributes, and the resolved selection.

use serde::Serialize;
use serde_json::Value;
use shopgate_core::Variant;

use crate::mode::{detect_mode, ModeSignals, ProductMode};
use crate::normalize::normalize_variants;
use crate::types::RawVariant;
use crate::variants::{
    beauty_attributes, collect_values, extra_attributes, option_value, resolve_selection,
    LabeledAttribute, Resolution, Selection, COLOR_KEYS, SIZE_KEYS,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PdpView {
    pub mode: ProductMode,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub variants: Vec<VariantSummary>,
    pub selection: SelectionOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_variant_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOutcome {
    NothingRequested,
    Matched,
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantSummary {
    pub variant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    pub attributes: Vec<VariantAttribute>,
    /// Only filled for beauty products.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub beauty_attributes: Vec<LabeledAttribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantAttribute {
    pub name: String,
    pub value: String,
}

/// Builds the view for the `product` object inside a PDP payload.
///
/// Returns `None` when the payload has no `product` object or the product
/// has no `variants` array. Malformed variant entries are skipped.
#[must_use]
pub fn build_pdp_view(pdp_payload: &Value, selection: Selection<'_>) -> Option<PdpView> {
    let product = pdp_payload.get("product").filter(|p| p.is_object())?;
    let raw_items = product.get("variants")?.as_array()?;

    let raw_variants: Vec<RawVariant> = raw_items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed PDP variant");
                None
            }
        })
        .collect();
    let variants = normalize_variants(raw_variants);

    let mode = detect_mode(&ModeSignals::from_product_value(product));
    let resolution = resolve_selection(&variants, selection);

    Some(PdpView {
        mode,
        colors: owned(collect_values(&variants, COLOR_KEYS)),
        sizes: owned(collect_values(&variants, SIZE_KEYS)),
        variants: variants.iter().map(|v| summarize(v, mode)).collect(),
        selection: match resolution {
            Resolution::NothingRequested => SelectionOutcome::NothingRequested,
            Resolution::Matched(_) => SelectionOutcome::Matched,
            Resolution::NoMatch => SelectionOutcome::NoMatch,
        },
        selected_variant_id: resolution.variant().map(|v| v.id.clone()),
    })
}

fn summarize(variant: &Variant, mode: ProductMode) -> VariantSummary {
    VariantSummary {
        variant_id: variant.id.clone(),
        color: option_value(variant, COLOR_KEYS).map(str::to_owned),
        size: option_value(variant, SIZE_KEYS).map(str::to_owned),
        attributes: extra_attributes(variant)
            .into_iter()
            .map(|o| VariantAttribute {
                name: o.name.to_owned(),
                value: o.value.to_owned(),
            })
            .collect(),
        beauty_attributes: match mode {
            ProductMode::Beauty => beauty_attributes(variant),
            ProductMode::Generic => Vec::new(),
        },
    }
}

fn owned(values: Vec<&str>) -> Vec<String> {
    values.into_iter().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn lip_payload() -> Value {
        json!({
            "product": {
                "title": "Velvet Lip Tint",
                "category_path": ["Beauty", "Lip"],
                "variants": [
                    {
                        "id": "v-rose",
                        "title": "Rose",
                        "options": [
                            {"name": "Shade", "value": "Rose"},
                            {"name": "Size", "value": "Full"}
                        ],
                        "beauty_meta": {"finish": "Matte"}
                    },
                    {
                        "id": "v-nude",
                        "title": "Nude",
                        "options": [
                            {"name": "Shade", "value": "Nude"},
                            {"name": "Size", "value": "Mini"},
                            {"name": "Scent", "value": "Vanilla"}
                        ]
                    },
                    {"title": "missing id"}
                ]
            }
        })
    }

    #[test]
    fn builds_beauty_view_with_vocabulary() {
        let view = build_pdp_view(&lip_payload(), Selection::default()).expect("view");
        assert_eq!(view.mode, ProductMode::Beauty);
        assert_eq!(view.colors, ["Rose", "Nude"]);
        assert_eq!(view.sizes, ["Full", "Mini"]);
        assert_eq!(view.variants.len(), 2, "malformed variant is skipped");
        assert_eq!(view.variants[0].beauty_attributes[0].value, "Matte");
        assert_eq!(view.variants[1].attributes[0].name, "Scent");
        assert_eq!(view.selection, SelectionOutcome::NothingRequested);
        assert!(view.selected_variant_id.is_none());
    }

    #[test]
    fn resolves_selection() {
        let view = build_pdp_view(
            &lip_payload(),
            Selection {
                color: Some("Nude"),
                size: Some("Mini"),
            },
        )
        .expect("view");
        assert_eq!(view.selection, SelectionOutcome::Matched);
        assert_eq!(view.selected_variant_id.as_deref(), Some("v-nude"));
    }

    #[test]
    fn unsatisfiable_selection_has_no_selected_variant() {
        let view = build_pdp_view(
            &lip_payload(),
            Selection {
                color: Some("Rose"),
                size: Some("Mini"),
            },
        )
        .expect("view");
        assert_eq!(view.selection, SelectionOutcome::NoMatch);
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("selectedVariantId").is_none());
        assert_eq!(json["selection"], "no_match");
    }

    #[test]
    fn generic_products_carry_no_beauty_attributes() {
        let payload = json!({
            "product": {
                "title": "Trail Runner 2",
                "category_path": ["Sportswear"],
                "variants": [
                    {"id": "v1", "options": [{"name": "Finish", "value": "Gloss"}]}
                ]
            }
        });
        let view = build_pdp_view(&payload, Selection::default()).expect("view");
        assert_eq!(view.mode, ProductMode::Generic);
        assert!(view.variants[0].beauty_attributes.is_empty());
    }

    #[test]
    fn no_view_without_product_variants() {
        assert!(build_pdp_view(&json!({}), Selection::default()).is_none());
        assert!(build_pdp_view(&json!({"product": {"title": "x"}}), Selection::default()).is_none());
        assert!(build_pdp_view(&json!({"product": "x"}), Selection::default()).is_none());
    }
}

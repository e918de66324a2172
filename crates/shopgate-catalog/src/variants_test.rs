use shopgate_core::{BeautyMeta, VariantOption};

use super::*;

fn variant(id: &str, options: &[(&str, &str)]) -> Variant {
    Variant {
        id: id.to_string(),
        title: id.to_string(),
        options: options
            .iter()
            .map(|(name, value)| VariantOption::new(*name, *value))
            .collect(),
        beauty_meta: None,
        price: None,
        image_url: None,
        available: None,
    }
}

fn apparel() -> Vec<Variant> {
    vec![
        variant("red-s", &[("Color", "Red"), ("Size", "S")]),
        variant("red-m", &[("Color", "Red"), ("Size", "M")]),
        variant("blue-m", &[("Colour Way", "Blue"), ("Size (US)", "M")]),
    ]
}

// -----------------------------------------------------------------------
// option_value
// -----------------------------------------------------------------------

#[test]
fn option_value_matches_shade_with_single_key() {
    let v = variant("rose", &[("Shade", "Rose")]);
    assert_eq!(option_value(&v, &["shade"]), Some("Rose"));
}

#[test]
fn option_value_matches_shade_with_color_key_set() {
    let v = variant("rose", &[("Shade", "Rose")]);
    assert_eq!(option_value(&v, COLOR_KEYS), Some("Rose"));
}

#[test]
fn option_value_is_case_insensitive_substring() {
    let v = variant("blue", &[("Material", "Knit"), ("COLOUR WAY", "Blue")]);
    assert_eq!(option_value(&v, &["colour"]), Some("Blue"));
    // "color" is not a substring of "colour way".
    assert_eq!(option_value(&v, &["color"]), None);
}

#[test]
fn option_value_returns_first_matching_option() {
    let v = variant("x", &[("Size", "S"), ("Size Guide", "Regular")]);
    assert_eq!(option_value(&v, SIZE_KEYS), Some("S"));
}

#[test]
fn option_value_none_when_no_option_matches() {
    let v = variant("x", &[("Material", "Cotton")]);
    assert_eq!(option_value(&v, COLOR_KEYS), None);
}

// -----------------------------------------------------------------------
// collect_values
// -----------------------------------------------------------------------

#[test]
fn collect_values_deduplicates() {
    let variants = apparel();
    let mut colors = collect_values(&variants, COLOR_KEYS);
    colors.sort_unstable();
    assert_eq!(colors, ["Blue", "Red"]);

    let mut sizes = collect_values(&variants, SIZE_KEYS);
    sizes.sort_unstable();
    assert_eq!(sizes, ["M", "S"]);
}

#[test]
fn collect_values_empty_for_no_variants() {
    assert!(collect_values(&[], COLOR_KEYS).is_empty());
}

// -----------------------------------------------------------------------
// resolve_selection
// -----------------------------------------------------------------------

#[test]
fn resolve_nothing_requested_is_not_a_match() {
    let variants = apparel();
    assert_eq!(
        resolve_selection(&variants, Selection::default()),
        Resolution::NothingRequested
    );
    assert!(resolve_selection(&variants, Selection::default())
        .variant()
        .is_none());
}

#[test]
fn resolve_color_and_size() {
    let variants = apparel();
    let resolved = resolve_selection(
        &variants,
        Selection {
            color: Some("Red"),
            size: Some("M"),
        },
    );
    assert_eq!(resolved.variant().map(|v| v.id.as_str()), Some("red-m"));
}

#[test]
fn resolve_color_only_returns_first_matching_variant() {
    let variants = apparel();
    let resolved = resolve_selection(
        &variants,
        Selection {
            color: Some("Red"),
            size: None,
        },
    );
    assert_eq!(resolved.variant().map(|v| v.id.as_str()), Some("red-s"));
}

#[test]
fn resolve_size_only_ignores_color() {
    let variants = apparel();
    let resolved = resolve_selection(
        &variants,
        Selection {
            color: None,
            size: Some("M"),
        },
    );
    assert_eq!(resolved.variant().map(|v| v.id.as_str()), Some("red-m"));
}

#[test]
fn resolve_unsatisfiable_selection_is_no_match() {
    let variants = apparel();
    assert_eq!(
        resolve_selection(
            &variants,
            Selection {
                color: Some("Blue"),
                size: Some("S"),
            },
        ),
        Resolution::NoMatch
    );
}

#[test]
fn resolve_requires_exact_value() {
    let variants = apparel();
    assert_eq!(
        resolve_selection(
            &variants,
            Selection {
                color: Some("red"),
                size: None,
            },
        ),
        Resolution::NoMatch
    );
}

#[test]
fn resolve_variant_without_requested_dimension_does_not_match() {
    let variants = vec![variant("one-size", &[("Color", "Black")])];
    assert_eq!(
        resolve_selection(
            &variants,
            Selection {
                color: Some("Black"),
                size: Some("M"),
            },
        ),
        Resolution::NoMatch
    );
}

/// Every requested dimension must match; anything else is `NoMatch`.
#[test]
fn resolve_matches_iff_a_variant_satisfies_all_requested_dimensions() {
    let variants = apparel();
    let colors = [None, Some("Red"), Some("Blue"), Some("Green")];
    let sizes = [None, Some("S"), Some("M"), Some("XL")];

    for color in colors {
        for size in sizes {
            let selection = Selection { color, size };
            let expected = variants.iter().find(|v| {
                color.is_none_or(|c| option_value(v, COLOR_KEYS) == Some(c))
                    && size.is_none_or(|s| option_value(v, SIZE_KEYS) == Some(s))
            });
            let resolved = resolve_selection(&variants, selection);
            if color.is_none() && size.is_none() {
                assert_eq!(resolved, Resolution::NothingRequested);
            } else {
                assert_eq!(
                    resolved.variant().map(|v| &v.id),
                    expected.map(|v| &v.id),
                    "selection {selection:?}"
                );
            }
        }
    }
}

// -----------------------------------------------------------------------
// attribute extraction
// -----------------------------------------------------------------------

#[test]
fn extra_attributes_skip_reserved_names_and_cap_at_three() {
    let v = variant(
        "x",
        &[
            ("Color", "Red"),
            ("Material", "Wool"),
            ("Size", "M"),
            ("Fit", "Relaxed"),
            ("Finish", "Matte"),
            ("Length", "Long"),
            ("Care", "Hand wash"),
        ],
    );
    let names: Vec<_> = extra_attributes(&v).iter().map(|o| o.name).collect();
    assert_eq!(names, ["Material", "Fit", "Length"]);
}

#[test]
fn beauty_attributes_prefer_metadata_over_options() {
    let mut v = variant(
        "rose",
        &[("Shade", "Rose"), ("Finish", "Satin"), ("Coverage", "Sheer")],
    );
    v.beauty_meta = Some(BeautyMeta {
        finish: Some("Matte".to_string()),
        coverage: None,
        undertone: Some("Warm".to_string()),
    });

    let attrs = beauty_attributes(&v);
    assert_eq!(
        attrs,
        vec![
            LabeledAttribute {
                label: "Finish",
                value: "Matte".to_string()
            },
            LabeledAttribute {
                label: "Coverage",
                value: "Sheer".to_string()
            },
            LabeledAttribute {
                label: "Undertone",
                value: "Warm".to_string()
            },
        ]
    );
}

#[test]
fn beauty_attributes_blank_metadata_falls_back_to_option() {
    let mut v = variant("rose", &[("Finish", "Satin")]);
    v.beauty_meta = Some(BeautyMeta {
        finish: Some("  ".to_string()),
        ..BeautyMeta::default()
    });
    let attrs = beauty_attributes(&v);
    assert_eq!(attrs.len(), 1);
    assert_eq!(attrs[0].value, "Satin");
}

#[test]
fn beauty_attributes_empty_without_sources() {
    let v = variant("plain", &[("Color", "Red")]);
    assert!(beauty_attributes(&v).is_empty());
}

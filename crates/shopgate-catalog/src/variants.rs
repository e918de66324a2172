//! Variant option lookup, vocabulary collection, and selection resolution.
//!
//! Upstream option names are not standardized (`"Color"`, `"Colour Way"`,
//! `"Shade"`, `"Size (US)"`), so every lookup goes through a key set and
//! matches when the lower-cased option name *contains* any key.

use serde::Serialize;
use shopgate_core::Variant;

pub const COLOR_KEYS: &[&str] = &["color", "colour", "shade", "tone"];
pub const SIZE_KEYS: &[&str] = &["size"];
pub const FINISH_KEYS: &[&str] = &["finish"];
pub const COVERAGE_KEYS: &[&str] = &["coverage"];
pub const UNDERTONE_KEYS: &[&str] = &["undertone"];

/// Display cap for per-variant attribute lists.
pub const MAX_DISPLAY_ATTRIBUTES: usize = 3;

/// Returns `true` when `name` contains any of `keys`, ignoring case.
fn name_matches(name: &str, keys: &[&str]) -> bool {
    let lower = name.to_lowercase();
    keys.iter().any(|key| lower.contains(&key.to_lowercase()))
}

/// Value of the first option on `variant` whose name matches `keys`.
#[must_use]
pub fn option_value<'a>(variant: &'a Variant, keys: &[&str]) -> Option<&'a str> {
    variant
        .options
        .iter()
        .find(|opt| name_matches(&opt.name, keys))
        .map(|opt| opt.value.as_str())
}

/// Distinct option values for `keys` across all variants, in first-seen order.
#[must_use]
pub fn collect_values<'a>(variants: &'a [Variant], keys: &[&str]) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for value in variants.iter().filter_map(|v| option_value(v, keys)) {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// A (possibly partial) color/size selection from the storefront.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection<'a> {
    pub color: Option<&'a str>,
    pub size: Option<&'a str>,
}

/// Outcome of [`resolve_selection`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'a> {
    /// Neither a color nor a size was requested.
    NothingRequested,
    Matched(&'a Variant),
    /// No variant satisfies every requested dimension.
    NoMatch,
}

impl<'a> Resolution<'a> {
    #[must_use]
    pub fn variant(self) -> Option<&'a Variant> {
        match self {
            Resolution::Matched(v) => Some(v),
            Resolution::NothingRequested | Resolution::NoMatch => None,
        }
    }
}

/// Resolves the first variant whose color and size options equal the
/// requested values. A dimension that was not requested matches any variant.
///
/// Never falls back to a default variant: an empty selection is
/// [`Resolution::NothingRequested`] and an unsatisfiable one is
/// [`Resolution::NoMatch`].
#[must_use]
pub fn resolve_selection<'a>(variants: &'a [Variant], selection: Selection<'_>) -> Resolution<'a> {
    if selection.color.is_none() && selection.size.is_none() {
        return Resolution::NothingRequested;
    }

    let dimension_matches = |variant: &Variant, keys: &[&str], wanted: Option<&str>| {
        wanted.is_none_or(|wanted| option_value(variant, keys) == Some(wanted))
    };

    variants
        .iter()
        .find(|&v| {
            dimension_matches(v, COLOR_KEYS, selection.color)
                && dimension_matches(v, SIZE_KEYS, selection.size)
        })
        .map_or(Resolution::NoMatch, Resolution::Matched)
}

/// A labeled attribute for display, e.g. `Finish: Matte`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabeledAttribute {
    pub label: &'static str,
    pub value: String,
}

/// Up to three options that are not color, size, or beauty attributes,
/// in their original order.
#[must_use]
pub fn extra_attributes(variant: &Variant) -> Vec<LabeledOption<'_>> {
    let reserved: [&[&str]; 5] = [
        COLOR_KEYS,
        SIZE_KEYS,
        FINISH_KEYS,
        COVERAGE_KEYS,
        UNDERTONE_KEYS,
    ];
    variant
        .options
        .iter()
        .filter(|opt| !reserved.iter().any(|keys| name_matches(&opt.name, keys)))
        .take(MAX_DISPLAY_ATTRIBUTES)
        .map(|opt| LabeledOption {
            name: &opt.name,
            value: &opt.value,
        })
        .collect()
}

/// A borrowed free-text option selected for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LabeledOption<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// Finish, Coverage, and Undertone for a variant, each taken from
/// `beauty_meta` when present and otherwise from a matching option.
#[must_use]
pub fn beauty_attributes(variant: &Variant) -> Vec<LabeledAttribute> {
    let meta = variant.beauty_meta.as_ref();
    let slots: [(&'static str, Option<&String>, &[&str]); 3] = [
        ("Finish", meta.and_then(|m| m.finish.as_ref()), FINISH_KEYS),
        (
            "Coverage",
            meta.and_then(|m| m.coverage.as_ref()),
            COVERAGE_KEYS,
        ),
        (
            "Undertone",
            meta.and_then(|m| m.undertone.as_ref()),
            UNDERTONE_KEYS,
        ),
    ];

    slots
        .into_iter()
        .filter_map(|(label, from_meta, keys)| {
            let value = from_meta
                .map(String::as_str)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| option_value(variant, keys))?;
            Some(LabeledAttribute {
                label,
                value: value.to_string(),
            })
        })
        .take(MAX_DISPLAY_ATTRIBUTES)
        .collect()
}

#[cfg(test)]
#[path = "variants_test.rs"]
mod tests;

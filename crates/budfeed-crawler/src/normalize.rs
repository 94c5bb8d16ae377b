//! Pure string normalization for extracted fields.
//!
//! These helpers do no DOM work; [`crate::extract`] feeds them raw element
//! text. Manual string scanning keeps them dependency-light and each rule
//! individually testable.

use crate::adapter::NameRule;

/// Unit marker used by sites that report terpene concentration in
/// milligrams per gram rather than percent.
const MG_PER_G: &str = "mg/g";

/// Normalizes one terpene reading to a percentage string.
///
/// Values ending in `mg/g` convert by dividing the magnitude by 10 and
/// rounding to two decimals (`"12.3mg/g"` → `"1.23%"`). A non-numeric
/// magnitude leaves the raw value untouched. Values without the marker are
/// assumed to already be percentages and pass through unchanged.
#[must_use]
pub fn normalize_terpene_value(raw: &str) -> String {
    let Some(magnitude) = raw.strip_suffix(MG_PER_G) else {
        return raw.to_owned();
    };
    match magnitude.trim().parse::<f64>() {
        Ok(mg) => format!("{:.2}%", mg / 10.0),
        Err(_) => raw.to_owned(),
    }
}

/// Splits a product header into name and optional weight per the site's
/// [`NameRule`].
///
/// Both halves are trimmed. No delimiter in the header means the whole
/// trimmed header is the name and the weight is absent; an empty suffix
/// after the delimiter also yields no weight.
#[must_use]
pub fn split_name_weight(raw: &str, rule: NameRule) -> (String, Option<String>) {
    match rule {
        NameRule::DelimiterWithWeight(delimiter) => match raw.split_once(delimiter) {
            Some((name, weight)) => {
                let weight = weight.trim();
                (
                    name.trim().to_owned(),
                    (!weight.is_empty()).then(|| weight.to_owned()),
                )
            }
            None => (raw.trim().to_owned(), None),
        },
        NameRule::TruncateAt(delimiter) => {
            let name = raw.split(delimiter).next().unwrap_or(raw);
            (name.trim().to_owned(), None)
        }
    }
}

/// Splits a price-tile label into its weight label and `$`-prefixed price.
///
/// Tiles render as `"3.5g$25.00"` (tiered sites) or just `"$25.00"`
/// (single-price sites, empty weight label). Returns `None` when the tile
/// carries no currency symbol at all.
#[must_use]
pub fn split_price_tile(text: &str) -> Option<(String, String)> {
    let (label, price) = text.split_once('$')?;
    Some((label.trim().to_owned(), format!("${}", price.trim())))
}

/// Whether a chip's text is one of the recognized strain classifications.
#[must_use]
pub fn is_strain_label(text: &str) -> bool {
    matches!(
        text.trim().to_lowercase().as_str(),
        "indica" | "sativa" | "hybrid"
    )
}

/// Strips a chip label prefix such as `"THC:"`, returning the trimmed
/// remainder, or `None` when the chip carries a different label.
#[must_use]
pub fn strip_chip_label(text: &str, label: &str) -> Option<String> {
    if text.contains(label) {
        Some(text.replacen(label, "", 1).trim().to_owned())
    } else {
        None
    }
}

//! Canonicalisation of scraped price text.
//!
//! All prices are assumed to be Indian rupees. The output keeps digits,
//! comma separators and the `₹` glyph only, so decimals and currency words
//! are dropped rather than interpreted.

use std::sync::LazyLock;

use pricelens_core::PRICE_UNAVAILABLE;
use regex::Regex;

pub const CURRENCY_GLYPH: char = '₹';

static NON_PRICE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9,₹]").expect("valid price filter regex"));

/// Normalizes raw price text into `₹`-prefixed digits, or `"N/A"` when unset.
///
/// `"₹1,299 incl. tax"` becomes `"₹1,299"` and `"1299"` becomes `"₹1299"`.
/// The `"N/A"` sentinel passes through unchanged, so applying the function
/// to its own output returns the same string.
#[must_use]
pub fn normalize_price(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|s| !s.is_empty() && *s != PRICE_UNAVAILABLE) else {
        return PRICE_UNAVAILABLE.to_string();
    };

    let price = NON_PRICE_CHARS.replace_all(raw, "").into_owned();

    if price.starts_with(CURRENCY_GLYPH) {
        price
    } else {
        format!("{CURRENCY_GLYPH}{price}")
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;

//! Price extraction from retailer product-page markup.
//!
//! Retailer templates drift, so instead of one exact selector per domain the
//! extractor walks a redundant, ordered list of class identifiers and takes
//! the first one that matches anything on the page.

use std::sync::LazyLock;

use pricelens_core::{RetailerCatalog, PRICE_ERROR_PREFIX};
use scraper::{ElementRef, Html, Selector};

use crate::fetch::PageFetcher;
use crate::normalize::normalize_price;

static CLASSED_ELEMENTS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[class]").expect("valid class selector"));

/// One class identifier such as `"a-price-whole"` or `"_30jeq3 _16Jk6d"`.
///
/// An element matches when its `class` attribute carries every token of the
/// identifier, in any order and alongside any other classes. Templates that
/// reorder or add utility classes still match.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ClassPattern {
    tokens: Vec<String>,
}

impl ClassPattern {
    fn parse(identifier: &str) -> Option<Self> {
        let tokens: Vec<String> = identifier
            .split_ascii_whitespace()
            .map(str::to_owned)
            .collect();
        (!tokens.is_empty()).then_some(Self { tokens })
    }

    fn matches(&self, element: &ElementRef<'_>) -> bool {
        let value = element.value();
        self.tokens
            .iter()
            .all(|token| value.classes().any(|class| class == token))
    }
}

/// Finds the first price-bearing element in a page, in pattern priority order.
#[derive(Debug, Clone)]
pub struct MarkupPriceExtractor {
    patterns: Vec<ClassPattern>,
}

impl MarkupPriceExtractor {
    /// Builds an extractor from identifiers listed highest priority first.
    /// Blank identifiers are ignored.
    pub fn new<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = identifiers
            .into_iter()
            .filter_map(|id| ClassPattern::parse(id.as_ref()))
            .collect();
        Self { patterns }
    }

    #[must_use]
    pub fn from_catalog(catalog: &RetailerCatalog) -> Self {
        Self::new(catalog.markup_patterns())
    }

    /// Returns the trimmed text of the first element matching the
    /// highest-priority pattern that matches anything, or `None`.
    ///
    /// Pattern order wins over document order: a later element matching the
    /// first pattern beats an earlier element matching the second. The first
    /// match is final even when its text is empty, which normalizes to `"N/A"`.
    #[must_use]
    pub fn extract(&self, html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let classed: Vec<ElementRef<'_>> = document.select(&CLASSED_ELEMENTS).collect();

        self.patterns.iter().find_map(|pattern| {
            classed
                .iter()
                .find(|el| pattern.matches(el))
                .map(|el| el.text().collect::<String>().trim().to_owned())
        })
    }
}

/// Fetches `url` and resolves it to a display price.
///
/// Never fails: a fetch error becomes `"Error: <message>"` and a page with no
/// recognizable markup becomes `"N/A"`.
pub async fn scrape_price<F: PageFetcher>(
    fetcher: &F,
    extractor: &MarkupPriceExtractor,
    url: &str,
) -> String {
    match fetcher.fetch(url).await {
        Ok(html) => {
            let raw = extractor.extract(&html);
            tracing::debug!(url, raw = raw.as_deref(), "extracted price text");
            normalize_price(raw.as_deref())
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "page fetch failed");
            format!("{PRICE_ERROR_PREFIX}{e}")
        }
    }
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;

//! Value types exchanged between the recognition collaborator, the
//! price-resolution pipeline and the front-ends.

use serde::{Deserialize, Serialize};

/// Sentinel price for a supported page where no price markup was found.
pub const PRICE_UNAVAILABLE: &str = "N/A";

/// Prefix of the price field when the page could not be fetched.
pub const PRICE_ERROR_PREFIX: &str = "Error: ";

/// A candidate web page returned by the recognition service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    pub url: String,
}

impl PageRef {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// Output of one image-recognition call.
///
/// `matching_pages` keeps the service's relevance ranking. A non-empty
/// `service_error` means the service itself reported a failure for the image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionResult {
    #[serde(default)]
    pub best_guess_labels: Vec<String>,
    #[serde(default)]
    pub matching_pages: Vec<PageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_error: Option<String>,
}

impl RecognitionResult {
    /// The label used to drive fallback searches: the first best guess.
    #[must_use]
    pub fn product_label(&self) -> Option<&str> {
        self.best_guess_labels
            .first()
            .map(String::as_str)
            .filter(|label| !label.trim().is_empty())
    }

    /// Returns the service error message, treating an empty message as no error.
    #[must_use]
    pub fn service_error(&self) -> Option<&str> {
        self.service_error.as_deref().filter(|m| !m.is_empty())
    }
}

/// A resolved price for one URL.
///
/// `price` is a canonical `₹`-prefixed string, [`PRICE_UNAVAILABLE`], or an
/// `"Error: "`-prefixed message when the page could not be scraped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub url: String,
    pub price: String,
}

impl PriceQuote {
    pub fn new(url: impl Into<String>, price: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            price: price.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.price.starts_with(PRICE_ERROR_PREFIX)
    }
}

/// The result of one pipeline run, handed back to the front-end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionOutcome {
    pub urls_with_prices: Vec<PriceQuote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_guess_labels: Option<Vec<String>>,
}

impl ResolutionOutcome {
    /// Splits the quotes into parallel url / price columns for tabular display.
    #[must_use]
    pub fn columns(&self) -> (Vec<&str>, Vec<&str>) {
        self.urls_with_prices
            .iter()
            .map(|q| (q.url.as_str(), q.price.as_str()))
            .unzip()
    }
}

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Retailers the price pipeline knows how to classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Retailer {
    Amazon,
    Myntra,
    Flipkart,
    Croma,
    TataCliq,
    Ajio,
}

/// Retailers that always get a resolution attempt, in fallback order.
pub const MUST_HAVE_RETAILERS: [Retailer; 2] = [Retailer::Flipkart, Retailer::Myntra];

/// Class identifiers tried by the markup extractor, highest priority first.
///
/// Broader than the retailer table: the trailing entries cover older and
/// alternate Flipkart and Myntra templates.
pub const DEFAULT_MARKUP_PATTERNS: [&str; 11] = [
    "a-price-whole",
    "pdp-product-price",
    "_30jeq3 _16Jk6d",
    "amount",
    "salePrice",
    "prod-sp",
    "_1vC4OE _3qQ9m1",
    "Nx9bqj CxhGGd",
    "yRaY8j A6+E6v",
    "_25b18c",
    "_2p6lqe",
];

impl Retailer {
    /// Registrable domain used for `site:` searches and must-have detection.
    #[must_use]
    pub fn domain_fragment(self) -> &'static str {
        match self {
            Retailer::Amazon => "amazon.in",
            Retailer::Myntra => "myntra.com",
            Retailer::Flipkart => "flipkart.com",
            Retailer::Croma => "croma.com",
            Retailer::TataCliq => "tatacliq.com",
            Retailer::Ajio => "ajio.com",
        }
    }
}

impl std::fmt::Display for Retailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Retailer::Amazon => write!(f, "amazon"),
            Retailer::Myntra => write!(f, "myntra"),
            Retailer::Flipkart => write!(f, "flipkart"),
            Retailer::Croma => write!(f, "croma"),
            Retailer::TataCliq => write!(f, "tatacliq"),
            Retailer::Ajio => write!(f, "ajio"),
        }
    }
}

/// Static descriptor of one supported storefront.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailerProfile {
    pub retailer: Retailer,
    /// Exact network location matched by the classifier, e.g. `www.amazon.in`.
    pub host: String,
    /// Class identifier of the price element on this retailer's product pages.
    pub price_class: String,
}

/// Immutable retailer table plus the extractor's markup pattern list.
///
/// Built once at start-up and shared behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetailerCatalog {
    pub retailers: Vec<RetailerProfile>,
    pub markup_patterns: Vec<String>,
}

impl RetailerCatalog {
    /// The built-in table of six Indian storefronts.
    #[must_use]
    pub fn builtin() -> Self {
        let profile = |retailer, host: &str, price_class: &str| RetailerProfile {
            retailer,
            host: host.to_string(),
            price_class: price_class.to_string(),
        };

        Self {
            retailers: vec![
                profile(Retailer::Amazon, "www.amazon.in", "a-price-whole"),
                profile(Retailer::Myntra, "www.myntra.com", "pdp-product-price"),
                profile(Retailer::Flipkart, "www.flipkart.com", "_30jeq3 _16Jk6d"),
                profile(Retailer::Croma, "www.croma.com", "amount"),
                profile(Retailer::TataCliq, "www.tatacliq.com", "salePrice"),
                profile(Retailer::Ajio, "www.ajio.com", "prod-sp"),
            ],
            markup_patterns: DEFAULT_MARKUP_PATTERNS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
        }
    }

    /// Exact, case-sensitive host lookup. No `www.` or subdomain folding.
    #[must_use]
    pub fn profile_for_host(&self, host: &str) -> Option<&RetailerProfile> {
        self.retailers.iter().find(|p| p.host == host)
    }

    #[must_use]
    pub fn markup_patterns(&self) -> &[String] {
        &self.markup_patterns
    }
}

impl Default for RetailerCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Load and validate a retailer catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<RetailerCatalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_catalog(&content)
}

/// Parse and validate a retailer catalog from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_catalog(content: &str) -> Result<RetailerCatalog, ConfigError> {
    let catalog: RetailerCatalog = serde_yaml::from_str(content)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn validate_catalog(catalog: &RetailerCatalog) -> Result<(), ConfigError> {
    if catalog.markup_patterns.is_empty() {
        return Err(ConfigError::Validation(
            "markup_patterns must contain at least one class identifier".to_string(),
        ));
    }

    if let Some(blank) = catalog
        .markup_patterns
        .iter()
        .position(|p| p.trim().is_empty())
    {
        return Err(ConfigError::Validation(format!(
            "markup pattern #{} is empty",
            blank + 1
        )));
    }

    let mut seen_hosts = HashSet::new();
    let mut seen_retailers = HashSet::new();

    for profile in &catalog.retailers {
        if profile.host.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "retailer '{}' has an empty host",
                profile.retailer
            )));
        }

        if !seen_hosts.insert(profile.host.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate retailer host: '{}'",
                profile.host
            )));
        }

        if !seen_retailers.insert(profile.retailer) {
            return Err(ConfigError::Validation(format!(
                "duplicate retailer: '{}'",
                profile.retailer
            )));
        }

        if !catalog.markup_patterns.contains(&profile.price_class) {
            return Err(ConfigError::Validation(format!(
                "retailer '{}' price_class '{}' is not listed in markup_patterns",
                profile.retailer, profile.price_class
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "retailers_test.rs"]
mod tests;

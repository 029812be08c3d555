//! URL → retailer classification against the shared retailer catalog.

use std::sync::Arc;

use pricelens_core::{Retailer, RetailerCatalog};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Supported(Retailer),
    Unsupported,
}

impl Classification {
    #[must_use]
    pub fn retailer(self) -> Option<Retailer> {
        match self {
            Classification::Supported(retailer) => Some(retailer),
            Classification::Unsupported => None,
        }
    }
}

/// Maps URLs to retailers by exact network-location match.
///
/// The comparison is case-sensitive and does no `www.` or subdomain folding:
/// `https://flipkart.com/...` and `https://dl.flipkart.com/...` are both
/// unsupported when the catalog lists `www.flipkart.com`.
#[derive(Debug, Clone)]
pub struct DomainClassifier {
    catalog: Arc<RetailerCatalog>,
}

impl DomainClassifier {
    #[must_use]
    pub fn new(catalog: Arc<RetailerCatalog>) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn classify(&self, url: &str) -> Classification {
        network_location(url)
            .and_then(|netloc| self.catalog.profile_for_host(netloc))
            .map_or(Classification::Unsupported, |profile| {
                Classification::Supported(profile.retailer)
            })
    }
}

/// Returns the raw network-location component of `url`, without any case or
/// percent normalization.
///
/// Accepts `scheme://netloc/...` and scheme-relative `//netloc/...` forms.
/// Returns `None` when the URL has no authority component.
#[must_use]
pub fn network_location(url: &str) -> Option<&str> {
    let after_scheme = match url.find("://") {
        Some(idx) if is_scheme(&url[..idx]) => &url[idx + 3..],
        _ => url.strip_prefix("//")?,
    };

    let end = after_scheme
        .find(['/', '?', '#'])
        .unwrap_or(after_scheme.len());
    let netloc = &after_scheme[..end];
    (!netloc.is_empty()).then_some(netloc)
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> DomainClassifier {
        DomainClassifier::new(Arc::new(RetailerCatalog::builtin()))
    }

    #[test]
    fn classifies_every_builtin_retailer() {
        let cases = [
            ("https://www.amazon.in/dp/B0C1", Retailer::Amazon),
            ("https://www.myntra.com/shoes/nike/123/buy", Retailer::Myntra),
            ("https://www.flipkart.com/p/itm123?pid=X", Retailer::Flipkart),
            ("https://www.croma.com/p/256", Retailer::Croma),
            ("https://www.tatacliq.com/p-mp0001", Retailer::TataCliq),
            ("https://www.ajio.com/p/4600", Retailer::Ajio),
        ];
        let classifier = classifier();
        for (url, expected) in cases {
            assert_eq!(
                classifier.classify(url),
                Classification::Supported(expected),
                "{url}"
            );
        }
    }

    #[test]
    fn bare_domain_is_unsupported() {
        assert_eq!(
            classifier().classify("https://flipkart.com/p/itm123"),
            Classification::Unsupported
        );
    }

    #[test]
    fn other_subdomain_is_unsupported() {
        assert_eq!(
            classifier().classify("https://dl.flipkart.com/dl/p/itm123"),
            Classification::Unsupported
        );
        assert_eq!(
            classifier().classify("https://m.myntra.com/123"),
            Classification::Unsupported
        );
    }

    #[test]
    fn uppercase_host_is_unsupported() {
        assert_eq!(
            classifier().classify("https://WWW.AMAZON.IN/dp/B0C1"),
            Classification::Unsupported
        );
    }

    #[test]
    fn explicit_port_is_unsupported() {
        assert_eq!(
            classifier().classify("https://www.amazon.in:443/dp/B0C1"),
            Classification::Unsupported
        );
    }

    #[test]
    fn unknown_site_is_unsupported() {
        assert_eq!(
            classifier().classify("https://www.pinterest.com/pin/1"),
            Classification::Unsupported
        );
    }

    #[test]
    fn garbage_is_unsupported() {
        assert_eq!(classifier().classify("not a url"), Classification::Unsupported);
        assert_eq!(classifier().classify(""), Classification::Unsupported);
    }

    #[test]
    fn scheme_relative_url_is_classified() {
        assert_eq!(
            classifier().classify("//www.ajio.com/p/4600").retailer(),
            Some(Retailer::Ajio)
        );
    }

    #[test]
    fn network_location_stops_at_query_and_fragment() {
        assert_eq!(
            network_location("https://www.croma.com?x=1"),
            Some("www.croma.com")
        );
        assert_eq!(
            network_location("https://www.croma.com#top"),
            Some("www.croma.com")
        );
    }

    #[test]
    fn network_location_requires_authority() {
        assert_eq!(network_location("/url?q=https://x"), None);
        assert_eq!(network_location("mailto:someone@example.com"), None);
        assert_eq!(network_location("https:///path"), None);
    }
}

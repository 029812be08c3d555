//! Site-restricted web search used to backfill must-have retailers.
//!
//! Best-effort by contract: every failure collapses to `None` so a miss here
//! can never abort a resolution run.

use std::sync::LazyLock;

use reqwest::Url;
use scraper::{Html, Selector};

use crate::error::FetchError;
use crate::fetch::PageFetcher;

static LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid link selector"));

/// Path of the search engine's click-through redirect wrapper.
const REDIRECT_PATH: &str = "/url";

#[derive(Debug, Clone)]
pub struct RetailerSearch {
    search_url: Url,
}

impl RetailerSearch {
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if `search_url` is not an absolute URL.
    pub fn new(search_url: &str) -> Result<Self, FetchError> {
        let parsed = Url::parse(search_url).map_err(|e| FetchError::InvalidUrl {
            url: search_url.to_owned(),
            reason: e.to_string(),
        })?;
        Ok(Self { search_url: parsed })
    }

    /// Builds `<search_url>?q=<label> site:<domain_fragment>`.
    #[must_use]
    pub fn query_url(&self, label: &str, domain_fragment: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", &format!("{label} site:{domain_fragment}"));
        url
    }

    /// Searches for `label` on `domain_fragment` and returns the first result
    /// link if it points at that domain.
    pub async fn find_url<F: PageFetcher>(
        &self,
        fetcher: &F,
        label: &str,
        domain_fragment: &str,
    ) -> Option<String> {
        let query_url = self.query_url(label, domain_fragment);
        let html = match fetcher.fetch(query_url.as_str()).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(domain_fragment, error = %e, "fallback search fetch failed");
                return None;
            }
        };

        let Some(href) = first_link(&html) else {
            tracing::debug!(domain_fragment, "fallback search returned no links");
            return None;
        };

        let candidate = self.unwrap_redirect(&href)?;
        if points_at(&candidate, domain_fragment) {
            Some(candidate.to_string())
        } else {
            tracing::debug!(
                domain_fragment,
                candidate = %candidate,
                "first fallback search link is off-domain"
            );
            None
        }
    }

    /// Resolves `href` against the search page and peels one `/url?q=` layer.
    ///
    /// Only the search engine's own wrapper is peeled; a `/url` path on any
    /// other origin is returned as-is.
    fn unwrap_redirect(&self, href: &str) -> Option<Url> {
        let resolved = self.search_url.join(href).ok()?;
        if resolved.origin() != self.search_url.origin() || resolved.path() != REDIRECT_PATH {
            return Some(resolved);
        }

        let target = resolved
            .query_pairs()
            .find(|(key, _)| key == "q")
            .map(|(_, value)| value.into_owned())?;
        Url::parse(&target).ok()
    }
}

/// Returns the `href` of the first anchor in the document.
fn first_link(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&LINKS)
        .find_map(|a| a.value().attr("href"))
        .map(|href| href.trim().to_owned())
}

fn points_at(url: &Url, domain_fragment: &str) -> bool {
    matches!(url.scheme(), "http" | "https")
        && url.host_str().is_some_and(|host| host.contains(domain_fragment))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search() -> RetailerSearch {
        RetailerSearch::new("https://www.google.com/search").unwrap()
    }

    #[test]
    fn query_url_adds_site_restriction() {
        let url = search().query_url("Nike Air Zoom", "flipkart.com");
        assert_eq!(
            url.as_str(),
            "https://www.google.com/search?q=Nike+Air+Zoom+site%3Aflipkart.com"
        );
    }

    #[test]
    fn first_link_takes_first_anchor_with_href() {
        let html = r#"<a name="top">x</a><a href="/url?q=https://a">a</a><a href="https://b">b</a>"#;
        assert_eq!(first_link(html).as_deref(), Some("/url?q=https://a"));
    }

    #[test]
    fn first_link_none_without_anchors() {
        assert_eq!(first_link("<p>no results</p>"), None);
    }

    #[test]
    fn unwraps_redirect_wrapper() {
        let url = search()
            .unwrap_redirect("/url?q=https://www.flipkart.com/p/itm1%3Fpid%3DX&sa=U&ved=abc")
            .unwrap();
        assert_eq!(url.as_str(), "https://www.flipkart.com/p/itm1?pid=X");
    }

    #[test]
    fn keeps_direct_links() {
        let url = search()
            .unwrap_redirect("https://www.myntra.com/shoes/123")
            .unwrap();
        assert_eq!(url.as_str(), "https://www.myntra.com/shoes/123");
    }

    #[test]
    fn redirect_path_on_other_origin_is_not_peeled() {
        let url = search()
            .unwrap_redirect("https://www.flipkart.com/url?q=https://other.example/p/1")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.flipkart.com/url?q=https://other.example/p/1"
        );
        assert!(points_at(&url, "flipkart.com"));
    }

    #[test]
    fn redirect_without_target_is_none() {
        assert!(search().unwrap_redirect("/url?sa=U").is_none());
    }

    #[test]
    fn points_at_checks_host_not_query() {
        let on_site = Url::parse("https://dl.flipkart.com/p/1").unwrap();
        let off_site =
            Url::parse("https://www.google.com/search?q=shoe+site:flipkart.com").unwrap();
        assert!(points_at(&on_site, "flipkart.com"));
        assert!(!points_at(&off_site, "flipkart.com"));
    }
}

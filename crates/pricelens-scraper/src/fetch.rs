//! Page-fetch transport.
//!
//! [`PageFetcher`] is the seam the pipeline depends on; [`HttpFetcher`] is the
//! production implementation. When a scraping-proxy key is configured every
//! request is routed through `<proxy>?api_key=<key>&url=<target>`, otherwise
//! pages are fetched directly.

use std::future::Future;
use std::time::Duration;

use pricelens_core::AppConfig;
use reqwest::{Client, Url};

use crate::error::FetchError;
use crate::retry::retry_with_backoff;

/// Returns the raw HTML body of a page.
///
/// Implementations must fail with a [`FetchError`] on non-2xx status and on
/// timeout instead of returning an error page body.
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Proxy endpoint and key for routed fetches.
#[derive(Clone)]
struct ScrapingProxy {
    endpoint: Url,
    api_key: String,
}

impl std::fmt::Debug for ScrapingProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrapingProxy")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[redacted]")
            .finish()
    }
}

/// reqwest-backed [`PageFetcher`] with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    proxy: Option<ScrapingProxy>,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl HttpFetcher {
    /// Creates a direct (unproxied) fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            proxy: None,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Builds the fetcher described by the application config.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the client cannot be built, or
    /// [`FetchError::InvalidUrl`] if the proxy endpoint is malformed.
    pub fn from_config(config: &AppConfig) -> Result<Self, FetchError> {
        let fetcher = Self::new(config.fetch_timeout_secs, &config.user_agent)?
            .with_retries(config.fetch_max_retries, config.fetch_backoff_base_ms);

        match &config.scraper_api_key {
            Some(key) => fetcher.with_proxy(&config.scraper_api_url, key),
            None => {
                tracing::info!("SCRAPER_API_KEY not set; fetching retailer pages directly");
                Ok(fetcher)
            }
        }
    }

    /// Routes every request through a scraping proxy.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] if `endpoint` is not a valid URL.
    pub fn with_proxy(mut self, endpoint: &str, api_key: &str) -> Result<Self, FetchError> {
        let endpoint = Url::parse(endpoint).map_err(|e| FetchError::InvalidUrl {
            url: endpoint.to_owned(),
            reason: e.to_string(),
        })?;
        self.proxy = Some(ScrapingProxy {
            endpoint,
            api_key: api_key.to_owned(),
        });
        Ok(self)
    }

    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Resolves the URL actually requested for `target`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] when fetching directly and `target`
    /// does not parse.
    fn request_url(&self, target: &str) -> Result<Url, FetchError> {
        match &self.proxy {
            Some(proxy) => {
                let mut url = proxy.endpoint.clone();
                url.query_pairs_mut()
                    .append_pair("api_key", &proxy.api_key)
                    .append_pair("url", target);
                Ok(url)
            }
            None => Url::parse(target).map_err(|e| FetchError::InvalidUrl {
                url: target.to_owned(),
                reason: e.to_string(),
            }),
        }
    }

    async fn fetch_once(&self, request_url: Url, target: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(request_url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-IN,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: target.to_owned(),
            });
        }

        Ok(response.text().await?)
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let request_url = self.request_url(url)?;
        tracing::debug!(url, proxied = self.proxy.is_some(), "fetching page");

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.fetch_once(request_url.clone(), url)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn direct() -> HttpFetcher {
        HttpFetcher::new(5, "pricelens-test/0.1").expect("client")
    }

    #[test]
    fn direct_request_url_is_target() {
        let url = direct()
            .request_url("https://www.ajio.com/p/4600?size=M")
            .unwrap();
        assert_eq!(url.as_str(), "https://www.ajio.com/p/4600?size=M");
    }

    #[test]
    fn direct_request_url_rejects_relative_target() {
        let err = direct().request_url("/p/4600").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[test]
    fn proxied_request_url_encodes_target() {
        let fetcher = direct()
            .with_proxy("http://api.scraperapi.com", "k3y")
            .unwrap();
        let url = fetcher
            .request_url("https://www.ajio.com/p/4600?size=M&c=1")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://api.scraperapi.com/?api_key=k3y&url=https%3A%2F%2Fwww.ajio.com%2Fp%2F4600%3Fsize%3DM%26c%3D1"
        );
    }

    #[test]
    fn with_proxy_rejects_invalid_endpoint() {
        let err = direct().with_proxy("not a url", "k").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }

    #[test]
    fn debug_redacts_proxy_key() {
        let fetcher = direct()
            .with_proxy("http://api.scraperapi.com", "super-secret")
            .unwrap();
        let debug = format!("{fetcher:?}");
        assert!(!debug.contains("super-secret"));
    }
}

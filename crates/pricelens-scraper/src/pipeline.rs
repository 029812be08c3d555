//! Price resolution for one recognition result.
//!
//! Runs strictly in sequence: every page fetch and fallback search is awaited
//! before the next starts, in recognition-ranking order.

use std::collections::HashSet;
use std::sync::Arc;

use pricelens_core::{
    AppConfig, PriceQuote, RecognitionResult, ResolutionOutcome, Retailer, RetailerCatalog,
    MUST_HAVE_RETAILERS,
};

use crate::classify::{network_location, Classification, DomainClassifier};
use crate::error::{FetchError, PipelineError};
use crate::extract::{scrape_price, MarkupPriceExtractor};
use crate::fetch::{HttpFetcher, PageFetcher};
use crate::search::RetailerSearch;

/// Classifies candidate pages, scrapes prices, and backfills must-have
/// retailers through a site-restricted search.
#[derive(Debug)]
pub struct PricePipeline<F> {
    fetcher: F,
    classifier: DomainClassifier,
    extractor: MarkupPriceExtractor,
    search: RetailerSearch,
}

impl PricePipeline<HttpFetcher> {
    /// Builds the production pipeline from config and a shared catalog.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the HTTP client or the configured URLs are invalid.
    pub fn from_config(
        config: &AppConfig,
        catalog: Arc<RetailerCatalog>,
    ) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::from_config(config)?;
        let search = RetailerSearch::new(&config.search_url)?;
        Ok(Self::new(fetcher, catalog, search))
    }
}

impl<F: PageFetcher> PricePipeline<F> {
    pub fn new(fetcher: F, catalog: Arc<RetailerCatalog>, search: RetailerSearch) -> Self {
        let extractor = MarkupPriceExtractor::from_catalog(&catalog);
        Self {
            fetcher,
            classifier: DomainClassifier::new(catalog),
            extractor,
            search,
        }
    }

    /// Scrapes a single URL into a quote without classification.
    pub async fn quote(&self, url: &str) -> PriceQuote {
        let price = scrape_price(&self.fetcher, &self.extractor, url).await;
        PriceQuote::new(url, price)
    }

    /// Resolves prices for every supported page in `recognition`, then
    /// backfills Flipkart and Myntra when the recognition pass missed them.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Recognition`] when the recognition service
    /// reported an error for the image. No pages are fetched in that case.
    pub async fn resolve(
        &self,
        recognition: &RecognitionResult,
    ) -> Result<ResolutionOutcome, PipelineError> {
        if let Some(message) = recognition.service_error() {
            tracing::warn!(error = message, "recognition service reported an error");
            return Err(PipelineError::Recognition(message.to_owned()));
        }

        let mut quotes = Vec::new();
        let mut seen_urls = HashSet::new();
        let mut found = HashSet::new();

        for page in &recognition.matching_pages {
            let netloc = network_location(&page.url).unwrap_or_default();
            for retailer in MUST_HAVE_RETAILERS {
                if netloc.contains(retailer.domain_fragment()) {
                    found.insert(retailer);
                }
            }

            let Classification::Supported(retailer) = self.classifier.classify(&page.url) else {
                tracing::debug!(url = %page.url, "skipping unsupported page");
                continue;
            };

            if !seen_urls.insert(page.url.as_str()) {
                tracing::debug!(url = %page.url, "skipping duplicate page");
                continue;
            }

            let quote = self.quote(&page.url).await;
            tracing::debug!(%retailer, url = %quote.url, price = %quote.price, "primary quote");
            quotes.push(quote);
        }

        let primary_count = quotes.len();

        if let Some(label) = recognition.product_label() {
            for retailer in MUST_HAVE_RETAILERS {
                if found.contains(&retailer) {
                    continue;
                }
                if let Some(quote) = self.backfill(label, retailer).await {
                    quotes.push(quote);
                }
            }
        }

        tracing::info!(
            pages = recognition.matching_pages.len(),
            primary = primary_count,
            fallback = quotes.len() - primary_count,
            failed = quotes.iter().filter(|q| q.is_error()).count(),
            "price resolution complete"
        );

        let best_guess_labels = (!recognition.best_guess_labels.is_empty())
            .then(|| recognition.best_guess_labels.clone());

        Ok(ResolutionOutcome {
            urls_with_prices: quotes,
            best_guess_labels,
        })
    }

    async fn backfill(&self, label: &str, retailer: Retailer) -> Option<PriceQuote> {
        let url = self
            .search
            .find_url(&self.fetcher, label, retailer.domain_fragment())
            .await?;
        tracing::debug!(%retailer, url = %url, "fallback search found a candidate");
        Some(self.quote(&url).await)
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;

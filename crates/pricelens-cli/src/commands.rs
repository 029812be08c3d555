//! Command handlers for the CLI.
//!
//! Each handler builds what it needs from [`AppConfig`], runs one operation
//! and prints the result to stdout. Logs go to stderr so JSON output can be
//! piped.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use pricelens_core::{AppConfig, PageRef, RecognitionResult, ResolutionOutcome};
use pricelens_scraper::{Classification, PricePipeline};
use pricelens_vision::VisionClient;

fn build_pipeline(
    config: &AppConfig,
) -> anyhow::Result<PricePipeline<pricelens_scraper::HttpFetcher>> {
    let catalog = Arc::new(config.retailer_catalog()?);
    PricePipeline::from_config(config, catalog).context("failed to build price pipeline")
}

/// Recognize `image` and resolve prices for it.
///
/// # Errors
///
/// Returns an error if the Vision key is missing, the image cannot be read,
/// recognition fails, or the recognition service reports an error.
pub(crate) async fn run_lookup(config: &AppConfig, image: &Path, table: bool) -> anyhow::Result<()> {
    let api_key = config.require_vision_api_key()?;
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("failed to read image {}", image.display()))?;

    let vision = VisionClient::with_endpoint(api_key, config.vision_timeout_secs, &config.vision_url)?;
    let recognition = vision.detect(&bytes).await?;
    tracing::info!(
        labels = recognition.best_guess_labels.len(),
        pages = recognition.matching_pages.len(),
        "image recognized"
    );

    let outcome = build_pipeline(config)?.resolve(&recognition).await?;
    println!("{}", render_outcome(&outcome, table)?);
    Ok(())
}

/// Resolve prices for a recognition result assembled from CLI arguments.
///
/// # Errors
///
/// Returns an error if the pipeline cannot be built.
pub(crate) async fn run_resolve(
    config: &AppConfig,
    label: Option<String>,
    urls: Vec<String>,
    table: bool,
) -> anyhow::Result<()> {
    let recognition = recognition_from_args(label, urls);
    let outcome = build_pipeline(config)?.resolve(&recognition).await?;
    println!("{}", render_outcome(&outcome, table)?);
    Ok(())
}

/// Scrape one page without classification and print the quote as JSON.
///
/// # Errors
///
/// Returns an error if the pipeline cannot be built. Fetch failures are
/// reported inside the quote.
pub(crate) async fn run_price(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let quote = build_pipeline(config)?.quote(url).await;
    println!("{}", serde_json::to_string_pretty(&quote)?);
    Ok(())
}

/// Print the retailer `url` belongs to, or `unsupported`.
///
/// # Errors
///
/// Returns an error if the configured retailer catalog cannot be loaded.
pub(crate) fn run_classify(config: &AppConfig, url: &str) -> anyhow::Result<()> {
    let catalog = Arc::new(config.retailer_catalog()?);
    let classifier = pricelens_scraper::DomainClassifier::new(catalog);
    match classifier.classify(url) {
        Classification::Supported(retailer) => println!("{retailer}"),
        Classification::Unsupported => println!("unsupported"),
    }
    Ok(())
}

fn recognition_from_args(label: Option<String>, urls: Vec<String>) -> RecognitionResult {
    RecognitionResult {
        best_guess_labels: label.into_iter().collect(),
        matching_pages: urls.into_iter().map(PageRef::new).collect(),
        service_error: None,
    }
}

fn render_outcome(outcome: &ResolutionOutcome, table: bool) -> anyhow::Result<String> {
    if !table {
        return Ok(serde_json::to_string_pretty(outcome)?);
    }

    let (urls, prices) = outcome.columns();
    let width = urls.iter().map(|u| u.chars().count()).max().unwrap_or(0).max(3);
    let mut out = String::new();
    writeln!(out, "{:<width$}  PRICE", "URL")?;
    for (url, price) in urls.iter().zip(prices) {
        writeln!(out, "{url:<width$}  {price}")?;
    }
    if let Some(labels) = &outcome.best_guess_labels {
        write!(out, "\nbest guess: {}", labels.join(", "))?;
    }
    Ok(out.trim_end().to_owned())
}

#[cfg(test)]
#[path = "commands_test.rs"]
mod tests;

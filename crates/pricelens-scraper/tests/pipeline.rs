//! End-to-end tests for `PricePipeline` over real HTTP.
//!
//! Every fetch is routed through a wiremock "scraping proxy", so retailer and
//! search URLs keep their real hosts and are matched on the `url` query param.

use std::sync::Arc;

use pricelens_core::{PageRef, PriceQuote, RecognitionResult, RetailerCatalog};
use pricelens_scraper::{HttpFetcher, PipelineError, PricePipeline, RetailerSearch};
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_BASE: &str = "https://www.google.com/search";

fn proxied_pipeline(server: &MockServer) -> PricePipeline<HttpFetcher> {
    let fetcher = HttpFetcher::new(5, "pricelens-test/0.1")
        .expect("client")
        .with_proxy(&server.uri(), "test-key")
        .expect("proxy");
    PricePipeline::new(
        fetcher,
        Arc::new(RetailerCatalog::builtin()),
        RetailerSearch::new(SEARCH_BASE).expect("search url"),
    )
}

async fn mount_page(server: &MockServer, target: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(query_param("url", target))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn resolves_primary_pages_and_backfills_myntra() {
    let server = MockServer::start().await;
    let flipkart = "https://www.flipkart.com/speaker/p/itm7";
    let myntra = "https://www.myntra.com/speaker/7/buy";

    mount_page(
        &server,
        flipkart,
        200,
        r#"<div class="Nx9bqj CxhGGd">₹4,999</div>"#,
    )
    .await;
    mount_page(
        &server,
        "https://www.google.com/search?q=jbl+speaker+site%3Amyntra.com",
        200,
        &format!(r#"<a href="/url?q={myntra}&amp;sa=U">Myntra</a>"#),
    )
    .await;
    mount_page(
        &server,
        myntra,
        200,
        r#"<span class="pdp-product-price">Rs. 5,299</span>"#,
    )
    .await;

    let pipeline = proxied_pipeline(&server);
    let recognition = RecognitionResult {
        best_guess_labels: vec!["jbl speaker".to_owned()],
        matching_pages: vec![
            PageRef::new(flipkart),
            PageRef::new("https://www.youtube.com/watch?v=1"),
        ],
        service_error: None,
    };

    let outcome = pipeline.resolve(&recognition).await.expect("resolve");
    assert_eq!(
        outcome.urls_with_prices,
        vec![
            PriceQuote::new(flipkart, "₹4,999"),
            PriceQuote::new(myntra, "₹5,299"),
        ]
    );
}

#[tokio::test]
async fn page_errors_are_reported_inline() {
    let server = MockServer::start().await;
    let croma = "https://www.croma.com/tv/p/1";
    mount_page(&server, croma, 500, "").await;

    let pipeline = proxied_pipeline(&server);
    let recognition = RecognitionResult {
        best_guess_labels: vec![],
        matching_pages: vec![PageRef::new(croma)],
        service_error: None,
    };

    let outcome = pipeline.resolve(&recognition).await.expect("resolve");
    assert_eq!(outcome.urls_with_prices.len(), 1);
    assert_eq!(
        outcome.urls_with_prices[0].price,
        format!("Error: unexpected HTTP status 500 from {croma}")
    );
}

#[tokio::test]
async fn service_error_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let pipeline = proxied_pipeline(&server);
    let recognition = RecognitionResult {
        best_guess_labels: vec!["lamp".to_owned()],
        matching_pages: vec![PageRef::new("https://www.amazon.in/dp/B03")],
        service_error: Some("quota exceeded".to_owned()),
    };

    let err = pipeline.resolve(&recognition).await.unwrap_err();
    assert!(matches!(err, PipelineError::Recognition(ref m) if m == "quota exceeded"));
}

//! HTTP client for the Cloud Vision `images:annotate` endpoint.
//!
//! Sends one image per request with the `WEB_DETECTION` feature and maps the
//! first per-image response onto a [`RecognitionResult`]. Request-level
//! failures surface as [`VisionError`]; a per-image error is carried on the
//! result as `service_error` so the caller decides how to treat it.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use pricelens_core::RecognitionResult;
use reqwest::{Client, Url};

use crate::error::VisionError;
use crate::types::{AnnotateRequest, AnnotateResponse, ErrorEnvelope};

const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Client for Cloud Vision web detection.
///
/// Use [`VisionClient::new`] for production or [`VisionClient::with_endpoint`]
/// to point at a mock server in tests.
pub struct VisionClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl std::fmt::Debug for VisionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl VisionClient {
    /// Creates a client pointed at the production Vision API.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, VisionError> {
        Self::with_endpoint(api_key, timeout_secs, DEFAULT_ENDPOINT)
    }

    /// Creates a client with a custom annotate endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Http`] if the client cannot be constructed, or
    /// [`VisionError::InvalidEndpoint`] if `endpoint` is not a valid URL.
    pub fn with_endpoint(
        api_key: &str,
        timeout_secs: u64,
        endpoint: &str,
    ) -> Result<Self, VisionError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let endpoint = Url::parse(endpoint).map_err(|e| VisionError::InvalidEndpoint {
            url: endpoint.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    /// Runs web detection on raw image bytes.
    ///
    /// # Errors
    ///
    /// - [`VisionError::Api`] if the API rejects the request.
    /// - [`VisionError::Http`] on network failure or timeout.
    /// - [`VisionError::Deserialize`] if the response does not match the
    ///   expected shape.
    /// - [`VisionError::EmptyResponse`] if no per-image response came back.
    pub async fn detect(&self, image: &[u8]) -> Result<RecognitionResult, VisionError> {
        let request = AnnotateRequest::web_detection(STANDARD.encode(image));

        let response = self
            .client
            .post(self.request_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Self::api_error(status.as_u16(), &body));
        }

        let parsed: AnnotateResponse =
            serde_json::from_str(&body).map_err(|e| VisionError::Deserialize {
                context: "images:annotate".to_owned(),
                source: e,
            })?;

        let first = parsed
            .responses
            .into_iter()
            .next()
            .ok_or(VisionError::EmptyResponse)?;
        let result = RecognitionResult::from(first);

        tracing::debug!(
            labels = result.best_guess_labels.len(),
            pages = result.matching_pages.len(),
            service_error = result.service_error.is_some(),
            "web detection complete"
        );

        Ok(result)
    }

    fn request_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("key", &self.api_key);
        url
    }

    fn api_error(status: u16, body: &str) -> VisionError {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("HTTP {status}"));
        VisionError::Api { status, message }
    }
}

//! Wire types for `images:annotate` with the `WEB_DETECTION` feature.
//!
//! Only the fields the price pipeline consumes are modelled; everything else
//! in the response is ignored by serde.

use pricelens_core::{PageRef, RecognitionResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct AnnotateRequest {
    pub requests: Vec<AnnotateImageRequest>,
}

#[derive(Debug, Serialize)]
pub struct AnnotateImageRequest {
    pub image: ImageContent,
    pub features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
pub struct ImageContent {
    /// Base64-encoded image bytes.
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl AnnotateRequest {
    #[must_use]
    pub fn web_detection(content: String) -> Self {
        Self {
            requests: vec![AnnotateImageRequest {
                image: ImageContent { content },
                features: vec![Feature {
                    kind: "WEB_DETECTION",
                }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AnnotateResponse {
    #[serde(default)]
    pub responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotateImageResponse {
    #[serde(default)]
    pub web_detection: Option<WebDetection>,
    #[serde(default)]
    pub error: Option<Status>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebDetection {
    #[serde(default)]
    pub pages_with_matching_images: Vec<WebPage>,
    #[serde(default)]
    pub best_guess_labels: Vec<BestGuessLabel>,
}

#[derive(Debug, Deserialize)]
pub struct WebPage {
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct BestGuessLabel {
    pub label: String,
}

/// `google.rpc.Status` as embedded in Vision responses.
#[derive(Debug, Default, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub message: String,
}

/// Top-level error envelope returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: Status,
}

impl From<AnnotateImageResponse> for RecognitionResult {
    fn from(response: AnnotateImageResponse) -> Self {
        let detection = response.web_detection.unwrap_or_default();
        RecognitionResult {
            best_guess_labels: detection
                .best_guess_labels
                .into_iter()
                .map(|l| l.label)
                .collect(),
            matching_pages: detection
                .pages_with_matching_images
                .into_iter()
                .map(|p| PageRef::new(p.url))
                .collect(),
            service_error: response
                .error
                .map(|status| status.message)
                .filter(|message| !message.is_empty()),
        }
    }
}

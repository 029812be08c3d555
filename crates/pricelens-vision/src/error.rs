use thiserror::Error;

/// Errors returned by the Cloud Vision client.
///
/// A per-image error reported inside a successful response is not a
/// `VisionError`; it is carried on the `RecognitionResult` instead.
#[derive(Debug, Error)]
pub enum VisionError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API rejected the request as a whole (bad key, quota, malformed body).
    #[error("Vision API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The API answered 200 but returned no per-image response.
    #[error("Vision API returned no response for the image")]
    EmptyResponse,

    #[error("invalid Vision endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

use thiserror::Error;

/// Errors from the page-fetch transport.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Errors that abort a whole price-resolution run.
///
/// Scraping failures never appear here; they are folded into the outcome.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("recognition service error: {0}")]
    Recognition(String),
}

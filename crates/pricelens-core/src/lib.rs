pub mod app_config;
pub mod config;
pub mod retailers;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use retailers::{
    load_catalog, parse_catalog, Retailer, RetailerCatalog, RetailerProfile, DEFAULT_MARKUP_PATTERNS,
    MUST_HAVE_RETAILERS,
};
pub use types::{
    PageRef, PriceQuote, RecognitionResult, ResolutionOutcome, PRICE_ERROR_PREFIX,
    PRICE_UNAVAILABLE,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read retailer catalog {path}: {source}")]
    CatalogFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse retailer catalog: {0}")]
    CatalogFileParse(#[from] serde_yaml::Error),

    #[error("retailer catalog validation failed: {0}")]
    Validation(String),
}

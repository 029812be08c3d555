pub mod classify;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod normalize;
pub mod pipeline;
pub mod search;

mod retry;

pub use classify::{network_location, Classification, DomainClassifier};
pub use error::{FetchError, PipelineError};
pub use extract::{scrape_price, MarkupPriceExtractor};
pub use fetch::{HttpFetcher, PageFetcher};
pub use normalize::normalize_price;
pub use pipeline::PricePipeline;
pub use search::RetailerSearch;

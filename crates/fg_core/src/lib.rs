pub mod config;
pub mod dates;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod storage;
pub mod types;

pub use config::SamplerConfig;
pub use error::{Error, Result};
pub use fetcher::ContentFetcher;
pub use logging::{init_logging, Logger};
pub use storage::EventStore;
pub use types::{Article, ArticleOverrides, ArticleRecord, Citation, Event, Page};

pub mod extract;
pub mod fetcher;
pub mod jsonld;
pub mod wikinews;

pub use extract::extract_article;
pub use fetcher::HttpFetcher;
pub use wikinews::WikinewsDump;

pub mod prelude {
    pub use super::fetcher::HttpFetcher;
    pub use super::wikinews::WikinewsDump;
    pub use fg_core::{ContentFetcher, Error, Page, Result};
}

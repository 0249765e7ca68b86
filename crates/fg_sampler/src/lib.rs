pub mod builder;
pub mod driver;
pub mod filter;

#[cfg(test)]
pub(crate) mod test_utils;

pub use builder::{BuildResult, CitationOutcome, EventBuilder, SkipReason};
pub use driver::{SampleReport, Sampler};
pub use filter::{filter_citations, filter_date_outliers, filter_trusted};

pub mod prelude {
    pub use super::builder::{BuildResult, EventBuilder};
    pub use super::driver::{SampleReport, Sampler};
    pub use fg_core::{Citation, Error, Page, Result, SamplerConfig};
}

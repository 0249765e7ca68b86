use async_trait::async_trait;
use crate::types::{ArticleOverrides, ArticleRecord};
use crate::Result;

#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Download and extract the document at `url`.
    ///
    /// `Ok(None)` means the document could not be downloaded at all.
    async fn fetch(&self, url: &str) -> Result<Option<ArticleRecord>>;

    /// Fetch, then lay `overrides` over the extracted fields.
    async fn fetch_with(&self, url: &str, overrides: &ArticleOverrides) -> Result<Option<ArticleRecord>> {
        Ok(self.fetch(url).await?.map(|record| record.with_overrides(overrides)))
    }
}

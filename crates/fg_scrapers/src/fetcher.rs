use async_trait::async_trait;
use fg_core::{ArticleRecord, ContentFetcher, Logger, Result};

use crate::extract::extract_article;

const USER_AGENT: &str = concat!("focusgroup/", env!("CARGO_PKG_VERSION"));

/// Fetches cited articles over HTTP and extracts them with [`extract_article`].
///
/// There is no timeout and no retry: a slow publisher stalls the caller.
pub struct HttpFetcher {
    client: reqwest::Client,
    logger: Logger,
}

impl HttpFetcher {
    pub fn new(logger: Logger) -> Result<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client, logger })
    }
}

#[async_trait]
impl ContentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Option<ArticleRecord>> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                self.logger.debug(&format!("Download failed for {}: {}", url, e));
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            self.logger.debug(&format!("Download failed for {}: HTTP {}", url, response.status()));
            return Ok(None);
        }

        let html = response.text().await?;
        extract_article(url, &html).map(Some)
    }
}

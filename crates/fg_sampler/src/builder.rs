use std::sync::Arc;

use fg_core::{
    Article, ArticleOverrides, Citation, ContentFetcher, Error, Event, EventStore, Logger, Result,
};

pub const DEFAULT_MIN_BODY_CHARS: usize = 400;

/// Why a citation did not become an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The fetcher could not download the document.
    Unreachable,
    /// The extracted body had this many characters, not more than the minimum.
    BodyTooShort(usize),
    /// Fetching or extracting raised an error.
    Failed(String),
}

/// What happened to a single citation.
#[derive(Debug, Clone, PartialEq)]
pub enum CitationOutcome {
    Exists,
    Captured(Article),
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildResult {
    /// The event was saved. `appended` of its `total` articles are new.
    Persisted { appended: usize, total: usize },
    /// One of the article URLs already belongs to another event.
    RejectedDuplicate,
    /// A publish date could not be coerced into a timestamp.
    RejectedInvalidDate,
    /// Fewer articles than required; nothing was written.
    RejectedTooFew { found: usize },
}

impl BuildResult {
    pub fn is_persisted(&self) -> bool {
        matches!(self, BuildResult::Persisted { .. })
    }
}

/// Turns a title and its citations into a stored event.
pub struct EventBuilder {
    store: Arc<dyn EventStore>,
    fetcher: Arc<dyn ContentFetcher>,
    min_body_chars: usize,
    logger: Logger,
}

impl EventBuilder {
    pub fn new(store: Arc<dyn EventStore>, fetcher: Arc<dyn ContentFetcher>, logger: Logger) -> Self {
        Self {
            store,
            fetcher,
            min_body_chars: DEFAULT_MIN_BODY_CHARS,
            logger,
        }
    }

    pub fn with_min_body_chars(mut self, min_body_chars: usize) -> Self {
        self.min_body_chars = min_body_chars;
        self
    }

    /// Resolves one citation against the event under construction.
    ///
    /// Never fails: fetch errors come back as `Skipped(Failed)`.
    pub async fn capture(&self, event: &Event, citation: &Citation) -> CitationOutcome {
        let logger = self.logger.scoped(format!("`{}`", event.title));

        if event.has_article(&citation.url) {
            logger.info(&format!("[EXIST] {}", citation.url));
            return CitationOutcome::Exists;
        }

        logger.info(&format!("[FETCH] {}", citation.url));
        let overrides = ArticleOverrides::from_citation(citation);
        match self.fetcher.fetch_with(&citation.url, &overrides).await {
            Ok(Some(record)) => {
                let chars = record.body_chars();
                if chars <= self.min_body_chars {
                    logger.info(&format!("Body too short ({} chars), skipping {}", chars, citation.url));
                    CitationOutcome::Skipped(SkipReason::BodyTooShort(chars))
                } else {
                    CitationOutcome::Captured(Article::from(record))
                }
            }
            Ok(None) => {
                logger.warn(&format!("Unable to fetch, skipping {}", citation.url));
                CitationOutcome::Skipped(SkipReason::Unreachable)
            }
            Err(e) => {
                logger.error(&format!("❌ Error capturing {}: {}", citation.url, e));
                CitationOutcome::Skipped(SkipReason::Failed(e.to_string()))
            }
        }
    }

    /// Loads or starts the event `title`, captures each citation in order and
    /// saves the result when it has at least `min_sources` articles.
    ///
    /// Duplicate-URL and bad-date rejections from the store come back as
    /// values. Any other store error is returned as is.
    pub async fn build(&self, title: &str, citations: &[Citation], min_sources: usize) -> Result<BuildResult> {
        let logger = self.logger.scoped(format!("`{}`", title));

        let mut event = match self.store.find_event(title).await? {
            Some(event) => event,
            None => Event::new(title),
        };
        let existing = event.len();

        for citation in citations {
            if let CitationOutcome::Captured(article) = self.capture(&event, citation).await {
                event.articles.push(article);
            }
        }

        if event.len() < min_sources {
            logger.info(&format!(
                "⏭️ Only {} of {} required articles, not saving",
                event.len(),
                min_sources
            ));
            return Ok(BuildResult::RejectedTooFew { found: event.len() });
        }

        match self.store.save_event(&event).await {
            Ok(()) => {
                let appended = event.len() - existing;
                logger.info(&format!("💾 Saved with {} articles ({} new)", event.len(), appended));
                Ok(BuildResult::Persisted {
                    appended,
                    total: event.len(),
                })
            }
            Err(Error::Duplicate(message)) => {
                logger.warn(&format!("Duplicate article, event rejected: {}", message));
                Ok(BuildResult::RejectedDuplicate)
            }
            Err(Error::Validation(message)) => {
                logger.warn(&format!("Invalid date, event rejected: {}", message));
                Ok(BuildResult::RejectedInvalidDate)
            }
            Err(e) => {
                logger.error(&format!("❌ Failed to save event: {}", e));
                Err(e)
            }
        }
    }
}

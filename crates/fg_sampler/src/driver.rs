use std::collections::HashMap;
use std::sync::Arc;

use fg_core::{Citation, ContentFetcher, EventStore, Logger, Page, Result, SamplerConfig};
use url::Url;

use crate::builder::{BuildResult, EventBuilder};
use crate::filter::filter_citations;

/// Counters for one pass over a page source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleReport {
    pub pages_seen: usize,
    /// Events persisted (or, in preview, events that would be attempted).
    pub events: usize,
    /// Filtered citations of every persisted event.
    pub articles: usize,
    pub too_few: usize,
    pub duplicates: usize,
    pub invalid_dates: usize,
    pub skipped_compilations: usize,
    pub skipped_undersourced: usize,
    /// Preview only: citations per host that failed the trust filter.
    pub untrusted_domains: HashMap<String, usize>,
}

impl SampleReport {
    /// Untrusted hosts, most cited first. Ties sort by host name.
    pub fn top_untrusted_domains(&self) -> Vec<(&str, usize)> {
        let mut domains: Vec<(&str, usize)> = self
            .untrusted_domains
            .iter()
            .map(|(host, count)| (host.as_str(), *count))
            .collect();
        domains.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        domains
    }

    fn record(&mut self, result: BuildResult, filtered: usize) {
        match result {
            BuildResult::Persisted { .. } => {
                self.events += 1;
                self.articles += filtered;
            }
            BuildResult::RejectedTooFew { .. } => self.too_few += 1,
            BuildResult::RejectedDuplicate => self.duplicates += 1,
            BuildResult::RejectedInvalidDate => self.invalid_dates += 1,
        }
    }

    fn count_untrusted(&mut self, citations: &[Citation], config: &SamplerConfig) {
        for citation in citations.iter().filter(|c| !config.is_trusted(&c.url)) {
            let host = Url::parse(&citation.url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string));
            if let Some(host) = host {
                *self.untrusted_domains.entry(host).or_default() += 1;
            }
        }
    }
}

/// Walks a page source in order and hands every qualifying page to the builder.
pub struct Sampler {
    builder: EventBuilder,
    config: SamplerConfig,
    preview: bool,
    logger: Logger,
}

impl Sampler {
    pub fn new(
        store: Arc<dyn EventStore>,
        fetcher: Arc<dyn ContentFetcher>,
        config: SamplerConfig,
        logger: Logger,
    ) -> Self {
        let builder = EventBuilder::new(store, fetcher, logger.clone()).with_min_body_chars(config.min_body_chars);
        Self {
            builder,
            config,
            preview: false,
            logger,
        }
    }

    /// In preview mode nothing is fetched or saved.
    pub fn preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Processes `pages` one at a time. The first page source error aborts the
    /// run, as does any store failure the builder does not turn into a result.
    pub async fn run<I>(&self, pages: I) -> Result<SampleReport>
    where
        I: IntoIterator<Item = Result<Page>>,
    {
        let mut report = SampleReport::default();

        for page in pages {
            let page = page?;
            report.pages_seen += 1;

            if page.title.contains(&self.config.compilation_marker) {
                self.logger.debug(&format!("Skipping compilation `{}`", page.title));
                report.skipped_compilations += 1;
                continue;
            }

            if self.preview {
                report.count_untrusted(&page.citations, &self.config);
            }

            let filtered = filter_citations(&page.citations, &self.config);
            if filtered.len() < self.config.min_sources {
                report.skipped_undersourced += 1;
                continue;
            }

            if self.preview {
                self.logger.info(&format!("👀 `{}`: {} usable citations", page.title, filtered.len()));
                report.events += 1;
                report.articles += filtered.len();
                continue;
            }

            let result = self.builder.build(&page.title, &filtered, self.config.min_sources).await?;
            report.record(result, filtered.len());
        }

        self.logger.info(&format!(
            "✅ Sampled {} events and {} articles.",
            report.events, report.articles
        ));
        Ok(report)
    }
}

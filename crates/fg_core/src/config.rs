//! Sampler configuration.
//!
//! Values come from an optional TOML file; CLI flags override file values,
//! which override the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Publishers whose articles are trusted enough to back an event.
///
/// Matched as substrings of the citation URL, not as exact hosts.
pub const DEFAULT_TRUSTED_PUBLISHERS: &[&str] = &[
    "news.yahoo.com",
    "bbc.co.uk",
    "chinadaily.com",
    "reuters.com",
    "latimes.com",
    "guardian.co.uk",
    "dailytimes.com",
    "reuters.co.uk",
    "alertnet.org",
    "cnn.com",
    "independent.co.uk",
    "telegraph.co.uk",
    "bloomberg.com",
    "washingtonpost.com",
    "aljazeera.net",
    "forbes.com",
    "xinhuanet.com",
    "abcnews.go.com",
    "abc.net.au",
    "nzherald.co.nz",
    "wsj.com",
    "thestar.com",
    "usatoday.com",
    "cbsnews.com",
    "nytimes.com",
    "sfgate.com",
    "npr.org",
    "chicagotribune.com",
    "hosted.ap.org",
    "mercurynews.com",
    "indiatimes.com",
    "boston.com",
    "ft.com",
    "msnbc.msn.com",
    "voanews.com",
    "iht.com",
    "upi.com",
    "politico.com",
    "seattletimes.nwsource.com",
    "aljazeera.com",
    "huffingtonpost.com",
    "businessweek.com",
    "cbc.ca",
    "time.com",
    "theguardian.com",
    "theglobeandmail.com",
    "theregister.co.uk",
    "france24.com",
    "csmonitor.com",
    "haaretz.com",
    "bbc.com",
    "bostonherald.com",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Minimum number of articles an event needs to be persisted.
    pub min_sources: usize,

    /// Bodies at or below this many characters count as failed fetches.
    pub min_body_chars: usize,

    /// Two citations further apart than this many days conflict.
    pub max_day_spread: i64,

    pub trusted_publishers: Vec<String>,

    /// Pages containing this markup are skipped by the page source.
    pub foreign_language_marker: String,

    /// Titles containing this text compile several stories and are skipped.
    pub compilation_marker: String,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            min_sources: 3,
            min_body_chars: 400,
            max_day_spread: 3,
            trusted_publishers: DEFAULT_TRUSTED_PUBLISHERS.iter().map(|s| s.to_string()).collect(),
            foreign_language_marker: "{{foreign language}}".to_string(),
            compilation_marker: "Wikinews Shorts".to_string(),
        }
    }
}

impl SamplerConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    pub fn is_trusted(&self, url: &str) -> bool {
        self.trusted_publishers.iter().any(|p| url.contains(p.as_str()))
    }
}

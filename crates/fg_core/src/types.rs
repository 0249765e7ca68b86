use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dates;
use crate::{Error, Result};

/// A raw `(url, date)` pair lifted from a `{{source}}` template.
///
/// Nothing about it is validated: the date is whatever the contributor typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Citation {
    pub url: String,
    pub date_text: String,
}

impl Citation {
    pub fn new(url: impl Into<String>, date_text: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            date_text: date_text.into(),
        }
    }

    pub fn published(&self) -> Option<DateTime<Utc>> {
        dates::parse_date(&self.date_text)
    }
}

/// One document of the page source: a title and the citations found in its markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
    pub citations: Vec<Citation>,
}

/// What a content fetcher extracted from a remote document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub url: String,
    pub title: String,
    pub body: String,
    pub image: String,
    pub published: Option<String>,
}

/// Caller-provided values that take precedence over fetched ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleOverrides {
    pub title: Option<String>,
    pub body: Option<String>,
    pub image: Option<String>,
    pub published: Option<String>,
}

impl ArticleOverrides {
    /// Overrides carrying only a citation's date, if it has one.
    pub fn from_citation(citation: &Citation) -> Self {
        let date = citation.date_text.trim();
        Self {
            published: (!date.is_empty()).then(|| date.to_string()),
            ..Self::default()
        }
    }
}

impl ArticleRecord {
    /// Applies `overrides` on top of the fetched values. Overrides always win.
    pub fn with_overrides(mut self, overrides: &ArticleOverrides) -> Self {
        if let Some(title) = &overrides.title {
            self.title = title.clone();
        }
        if let Some(body) = &overrides.body {
            self.body = body.clone();
        }
        if let Some(image) = &overrides.image {
            self.image = image.clone();
        }
        if let Some(published) = &overrides.published {
            self.published = Some(published.clone());
        }
        self
    }

    /// Body length in characters, not bytes.
    pub fn body_chars(&self) -> usize {
        self.body.chars().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub body: String,
    pub image: String,
    /// Kept as text until the store coerces it into a timestamp.
    pub published: Option<String>,
}

impl Article {
    /// Coerces `published` into a timestamp, the way the store does on save.
    pub fn published_at(&self) -> Result<Option<DateTime<Utc>>> {
        match &self.published {
            None => Ok(None),
            Some(text) => dates::parse_date(text)
                .map(Some)
                .ok_or_else(|| Error::Validation(format!("cannot parse date `{}` for {}", text, self.url))),
        }
    }
}

impl From<ArticleRecord> for Article {
    fn from(record: ArticleRecord) -> Self {
        Self {
            url: record.url,
            title: record.title,
            body: record.body,
            image: record.image,
            published: record.published,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub articles: Vec<Article>,
}

impl Event {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            articles: Vec::new(),
        }
    }

    pub fn has_article(&self, url: &str) -> bool {
        self.articles.iter().any(|a| a.url == url)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

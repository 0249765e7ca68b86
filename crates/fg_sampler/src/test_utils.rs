//! Mock collaborators shared by the builder and driver tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use fg_core::{ArticleRecord, ContentFetcher, Error, Event, EventStore, Result};
use fg_storage::InMemoryStorage;

pub enum MockResponse {
    Page(ArticleRecord),
    Unreachable,
    Fails(String),
}

/// Serves canned responses by URL and records every URL it was asked for.
#[derive(Default)]
pub struct MockFetcher {
    responses: HashMap<String, MockResponse>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page at `url` with a body of `body_chars` characters.
    pub fn with_page(mut self, url: &str, body_chars: usize) -> Self {
        self.responses.insert(
            url.to_string(),
            MockResponse::Page(ArticleRecord {
                url: url.to_string(),
                title: format!("Story at {}", url),
                body: "a".repeat(body_chars),
                image: format!("{}/lead.jpg", url),
                published: Some("2001-01-01".to_string()),
            }),
        );
        self
    }

    pub fn with_response(mut self, url: &str, response: MockResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<Option<ArticleRecord>> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(MockResponse::Page(record)) => Ok(Some(record.clone())),
            Some(MockResponse::Fails(message)) => Err(Error::Scraping(message.clone())),
            Some(MockResponse::Unreachable) | None => Ok(None),
        }
    }
}

/// An in-memory store that counts writes and can be told to fail them.
#[derive(Default)]
pub struct CountingStore {
    inner: InMemoryStorage,
    saves: AtomicUsize,
    fail_saves_with: Mutex<Option<String>>,
}

impl CountingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn fail_saves(&self, message: &str) {
        *self.fail_saves_with.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl EventStore for CountingStore {
    async fn find_event(&self, title: &str) -> Result<Option<Event>> {
        self.inner.find_event(title).await
    }

    async fn save_event(&self, event: &Event) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let failure = self.fail_saves_with.lock().unwrap().clone();
        if let Some(message) = failure {
            return Err(Error::Storage(message));
        }
        self.inner.save_event(event).await
    }

    async fn delete_event(&self, title: &str) -> Result<()> {
        self.inner.delete_event(title).await
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        self.inner.list_events().await
    }

    async fn count_events(&self) -> Result<usize> {
        self.inner.count_events().await
    }
}

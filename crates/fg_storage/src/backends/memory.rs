use async_trait::async_trait;
use fg_core::{Error, Event, EventStore, Result};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use crate::{normalize_published, StorageBackend};

/// Events keyed by title, plus an index of which event owns each article URL.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: BTreeMap<String, Event>,
    url_owners: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_event(&self, title: &str) -> Option<Event> {
        self.events.get(title).cloned()
    }

    pub fn save_event(&mut self, event: &Event) -> Result<()> {
        let event = normalize_published(event)?;

        let mut seen = HashSet::new();
        for article in &event.articles {
            if !seen.insert(article.url.as_str()) {
                return Err(Error::Duplicate(format!("article url {} appears twice in `{}`", article.url, event.title)));
            }
            if let Some(owner) = self.url_owners.get(&article.url) {
                if owner != &event.title {
                    return Err(Error::Duplicate(format!("article url {} already belongs to `{}`", article.url, owner)));
                }
            }
        }

        self.release_urls(&event.title);
        for article in &event.articles {
            self.url_owners.insert(article.url.clone(), event.title.clone());
        }
        self.events.insert(event.title.clone(), event);
        Ok(())
    }

    pub fn delete_event(&mut self, title: &str) {
        self.release_urls(title);
        self.events.remove(title);
    }

    pub fn list_events(&self) -> Vec<Event> {
        self.events.values().cloned().collect()
    }

    pub fn count_events(&self) -> usize {
        self.events.len()
    }

    fn release_urls(&mut self, title: &str) {
        if let Some(existing) = self.events.get(title) {
            for article in &existing.articles {
                self.url_owners.remove(&article.url);
            }
        }
    }
}

#[derive(Clone)]
pub struct InMemoryStorage {
    store: Arc<RwLock<MemoryStore>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            store: Arc::new(RwLock::new(MemoryStore::new())),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    async fn new() -> Result<Self> {
        Ok(InMemoryStorage::new())
    }
}

#[async_trait]
impl EventStore for InMemoryStorage {
    async fn find_event(&self, title: &str) -> Result<Option<Event>> {
        let store = self.store.read().await;
        Ok(store.find_event(title))
    }

    async fn save_event(&self, event: &Event) -> Result<()> {
        let mut store = self.store.write().await;
        store.save_event(event)
    }

    async fn delete_event(&self, title: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.delete_event(title);
        Ok(())
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let store = self.store.read().await;
        Ok(store.list_events())
    }

    async fn count_events(&self) -> Result<usize> {
        let store = self.store.read().await;
        Ok(store.count_events())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_core::Article;

    fn article(url: &str, published: Option<&str>) -> Article {
        Article {
            url: url.to_string(),
            title: "Test Article".to_string(),
            body: "This is a test article about an airliner.".to_string(),
            image: String::new(),
            published: published.map(str::to_string),
        }
    }

    fn event(title: &str, urls: &[&str]) -> Event {
        Event {
            title: title.to_string(),
            articles: urls.iter().map(|u| article(u, Some("July 18, 2014"))).collect(),
        }
    }

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = InMemoryStorage::new();
        storage.save_event(&event("Crash", &["http://a", "http://b"])).await.unwrap();

        let found = storage.find_event("Crash").await.unwrap().unwrap();
        assert_eq!(found.articles.len(), 2);
        assert_eq!(found.articles[0].url, "http://a");
        // Dates are coerced on write.
        assert_eq!(found.articles[0].published.as_deref(), Some("2014-07-18T00:00:00+00:00"));
        assert!(storage.find_event("Other").await.unwrap().is_none());
        assert_eq!(storage.count_events().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_url_across_events() {
        let storage = InMemoryStorage::new();
        storage.save_event(&event("First", &["http://a", "http://b"])).await.unwrap();

        let err = storage.save_event(&event("Second", &["http://c", "http://b"])).await.unwrap_err();
        assert!(matches!(err, Error::Duplicate(_)));

        assert!(storage.find_event("Second").await.unwrap().is_none());
        let first = storage.find_event("First").await.unwrap().unwrap();
        assert!(first.has_article("http://b"));
    }

    #[tokio::test]
    async fn test_resave_same_event_is_allowed() {
        let storage = InMemoryStorage::new();
        storage.save_event(&event("Crash", &["http://a"])).await.unwrap();
        storage.save_event(&event("Crash", &["http://a", "http://b"])).await.unwrap();
        assert_eq!(storage.find_event("Crash").await.unwrap().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_date_writes_nothing() {
        let storage = InMemoryStorage::new();
        let mut bad = event("Crash", &["http://a"]);
        bad.articles.push(article("http://b", Some("the other day")));

        let err = storage.save_event(&bad).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(storage.count_events().await.unwrap(), 0);

        // The URL was never claimed.
        storage.save_event(&event("Other", &["http://a"])).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_releases_urls() {
        let storage = InMemoryStorage::new();
        storage.save_event(&event("First", &["http://a"])).await.unwrap();
        storage.delete_event("First").await.unwrap();
        storage.save_event(&event("Second", &["http://a"])).await.unwrap();
        let titles: Vec<_> = storage.list_events().await.unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Second".to_string()]);
    }

    #[tokio::test]
    async fn test_missing_published_is_accepted() {
        let storage = InMemoryStorage::new();
        let mut e = event("Crash", &[]);
        e.articles.push(article("http://a", None));
        storage.save_event(&e).await.unwrap();
        let found = storage.find_event("Crash").await.unwrap().unwrap();
        assert!(found.articles[0].published.is_none());
    }
}

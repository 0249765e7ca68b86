use async_trait::async_trait;
use fg_core::{Error, Event, EventStore, Result};
use std::path::Path;
use std::sync::Arc;

pub mod backends;
pub mod maintenance;

pub use backends::*;

#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn new() -> Result<Self> where Self: Sized;
}

/// Coerces every article's `published` text into an RFC 3339 timestamp.
///
/// This is the write-time validation every backend applies before storing.
pub(crate) fn normalize_published(event: &Event) -> Result<Event> {
    let mut event = event.clone();
    for article in &mut event.articles {
        article.published = article.published_at()?.map(|dt| dt.to_rfc3339());
    }
    Ok(event)
}

/// Builds the named backend. `db_path` only matters for `sqlite`.
pub async fn create_storage(storage: &str, db_path: Option<&Path>) -> Result<Arc<dyn EventStore>> {
    match storage {
        "memory" => Ok(Arc::new(<InMemoryStorage as StorageBackend>::new().await?)),
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let storage = match db_path {
                Some(path) => SQLiteStorage::new_with_path(path).await?,
                None => <SQLiteStorage as StorageBackend>::new().await?,
            };
            tracing::info!("🏦 Using SQLite storage at {}", storage.get_db_path().display());
            Ok(Arc::new(storage))
        }
        other => {
            let _ = db_path;
            Err(Error::Config(format!("Unknown storage backend: {}", other)))
        }
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::maintenance::{export_events, prune_short_articles, sample_events, PruneReport, SampleSize};
    pub use super::StorageBackend;
}

use async_trait::async_trait;
use crate::types::Event;
use crate::Result;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Look up an event by its unique title
    async fn find_event(&self, title: &str) -> Result<Option<Event>>;

    /// Insert or replace an event.
    ///
    /// Fails with `Error::Duplicate` when one of its article URLs belongs to
    /// another event, and with `Error::Validation` when a `published` value
    /// cannot be coerced into a timestamp. Nothing is written on failure.
    async fn save_event(&self, event: &Event) -> Result<()>;

    /// Remove an event and release its article URLs
    async fn delete_event(&self, title: &str) -> Result<()>;

    /// All events, ordered by title
    async fn list_events(&self) -> Result<Vec<Event>>;

    async fn count_events(&self) -> Result<usize>;
}

//! Batch jobs over events that are already persisted.

pub mod export;
pub mod prune;

pub use export::{export_events, sample_events, ExportedArticle, ExportedEvent, SampleSize};
pub use prune::{prune_short_articles, PruneReport};

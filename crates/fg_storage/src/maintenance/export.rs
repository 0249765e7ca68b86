use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use fg_core::{Error, Event, EventStore, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How many events to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSize {
    All,
    Count(usize),
}

impl FromStr for SampleSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(SampleSize::All);
        }
        s.parse::<usize>()
            .map(SampleSize::Count)
            .map_err(|_| Error::Config(format!("Sample size must be a number or `all`, got `{}`", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedArticle {
    pub title: String,
    pub body: String,
    pub url: String,
    pub image: String,
    /// Seconds since the Unix epoch.
    pub published: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedEvent {
    pub title: String,
    pub articles: Vec<ExportedArticle>,
}

impl TryFrom<&Event> for ExportedEvent {
    type Error = Error;

    fn try_from(event: &Event) -> Result<Self> {
        let articles = event
            .articles
            .iter()
            .map(|a| {
                Ok(ExportedArticle {
                    title: a.title.clone(),
                    body: a.body.clone(),
                    url: a.url.clone(),
                    image: a.image.clone(),
                    published: a.published_at()?.map(|dt| dt.timestamp()),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            title: event.title.clone(),
            articles,
        })
    }
}

/// Draws a uniform random sample of events without replacement.
///
/// Asking for more events than exist returns all of them, shuffled.
pub async fn sample_events<R: Rng + ?Sized>(store: &dyn EventStore, size: SampleSize, rng: &mut R) -> Result<Vec<Event>> {
    let events = store.list_events().await?;
    let amount = match size {
        SampleSize::All => events.len(),
        SampleSize::Count(n) => n.min(events.len()),
    };

    let picked = rand::seq::index::sample(rng, events.len(), amount);
    let mut slots: Vec<Option<Event>> = events.into_iter().map(Some).collect();
    Ok(picked.into_iter().filter_map(|i| slots[i].take()).collect())
}

/// Writes events as a JSON array to `path`.
pub fn export_events(events: &[Event], path: &Path) -> Result<usize> {
    let exported = events.iter().map(ExportedEvent::try_from).collect::<Result<Vec<_>>>()?;
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, &exported)?;
    writer.flush()?;
    Ok(exported.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStorage;
    use fg_core::Article;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    async fn seeded_store(n: usize) -> InMemoryStorage {
        let storage = InMemoryStorage::new();
        for i in 0..n {
            storage
                .save_event(&Event {
                    title: format!("Event {}", i),
                    articles: vec![Article {
                        url: format!("http://example.com/{}", i),
                        title: format!("Article {}", i),
                        body: "Body".to_string(),
                        image: "http://example.com/i.jpg".to_string(),
                        published: Some("July 18, 2014".to_string()),
                    }],
                })
                .await
                .unwrap();
        }
        storage
    }

    #[test]
    fn test_sample_size_parse() {
        assert_eq!("all".parse::<SampleSize>().unwrap(), SampleSize::All);
        assert_eq!("ALL".parse::<SampleSize>().unwrap(), SampleSize::All);
        assert_eq!("12".parse::<SampleSize>().unwrap(), SampleSize::Count(12));
        assert!("-1".parse::<SampleSize>().is_err());
        assert!("some".parse::<SampleSize>().is_err());
    }

    #[tokio::test]
    async fn test_sample_without_replacement() {
        let storage = seeded_store(10).await;
        let mut rng = StdRng::seed_from_u64(7);

        let sample = sample_events(&storage, SampleSize::Count(4), &mut rng).await.unwrap();
        assert_eq!(sample.len(), 4);
        let titles: HashSet<_> = sample.iter().map(|e| e.title.clone()).collect();
        assert_eq!(titles.len(), 4);

        let all = sample_events(&storage, SampleSize::All, &mut rng).await.unwrap();
        assert_eq!(all.len(), 10);

        let capped = sample_events(&storage, SampleSize::Count(50), &mut rng).await.unwrap();
        assert_eq!(capped.len(), 10);
        let titles: HashSet<_> = capped.iter().map(|e| e.title.clone()).collect();
        assert_eq!(titles.len(), 10);
    }

    #[tokio::test]
    async fn test_sample_empty_store() {
        let storage = InMemoryStorage::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(sample_events(&storage, SampleSize::All, &mut rng).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_export_events() {
        let storage = seeded_store(2).await;
        let events = storage.list_events().await.unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.json");

        assert_eq!(export_events(&events, &path).unwrap(), 2);

        let text = std::fs::read_to_string(&path).unwrap();
        let exported: Vec<ExportedEvent> = serde_json::from_str(&text).unwrap();
        assert_eq!(exported[0].title, "Event 0");
        assert_eq!(exported[0].articles[0].url, "http://example.com/0");
        // 2014-07-18T00:00:00Z
        assert_eq!(exported[0].articles[0].published, Some(1_405_641_600));
    }

    #[test]
    fn test_missing_published_exports_null() {
        let event = Event {
            title: "T".to_string(),
            articles: vec![Article {
                url: "http://a".to_string(),
                title: String::new(),
                body: String::new(),
                image: String::new(),
                published: None,
            }],
        };
        let exported = ExportedEvent::try_from(&event).unwrap();
        let json = serde_json::to_value(&exported).unwrap();
        assert!(json["articles"][0]["published"].is_null());
    }
}

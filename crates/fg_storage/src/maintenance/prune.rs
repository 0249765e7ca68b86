use fg_core::{EventStore, Logger, Result};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PruneReport {
    pub articles_removed: usize,
    pub events_deleted: usize,
}

/// Drops articles whose body is at or below `min_body_chars` characters and
/// deletes every event left with fewer than `min_sources` articles.
pub async fn prune_short_articles(
    store: &dyn EventStore,
    min_body_chars: usize,
    min_sources: usize,
    logger: &Logger,
) -> Result<PruneReport> {
    let mut report = PruneReport::default();

    for mut event in store.list_events().await? {
        let before = event.articles.len();
        event.articles.retain(|a| a.body.chars().count() > min_body_chars);
        let removed = before - event.articles.len();
        report.articles_removed += removed;

        if event.articles.len() < min_sources {
            logger.info(&format!("Deleting `{}` ({} articles left)", event.title, event.articles.len()));
            store.delete_event(&event.title).await?;
            report.events_deleted += 1;
        } else if removed > 0 {
            logger.debug(&format!("Removed {} short articles from `{}`", removed, event.title));
            store.save_event(&event).await?;
        }
    }

    logger.info(&format!(
        "Pruned {} articles, deleted {} events",
        report.articles_removed, report.events_deleted
    ));
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStorage;
    use fg_core::{Article, Event};

    fn article(url: &str, body_chars: usize) -> Article {
        Article {
            url: url.to_string(),
            title: "Title".to_string(),
            body: "x".repeat(body_chars),
            image: String::new(),
            published: Some("2014-07-18".to_string()),
        }
    }

    #[tokio::test]
    async fn test_prune() {
        let storage = InMemoryStorage::new();
        storage
            .save_event(&Event {
                title: "Keeps three".to_string(),
                articles: vec![
                    article("http://a1", 401),
                    article("http://a2", 500),
                    article("http://a3", 400),
                    article("http://a4", 900),
                ],
            })
            .await
            .unwrap();
        storage
            .save_event(&Event {
                title: "Falls below".to_string(),
                articles: vec![article("http://b1", 401), article("http://b2", 401), article("http://b3", 12)],
            })
            .await
            .unwrap();
        storage
            .save_event(&Event {
                title: "Untouched".to_string(),
                articles: vec![article("http://c1", 401), article("http://c2", 401), article("http://c3", 401)],
            })
            .await
            .unwrap();

        let report = prune_short_articles(&storage, 400, 3, &Logger::new()).await.unwrap();
        assert_eq!(report, PruneReport { articles_removed: 2, events_deleted: 1 });

        let kept = storage.find_event("Keeps three").await.unwrap().unwrap();
        let urls: Vec<_> = kept.articles.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["http://a1", "http://a2", "http://a4"]);
        assert!(storage.find_event("Falls below").await.unwrap().is_none());
        assert_eq!(storage.find_event("Untouched").await.unwrap().unwrap().len(), 3);
    }
}

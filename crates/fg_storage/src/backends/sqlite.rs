use async_trait::async_trait;
use fg_core::{Article, Error, Event, EventStore, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use crate::{normalize_published, StorageBackend};

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS events (
        title TEXT PRIMARY KEY
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        url TEXT PRIMARY KEY,
        event_title TEXT NOT NULL REFERENCES events(title),
        position INTEGER NOT NULL,
        title TEXT NOT NULL,
        body TEXT NOT NULL,
        image TEXT NOT NULL,
        published TEXT
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS articles_event_title ON articles (event_title, position)
    "#,
];

pub struct SQLiteStorage {
    pool: Arc<SqlitePool>,
    db_path: PathBuf,
}

#[async_trait]
impl StorageBackend for SQLiteStorage {
    async fn new() -> Result<Self> {
        let db_path = PathBuf::from("focusgroup.db");
        Self::new_with_path(&db_path).await
    }
}

fn db_error(context: &str, e: sqlx::Error) -> Error {
    Error::Database(format!("{}: {}", context, e))
}

impl SQLiteStorage {
    pub async fn new_with_path(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .map_err(|e| db_error("Failed to connect to database", e))?;

        for (i, migration) in MIGRATIONS.iter().enumerate() {
            sqlx::query(migration)
                .execute(&pool)
                .await
                .map_err(|e| db_error(&format!("Failed to run migration {}", i), e))?;
        }

        Ok(Self {
            pool: Arc::new(pool),
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn get_db_path(&self) -> &Path {
        &self.db_path
    }

    async fn load_articles(&self, title: &str) -> Result<Vec<Article>> {
        let rows = sqlx::query(
            r#"
            SELECT url, title, body, image, published FROM articles
            WHERE event_title = ?
            ORDER BY position ASC
            "#,
        )
        .bind(title)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| db_error("Failed to load articles", e))?;

        Ok(rows
            .into_iter()
            .map(|row| Article {
                url: row.get("url"),
                title: row.get("title"),
                body: row.get("body"),
                image: row.get("image"),
                published: row.get::<Option<String>, _>("published"),
            })
            .collect())
    }
}

#[async_trait]
impl EventStore for SQLiteStorage {
    async fn find_event(&self, title: &str) -> Result<Option<Event>> {
        let row = sqlx::query("SELECT title FROM events WHERE title = ?")
            .bind(title)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| db_error("Failed to find event", e))?;

        match row {
            None => Ok(None),
            Some(_) => Ok(Some(Event {
                title: title.to_string(),
                articles: self.load_articles(title).await?,
            })),
        }
    }

    async fn save_event(&self, event: &Event) -> Result<()> {
        // Coerce before touching the database so a bad date writes nothing.
        let event = normalize_published(event)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to start transaction", e))?;

        sqlx::query("INSERT OR IGNORE INTO events (title) VALUES (?)")
            .bind(&event.title)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to store event", e))?;

        sqlx::query("DELETE FROM articles WHERE event_title = ?")
            .bind(&event.title)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to replace articles", e))?;

        for (position, article) in event.articles.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO articles
                (url, event_title, position, title, body, image, published)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&article.url)
            .bind(&event.title)
            .bind(position as i64)
            .bind(&article.title)
            .bind(&article.body)
            .bind(&article.image)
            .bind(article.published.as_deref())
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    Error::Duplicate(format!("article url {} already stored", article.url))
                }
                e => db_error("Failed to store article", e),
            })?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit event", e))?;
        Ok(())
    }

    async fn delete_event(&self, title: &str) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to start transaction", e))?;

        sqlx::query("DELETE FROM articles WHERE event_title = ?")
            .bind(title)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete articles", e))?;
        sqlx::query("DELETE FROM events WHERE title = ?")
            .bind(title)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Failed to delete event", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit delete", e))?;
        Ok(())
    }

    async fn list_events(&self) -> Result<Vec<Event>> {
        let titles: Vec<String> = sqlx::query("SELECT title FROM events ORDER BY title ASC")
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| db_error("Failed to list events", e))?
            .into_iter()
            .map(|row| row.get("title"))
            .collect();

        let mut events = Vec::with_capacity(titles.len());
        for title in titles {
            let articles = self.load_articles(&title).await?;
            events.push(Event { title, articles });
        }
        Ok(events)
    }

    async fn count_events(&self) -> Result<usize> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM events")
            .fetch_one(&*self.pool)
            .await
            .map_err(|e| db_error("Failed to count events", e))?;
        Ok(row.get::<i64, _>("n") as usize)
    }
}

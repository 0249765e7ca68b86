use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Page source error: {0}")]
    Source(String),

    #[error("Storage error: {0}")]
    Storage(String),

    /// An embedded article URL (or the event title) is already owned elsewhere.
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    /// A field could not be coerced into its stored type.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

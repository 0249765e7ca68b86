//! Generic article extraction from an HTML page.
//!
//! Publishers cited on Wikinews are too many to scrape one by one, so this
//! relies on the metadata most news sites emit (Open Graph, `article:*`
//! meta tags, JSON-LD) and falls back to plain document structure.

use fg_core::{ArticleRecord, Error, Result};
use scraper::{Html, Selector};

use crate::jsonld;

fn selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| Error::Scraping(format!("Invalid selector {}: {}", selector, e)))
}

/// First non-empty `content` attribute among the given meta selectors.
fn meta_content(document: &Html, selectors: &[&str]) -> Result<Option<String>> {
    for s in selectors {
        let sel = selector(s)?;
        let found = document
            .select(&sel)
            .filter_map(|el| el.value().attr("content"))
            .map(|c| c.trim().to_string())
            .find(|c| !c.is_empty());
        if found.is_some() {
            return Ok(found);
        }
    }
    Ok(None)
}

pub fn extract_text(document: &Html, selector_str: &str) -> Result<Option<String>> {
    let sel = selector(selector_str)?;
    Ok(document
        .select(&sel)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|t| !t.is_empty()))
}

pub fn extract_texts(document: &Html, selector_str: &str) -> Result<Vec<String>> {
    let sel = selector(selector_str)?;
    Ok(document
        .select(&sel)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect())
}

fn extract_title(document: &Html) -> Result<String> {
    if let Some(title) = meta_content(document, &["meta[property='og:title']", "meta[name='twitter:title']"])? {
        return Ok(title);
    }
    if let Some(title) = extract_text(document, "title")? {
        return Ok(title);
    }
    Ok(extract_text(document, "h1")?.unwrap_or_default())
}

/// Paragraphs inside `<article>` when there are any, otherwise every paragraph.
fn extract_body(document: &Html) -> Result<String> {
    let mut paragraphs = extract_texts(document, "article p")?;
    if paragraphs.is_empty() {
        paragraphs = extract_texts(document, "p")?;
    }
    Ok(paragraphs.join("\n\n"))
}

fn extract_image(document: &Html) -> Result<String> {
    if let Some(image) = meta_content(document, &["meta[property='og:image']", "meta[name='twitter:image']"])? {
        return Ok(image);
    }
    if let Some(image) = jsonld::extract_image(document) {
        return Ok(image);
    }
    let sel = selector("link[rel='image_src']")?;
    Ok(document
        .select(&sel)
        .filter_map(|el| el.value().attr("href"))
        .map(|h| h.trim().to_string())
        .next()
        .unwrap_or_default())
}

fn extract_published(document: &Html) -> Result<Option<String>> {
    let meta = meta_content(
        document,
        &[
            "meta[property='article:published_time']",
            "meta[name='pubdate']",
            "meta[name='publishdate']",
            "meta[itemprop='datePublished']",
            "meta[name='date']",
        ],
    )?;
    if meta.is_some() {
        return Ok(meta);
    }
    Ok(jsonld::extract_date_published(document))
}

/// Extracts title, body, lead image and publish date from a fetched page.
pub fn extract_article(url: &str, html: &str) -> Result<ArticleRecord> {
    let document = Html::parse_document(html);

    Ok(ArticleRecord {
        url: url.to_string(),
        title: extract_title(&document)?,
        body: extract_body(&document)?,
        image: extract_image(&document)?,
        published: extract_published(&document)?,
    })
}

//! Page source over a MediaWiki `pages-articles` XML export.
//!
//! Pages are streamed one at a time so a full Wikinews dump never has to fit
//! in memory. Only main-namespace pages without the foreign-language marker
//! are yielded.

pub mod markup;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use fg_core::{Error, Page, Result};
use quick_xml::events::Event;
use quick_xml::Reader;

pub use markup::extract_citations;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Ns,
    Text,
}

#[derive(Debug, Default)]
struct RawPage {
    title: String,
    ns: Option<String>,
    text: String,
}

impl RawPage {
    fn push(&mut self, field: Field, chunk: &str) {
        match field {
            Field::Title => self.title.push_str(chunk),
            Field::Ns => self.ns.get_or_insert_with(String::new).push_str(chunk),
            Field::Text => self.text.push_str(chunk),
        }
    }
}

pub struct WikinewsDump<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    foreign_language_marker: String,
    done: bool,
}

impl WikinewsDump<BufReader<File>> {
    pub fn open(path: &Path, foreign_language_marker: impl Into<String>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file), foreign_language_marker))
    }
}

impl<R: BufRead> WikinewsDump<R> {
    pub fn new(reader: R, foreign_language_marker: impl Into<String>) -> Self {
        Self {
            reader: Reader::from_reader(reader),
            buf: Vec::new(),
            foreign_language_marker: foreign_language_marker.into(),
            done: false,
        }
    }

    /// Reads up to the next closing `</page>`. `None` at end of input.
    fn read_raw_page(&mut self) -> Result<Option<RawPage>> {
        let mut page: Option<RawPage> = None;
        let mut field: Option<Field> = None;

        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(e) => {
                    return Err(Error::Source(format!(
                        "Malformed dump at byte {}: {}",
                        self.reader.buffer_position(),
                        e
                    )))
                }
            };

            match event {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"page" => page = Some(RawPage::default()),
                    b"title" if page.is_some() => field = Some(Field::Title),
                    b"ns" if page.is_some() => field = Some(Field::Ns),
                    b"text" if page.is_some() => {
                        // Later revisions replace earlier ones.
                        if let Some(p) = page.as_mut() {
                            p.text.clear();
                        }
                        field = Some(Field::Text);
                    }
                    _ => {}
                },
                Event::Text(t) => {
                    if let (Some(p), Some(f)) = (page.as_mut(), field) {
                        let chunk = t.unescape().map_err(|e| Error::Source(format!("Bad text in dump: {}", e)))?;
                        p.push(f, &chunk);
                    }
                }
                Event::CData(c) => {
                    if let (Some(p), Some(f)) = (page.as_mut(), field) {
                        p.push(f, &String::from_utf8_lossy(&c));
                    }
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"page" => return Ok(page),
                    b"title" | b"ns" | b"text" => field = None,
                    _ => {}
                },
                Event::Eof => {
                    return match page {
                        Some(_) => Err(Error::Source("Dump ended inside a <page>".to_string())),
                        None => Ok(None),
                    };
                }
                _ => {}
            }
        }
    }

    fn finish_page(&self, raw: RawPage) -> Result<Option<Page>> {
        let ns = raw
            .ns
            .as_deref()
            .ok_or_else(|| Error::Source(format!("Page `{}` has no <ns>", raw.title)))?;
        let ns: i64 = ns
            .trim()
            .parse()
            .map_err(|_| Error::Source(format!("Page `{}` has a bad <ns>: {}", raw.title, ns)))?;

        if ns != 0 || raw.text.contains(&self.foreign_language_marker) {
            return Ok(None);
        }

        Ok(Some(Page {
            citations: extract_citations(&raw.text),
            title: raw.title.trim().to_string(),
        }))
    }
}

impl<R: BufRead> Iterator for WikinewsDump<R> {
    type Item = Result<Page>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.done {
            let result = match self.read_raw_page() {
                Ok(Some(raw)) => self.finish_page(raw),
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => Err(e),
            };
            match result {
                Ok(Some(page)) => return Some(Ok(page)),
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}

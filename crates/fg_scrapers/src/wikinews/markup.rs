use fg_core::Citation;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `{{source|url=...|title=...|pub=...|date=July 18, 2014}}`
    ///
    /// The url runs to the next `|` or newline; the date to the next `|`, `;`,
    /// `.`, newline or `}`.
    static ref SOURCE_RE: Regex =
        Regex::new(r"(?s)\{\{source\|url=([^|\n]+)[|\n].*?date=([^|;.\n}]+)").unwrap();
}

/// Every `{{source}}` citation in a page's wikitext, in document order.
pub fn extract_citations(text: &str) -> Vec<Citation> {
    SOURCE_RE
        .captures_iter(text)
        .map(|caps| Citation::new(caps[1].trim(), caps[2].trim()))
        .collect()
}

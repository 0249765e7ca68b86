//! Citation filtering: trusted publishers first, then date outliers.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use fg_core::dates::days_apart;
use fg_core::{Citation, SamplerConfig};

/// Keeps citations whose URL contains one of the trusted publisher strings.
///
/// Identical citations collapse into the first occurrence.
pub fn filter_trusted(citations: &[Citation], trusted_publishers: &[String]) -> Vec<Citation> {
    let mut seen = HashSet::new();
    citations
        .iter()
        .filter(|c| trusted_publishers.iter().any(|p| c.url.contains(p.as_str())))
        .filter(|c| seen.insert(*c))
        .cloned()
        .collect()
}

/// Drops citations whose date conflicts with every one of their peers.
///
/// Every pair more than `max_day_spread` days apart, or with a date on either
/// side that does not parse, adds a penalty to both members. A citation is an
/// outlier once its penalty reaches `len - 1`. Two conflicting citations
/// therefore remove each other.
pub fn filter_date_outliers(citations: Vec<Citation>, max_day_spread: i64) -> Vec<Citation> {
    if citations.len() < 2 {
        return citations;
    }

    let dates: Vec<Option<DateTime<Utc>>> = citations.iter().map(Citation::published).collect();

    let mut penalties: HashMap<&Citation, usize> = HashMap::new();
    for i in 0..citations.len() {
        for j in (i + 1)..citations.len() {
            let conflict = match (dates[i], dates[j]) {
                (Some(a), Some(b)) => days_apart(a, b) > max_day_spread,
                _ => true,
            };
            if conflict {
                *penalties.entry(&citations[i]).or_default() += 1;
                *penalties.entry(&citations[j]).or_default() += 1;
            }
        }
    }

    let threshold = citations.len() - 1;
    let outliers: HashSet<Citation> = penalties
        .into_iter()
        .filter(|(_, count)| *count >= threshold)
        .map(|(c, _)| c.clone())
        .collect();

    citations.into_iter().filter(|c| !outliers.contains(c)).collect()
}

/// Both filters, as configured.
pub fn filter_citations(citations: &[Citation], config: &SamplerConfig) -> Vec<Citation> {
    let trusted = filter_trusted(citations, &config.trusted_publishers);
    filter_date_outliers(trusted, config.max_day_spread)
}

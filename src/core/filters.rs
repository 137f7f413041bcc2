use crate::models::{DetailRecord, SearchCriteria};

/// Why a detail record was accepted or rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relevance {
    /// Record carried no data at all
    Empty,
    /// Location contains this excluded substring
    ExcludedLocation(String),
    /// Headline or summary mentions this preferred format
    PreferredFormat(String),
    /// Nothing disqualifying and no format signal either
    NoFormatSignal,
}

impl Relevance {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Relevance::PreferredFormat(_) | Relevance::NoFormatSignal)
    }
}

/// Classify a detail record against the criteria
///
/// Checks run in a fixed order: empty record, excluded location, preferred
/// format. Exclusion always wins over any format signal. Matching is
/// case-insensitive substring search; blank patterns are ignored.
pub fn assess(record: &DetailRecord, criteria: &SearchCriteria) -> Relevance {
    if record.is_empty() {
        return Relevance::Empty;
    }

    let location = record.location.to_lowercase();
    if let Some(excluded) = first_contained(&location, &criteria.exclude_locations) {
        return Relevance::ExcludedLocation(excluded.to_string());
    }

    let headline = record.headline.to_lowercase();
    let summary = record.summary.to_lowercase();
    if let Some(format) = criteria
        .preferred_formats
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .find(|f| {
            let needle = f.to_lowercase();
            headline.contains(&needle) || summary.contains(&needle)
        })
    {
        return Relevance::PreferredFormat(format.to_string());
    }

    // Absence of a format keyword is not disqualifying
    Relevance::NoFormatSignal
}

/// Pure relevance predicate used by the pipeline
#[inline]
pub fn is_relevant(record: &DetailRecord, criteria: &SearchCriteria) -> bool {
    assess(record, criteria).is_accepted()
}

fn first_contained<'a>(haystack: &str, needles: &'a [String]) -> Option<&'a str> {
    needles
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .find(|n| haystack.contains(&n.to_lowercase()))
}

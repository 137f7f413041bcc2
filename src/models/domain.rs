use serde::{Deserialize, Serialize};
use validator::Validate;

/// Immutable search configuration for one run
///
/// The three dimension lists are ordered; enumeration order follows them.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchCriteria {
    #[validate(length(min = 1, message = "at least one role title is required"))]
    #[serde(default = "default_titles")]
    pub titles: Vec<String>,
    #[validate(length(min = 1, message = "at least one industry is required"))]
    #[serde(default = "default_industries")]
    pub industries: Vec<String>,
    #[validate(length(min = 1, message = "at least one location is required"))]
    #[serde(default = "default_locations")]
    pub locations: Vec<String>,
    /// Case-insensitive substrings; a location containing any of them is rejected
    #[serde(default = "default_exclude_locations")]
    pub exclude_locations: Vec<String>,
    /// Case-insensitive keywords looked up in headline and summary
    #[serde(default = "default_preferred_formats")]
    pub preferred_formats: Vec<String>,
    /// Monthly, EUR. Carried through to run metadata only.
    #[serde(default = "default_min_compensation")]
    pub min_compensation: u32,
}

impl SearchCriteria {
    /// Number of dimensions the search space will yield
    pub fn dimension_count(&self) -> usize {
        self.titles.len() * self.industries.len() * self.locations.len()
    }
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            titles: default_titles(),
            industries: default_industries(),
            locations: default_locations(),
            exclude_locations: default_exclude_locations(),
            preferred_formats: default_preferred_formats(),
            min_compensation: default_min_compensation(),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_titles() -> Vec<String> {
    strings(&[
        "Head of Growth",
        "VP of Business Development",
        "Revenue Strategist",
        "Growth Strategist",
        "VP of Affiliate Marketing",
        "COO",
    ])
}

fn default_industries() -> Vec<String> {
    strings(&[
        "SaaS",
        "Digital Platforms",
        "Subscription",
        "Ecommerce",
        "Performance Marketing",
    ])
}

fn default_locations() -> Vec<String> {
    strings(&["Porto", "Lisbon", "Portugal", "Remote", "Europe"])
}

fn default_exclude_locations() -> Vec<String> {
    strings(&["Russia", "Russian Federation"])
}

fn default_preferred_formats() -> Vec<String> {
    strings(&["hybrid", "remote"])
}

fn default_min_compensation() -> u32 { 8200 }

/// One (title, industry, location) combination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchDimension {
    pub title: String,
    pub industry: String,
    pub location: String,
}

impl SearchDimension {
    pub fn new(
        title: impl Into<String>,
        industry: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            industry: industry.into(),
            location: location.into(),
        }
    }

    /// Search keywords: title and industry joined by a single space
    pub fn keywords(&self) -> String {
        format!("{} {}", self.title, self.industry)
    }
}

/// Lightweight search result reference, consumed immediately for enrichment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(alias = "username", default)]
    pub identifier: String,
    #[serde(rename = "displayName", alias = "fullName", default)]
    pub display_name: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "startDate", default)]
    pub start_date: String,
    #[serde(rename = "endDate", default)]
    pub end_date: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field: String,
    #[serde(rename = "startDate", default)]
    pub start_date: String,
    #[serde(rename = "endDate", default)]
    pub end_date: String,
}

/// Enriched record for one identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    #[serde(rename = "firstName", default)]
    pub first_name: String,
    #[serde(rename = "lastName", default)]
    pub last_name: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Vec<String>,
}

impl DetailRecord {
    /// A record with no populated field at all, as returned for failed fetches
    pub fn is_empty(&self) -> bool {
        *self == DetailRecord::default()
    }
}

/// A detail record that passed relevance filtering, with the dimension that found it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub title: String,
    pub industry: String,
    pub location: String,
    pub detail: DetailRecord,
}

impl MatchRecord {
    pub fn new(dimension: &SearchDimension, detail: DetailRecord) -> Self {
        Self {
            title: dimension.title.clone(),
            industry: dimension.industry.clone(),
            location: dimension.location.clone(),
            detail,
        }
    }
}

/// Counters accumulated while the run progresses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    pub dimensions_total: usize,
    pub dimensions_searched: usize,
    pub dimensions_failed: usize,
    pub hits_seen: usize,
    pub hits_skipped: usize,
    pub details_failed: usize,
    pub matches: usize,
}

/// Aggregate output of one run, persisted once at finalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub min_compensation: u32,
    pub totals: RunTotals,
    pub interrupted: bool,
    pub matches: Vec<MatchRecord>,
}

impl RunResult {
    pub fn new(started_at: chrono::DateTime<chrono::Utc>, criteria: &SearchCriteria) -> Self {
        Self {
            started_at,
            min_compensation: criteria.min_compensation,
            totals: RunTotals {
                dimensions_total: criteria.dimension_count(),
                ..RunTotals::default()
            },
            interrupted: false,
            matches: Vec::new(),
        }
    }

    /// Append an accepted record; records are never removed afterwards
    pub fn push(&mut self, record: MatchRecord) {
        self.matches.push(record);
        self.totals.matches = self.matches.len();
    }
}

/// One line of the append-only run log
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub timestamp: chrono::NaiveDateTime,
    pub message: String,
}

impl LogEntry {
    /// Stamp a message with the current local time
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            timestamp: chrono::Local::now().naive_local(),
            message: message.into(),
        }
    }

    /// `[YYYY-MM-DD HH:MM:SS] message`
    pub fn render(&self) -> String {
        format!("[{}] {}", self.timestamp.format("%Y-%m-%d %H:%M:%S"), self.message)
    }
}

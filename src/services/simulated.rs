use crate::models::{DetailRecord, DetailResult, Education, Experience, SearchHit, SearchResultPage};
use crate::services::{EnrichmentClient, SearchClient};
use async_trait::async_trait;

const DEFAULT_LOCATION: &str = "Porto, Portugal";
const HITS_PER_PAGE: usize = 5;

/// Deterministic stand-in for the directory API
///
/// Every search returns the same five sample people (their location echoes
/// the query) and every detail fetch returns the same sample record. Useful
/// for dry runs without credentials.
#[derive(Debug, Clone, Default)]
pub struct SimulatedDirectory;

impl SimulatedDirectory {
    pub fn new() -> Self {
        Self
    }

    fn sample_detail() -> DetailRecord {
        DetailRecord {
            first_name: "Sample".to_string(),
            last_name: "Person".to_string(),
            headline: "VP of Business Development at Tech Company".to_string(),
            location: DEFAULT_LOCATION.to_string(),
            summary: "Experienced business development professional with expertise in SaaS \
                      and digital platforms."
                .to_string(),
            experience: vec![Experience {
                title: "VP of Business Development".to_string(),
                company: "Tech Company".to_string(),
                location: DEFAULT_LOCATION.to_string(),
                description: "Leading business development initiatives for a SaaS platform."
                    .to_string(),
                start_date: "2020-01".to_string(),
                end_date: "Present".to_string(),
            }],
            education: vec![Education {
                school: "Sample University".to_string(),
                degree: "MBA".to_string(),
                field: "Business Administration".to_string(),
                start_date: "2015".to_string(),
                end_date: "2017".to_string(),
            }],
            skills: vec![
                "Business Development".to_string(),
                "SaaS".to_string(),
                "Strategic Partnerships".to_string(),
            ],
        }
    }
}

#[async_trait]
impl SearchClient for SimulatedDirectory {
    async fn search(&self, keywords: &str, location: &str, offset: u64) -> SearchResultPage {
        tracing::debug!("Simulated search: {} / {} / {}", keywords, location, offset);

        // A single page; anything past it is empty
        if offset > 0 {
            return SearchResultPage::ok(Vec::new(), HITS_PER_PAGE as u64);
        }

        let location = if location.is_empty() { DEFAULT_LOCATION } else { location };
        let hits = (1..=HITS_PER_PAGE)
            .map(|i| SearchHit {
                identifier: format!("sample-person-{}", i),
                display_name: format!("Sample Person {}", i),
                location: location.to_string(),
            })
            .collect();

        SearchResultPage::ok(hits, HITS_PER_PAGE as u64)
    }
}

#[async_trait]
impl EnrichmentClient for SimulatedDirectory {
    async fn get_details(&self, identifier: &str) -> DetailResult {
        tracing::debug!("Simulated detail fetch: {}", identifier);
        DetailResult::ok(Self::sample_detail())
    }
}

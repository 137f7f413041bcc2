use crate::config::Settings;
use crate::core::filters::{assess, Relevance};
use crate::core::search_space::SearchSpace;
use crate::core::throttle::{CallKind, RateLimiter};
use crate::models::{LogEntry, MatchRecord, RunResult, SearchCriteria, SearchDimension, SearchHit};
use crate::services::{EnrichmentClient, ResultStore, SearchClient, StoreError};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use validator::Validate;

/// Conditions that end a run abnormally
///
/// Search and detail failures never show up here; they are logged and the
/// affected dimension or hit is skipped.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid search criteria: {0}")]
    Configuration(#[from] validator::ValidationErrors),

    #[error("Failed to persist run output: {0}")]
    Persistence(#[from] StoreError),
}

/// Drives one batch run: enumerate, search, enrich, filter, persist
///
/// # Pipeline Stages
/// 1. Enumerate dimensions in row-major order
/// 2. Search each dimension (throttled as a search call)
/// 3. Enrich every hit with an identifier (throttled as an enrichment call)
/// 4. Keep records that pass the relevance filter
/// 5. Persist the accumulated matches once, at the end
///
/// Everything runs on one task, strictly in sequence.
pub struct Orchestrator {
    criteria: SearchCriteria,
    search: Arc<dyn SearchClient>,
    enrichment: Arc<dyn EnrichmentClient>,
    limiter: Arc<RateLimiter>,
    store: ResultStore,
    max_pages: u32,
    stop: Arc<AtomicBool>,
}

impl Orchestrator {
    pub fn new(
        criteria: SearchCriteria,
        search: Arc<dyn SearchClient>,
        enrichment: Arc<dyn EnrichmentClient>,
        store: ResultStore,
    ) -> Self {
        Self {
            criteria,
            search,
            enrichment,
            limiter: Arc::new(RateLimiter::new(
                std::time::Duration::from_secs(2),
                std::time::Duration::from_secs(1),
            )),
            store,
            max_pages: 1,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Wire an orchestrator from loaded settings and the chosen clients
    pub fn from_settings(
        settings: &Settings,
        search: Arc<dyn SearchClient>,
        enrichment: Arc<dyn EnrichmentClient>,
    ) -> Self {
        let store = ResultStore::new(&settings.output.results_file, &settings.output.log_file);
        let limiter = RateLimiter::new(
            settings.throttle.search_interval(),
            settings.throttle.enrichment_interval(),
        );

        Self::new(settings.criteria.clone(), search, enrichment, store)
            .with_rate_limiter(Arc::new(limiter))
            .with_max_pages(settings.search.max_pages)
    }

    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    /// Follow pagination up to this many pages per dimension (at least one)
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Share a flag that, once set, stops the run before the next dimension
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    /// Execute the whole run and persist its result
    ///
    /// Returns the result that was written. Only invalid criteria or a
    /// failure to write the log or the results file produce an error.
    pub async fn run(&self) -> Result<RunResult, PipelineError> {
        self.criteria.validate()?;

        let mut result = RunResult::new(chrono::Utc::now(), &self.criteria);
        let space = SearchSpace::from_criteria(&self.criteria);

        self.note(format!(
            "Starting search run over {} dimensions ({} titles x {} industries x {} locations)",
            space.len(),
            self.criteria.titles.len(),
            self.criteria.industries.len(),
            self.criteria.locations.len()
        ))
        .await?;

        for dimension in space.iter() {
            if self.stop.load(Ordering::SeqCst) {
                result.interrupted = true;
                self.note(format!(
                    "Run interrupted after {} of {} dimensions",
                    result.totals.dimensions_searched, result.totals.dimensions_total
                ))
                .await?;
                break;
            }

            self.process_dimension(&dimension, &mut result).await?;
        }

        self.finalize(&result).await?;
        Ok(result)
    }

    async fn process_dimension(
        &self,
        dimension: &SearchDimension,
        result: &mut RunResult,
    ) -> Result<(), PipelineError> {
        let keywords = dimension.keywords();
        result.totals.dimensions_searched += 1;

        let mut offset: u64 = 0;
        for page_number in 0..self.max_pages {
            self.note(format!(
                "Searching with keywords: {}, location: {}, start: {}",
                keywords, dimension.location, offset
            ))
            .await?;

            let page = self
                .limiter
                .call(CallKind::Search, self.search.search(&keywords, &dimension.location, offset))
                .await;

            if !page.success {
                if page_number == 0 {
                    result.totals.dimensions_failed += 1;
                }
                self.note(format!(
                    "Search failed for '{}' in '{}': {}",
                    keywords,
                    dimension.location,
                    page.message.as_deref().unwrap_or("Unknown error")
                ))
                .await?;
                break;
            }

            self.note(format!("Found {} results (total: {})", page.hits.len(), page.total))
                .await?;

            let fetched = page.hits.len() as u64;
            for hit in page.hits {
                self.process_hit(dimension, hit, result).await?;
            }

            offset += fetched;
            if fetched == 0 || offset >= page.total {
                break;
            }
        }

        Ok(())
    }

    async fn process_hit(
        &self,
        dimension: &SearchDimension,
        hit: SearchHit,
        result: &mut RunResult,
    ) -> Result<(), PipelineError> {
        let identifier = hit.identifier.trim();
        if identifier.is_empty() {
            result.totals.hits_skipped += 1;
            tracing::debug!("Skipping hit without identifier: {:?}", hit.display_name);
            return Ok(());
        }
        result.totals.hits_seen += 1;

        self.note(format!("Getting details for: {}", identifier)).await?;

        let details = self
            .limiter
            .call(CallKind::Enrichment, self.enrichment.get_details(identifier))
            .await;

        if !details.success {
            result.totals.details_failed += 1;
            self.note(format!(
                "Detail fetch failed for {}: {}",
                identifier,
                details.message.as_deref().unwrap_or("Unknown error")
            ))
            .await?;
            return Ok(());
        }

        match assess(&details.detail, &self.criteria) {
            Relevance::Empty => {
                result.totals.hits_skipped += 1;
                tracing::debug!("Empty detail record for {}, skipping", identifier);
            }
            Relevance::ExcludedLocation(excluded) => {
                tracing::debug!(
                    "Excluding {} in location '{}' (matches '{}')",
                    identifier,
                    details.detail.location,
                    excluded
                );
            }
            relevance => {
                if let Relevance::PreferredFormat(format) = &relevance {
                    tracing::debug!("{} matches preferred format: {}", identifier, format);
                }
                result.push(MatchRecord::new(dimension, details.detail));
                self.note(format!("Added relevant profile: {}", identifier)).await?;
            }
        }

        Ok(())
    }

    async fn finalize(&self, result: &RunResult) -> Result<(), PipelineError> {
        self.note(format!(
            "Search complete. Found {} relevant profiles \
             ({} dimensions searched, {} failed, {} detail fetches failed)",
            result.totals.matches,
            result.totals.dimensions_searched,
            result.totals.dimensions_failed,
            result.totals.details_failed
        ))
        .await?;

        if let Err(e) = self.store.write_results(result).await {
            tracing::error!("Error saving results: {}", e);
            return Err(e.into());
        }

        self.note(format!("Results saved to {}", self.store.results_path().display()))
            .await
    }

    /// Record a pipeline event in both the tracing output and the run log
    async fn note(&self, message: String) -> Result<(), PipelineError> {
        tracing::info!("{}", message);
        self.store.append_log(&LogEntry::now(message)).await?;
        Ok(())
    }
}

/// Relay interrupt signals to a run's stop flag
///
/// The first signal sets `stop`, so the run ends after the current dimension
/// and still persists what it has. Returns `true` once a second signal
/// arrives and the caller should abort outright; `false` if the signal
/// source fails.
pub async fn watch_interrupts<F, Fut>(stop: &AtomicBool, mut next_signal: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = next_signal().await {
        tracing::warn!("Unable to listen for interrupts: {}", e);
        return false;
    }
    tracing::warn!("Interrupt received, stopping after the current dimension");
    stop.store(true, Ordering::SeqCst);

    match next_signal().await {
        Ok(()) => {
            tracing::error!("Second interrupt received, aborting without saving");
            true
        }
        Err(e) => {
            tracing::warn!("Unable to listen for interrupts: {}", e);
            false
        }
    }
}

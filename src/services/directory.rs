use crate::config::DirectorySettings;
use crate::models::{
    ApiEnvelope, DetailRecord, DetailRequest, DetailResult, SearchData, SearchRequest,
    SearchResultPage,
};
use crate::services::{EnrichmentClient, SearchClient};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when talking to the directory API
///
/// These never leave the client: the trait methods fold them into
/// unsuccessful outcomes carrying the error text.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// HTTP client for the people directory search and profile endpoints
pub struct DirectoryClient {
    base_url: String,
    api_key: Option<String>,
    search_path: String,
    detail_path: String,
    client: Client,
}

impl DirectoryClient {
    /// Create a new directory client
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        search_path: String,
        detail_path: String,
        timeout: Duration,
    ) -> Result<Self, DirectoryError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            search_path,
            detail_path,
            client,
        })
    }

    pub fn from_settings(settings: &DirectorySettings) -> Result<Self, DirectoryError> {
        Self::new(
            settings.base_url.clone(),
            settings.api_key.clone().filter(|k| !k.is_empty()),
            settings.search_path.clone(),
            settings.detail_path.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    fn endpoint(&self, path: &str, query: &str) -> String {
        format!(
            "{}/{}?{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/'),
            query
        )
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str, what: &str) -> Result<T, DirectoryError> {
        let mut request = self.client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::debug!("{} failed: {} - {}", what, status, body);
            return Err(DirectoryError::ApiError(format!("{} failed: {}", what, status)));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            DirectoryError::InvalidResponse(format!("Failed to parse {} response: {}", what, e))
        })
    }

    /// Run one search page request, surfacing every failure as an error
    pub async fn try_search(
        &self,
        request: &SearchRequest,
    ) -> Result<SearchResultPage, DirectoryError> {
        let url = self.endpoint(&self.search_path, &request.query_string());
        tracing::debug!("Searching directory: {}", url);

        let envelope: ApiEnvelope<SearchData> = self.fetch(&url, "Search").await?;
        Ok(SearchResultPage::from(envelope))
    }

    /// Fetch one detail record, surfacing every failure as an error
    pub async fn try_get_details(
        &self,
        request: &DetailRequest,
    ) -> Result<DetailResult, DirectoryError> {
        let url = self.endpoint(&self.detail_path, &request.query_string());
        tracing::debug!("Fetching details for: {}", request.identifier);

        let envelope: ApiEnvelope<DetailRecord> = self.fetch(&url, "Detail fetch").await?;
        Ok(DetailResult::from(envelope))
    }
}

#[async_trait]
impl SearchClient for DirectoryClient {
    async fn search(&self, keywords: &str, location: &str, offset: u64) -> SearchResultPage {
        let request = SearchRequest::new(keywords, location, offset);
        match self.try_search(&request).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(
                    "Error searching directory for '{}' in '{}': {}",
                    keywords,
                    location,
                    e
                );
                SearchResultPage::failed(e.to_string())
            }
        }
    }
}

#[async_trait]
impl EnrichmentClient for DirectoryClient {
    async fn get_details(&self, identifier: &str) -> DetailResult {
        let request = DetailRequest::new(identifier);
        match self.try_get_details(&request).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Error getting details for {}: {}", identifier, e);
                DetailResult::failed(e.to_string())
            }
        }
    }
}

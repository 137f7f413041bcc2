use serde::{Deserialize, Serialize};
use crate::models::domain::{DetailRecord, SearchHit};

/// Envelope shared by both directory endpoints: `{success, message?, data}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: T,
}

/// `data` payload of a search response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchData {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub items: Vec<SearchHit>,
}

/// One page of search results, or a failed search with a diagnostic
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultPage {
    pub success: bool,
    pub message: Option<String>,
    pub hits: Vec<SearchHit>,
    pub total: u64,
}

impl SearchResultPage {
    pub fn ok(hits: Vec<SearchHit>, total: u64) -> Self {
        Self {
            success: true,
            message: None,
            hits,
            total,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            hits: Vec::new(),
            total: 0,
        }
    }
}

impl From<ApiEnvelope<SearchData>> for SearchResultPage {
    fn from(envelope: ApiEnvelope<SearchData>) -> Self {
        if envelope.success {
            Self {
                success: true,
                message: envelope.message,
                hits: envelope.data.items,
                total: envelope.data.total,
            }
        } else {
            Self::failed(envelope.message.unwrap_or_else(|| "Unknown error".to_string()))
        }
    }
}

/// Detail fetch outcome; failed fetches carry an empty record
#[derive(Debug, Clone, PartialEq)]
pub struct DetailResult {
    pub success: bool,
    pub message: Option<String>,
    pub detail: DetailRecord,
}

impl DetailResult {
    pub fn ok(detail: DetailRecord) -> Self {
        Self {
            success: true,
            message: None,
            detail,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            detail: DetailRecord::default(),
        }
    }
}

impl From<ApiEnvelope<DetailRecord>> for DetailResult {
    fn from(envelope: ApiEnvelope<DetailRecord>) -> Self {
        if envelope.success {
            Self {
                success: true,
                message: envelope.message,
                detail: envelope.data,
            }
        } else {
            Self::failed(envelope.message.unwrap_or_else(|| "Unknown error".to_string()))
        }
    }
}

/// Individual smoke-test outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationChecks {
    pub api_access: bool,
    pub profile_retrieval: bool,
    pub filtering_logic: bool,
}

impl ValidationChecks {
    pub fn all_passed(&self) -> bool {
        self.api_access && self.profile_retrieval && self.filtering_logic
    }
}

/// Document written by the validation harness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub timestamp: chrono::DateTime<chrono::Local>,
    pub tests: ValidationChecks,
    pub overall_success: bool,
}

// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    DetailRecord, Education, Experience, LogEntry, MatchRecord, RunResult, RunTotals,
    SearchCriteria, SearchDimension, SearchHit,
};
pub use requests::{SearchRequest, DetailRequest};
pub use responses::{
    ApiEnvelope, DetailResult, SearchData, SearchResultPage, ValidationChecks, ValidationReport,
};

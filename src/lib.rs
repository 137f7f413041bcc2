//! Role Scout - batch sweep of a people directory
//!
//! Enumerates every role title x industry x location combination, searches the
//! directory for each, enriches the hits with detail records, keeps the ones
//! that pass the relevance filter and writes them out as one JSON document,
//! alongside an append-only run log.

pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    is_relevant, Orchestrator, PipelineError, RateLimiter, SearchSpace, ValidationHarness,
};
pub use crate::models::{SearchCriteria, SearchDimension, DetailRecord, MatchRecord, RunResult};

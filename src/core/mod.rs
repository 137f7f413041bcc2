// Core pipeline exports
pub mod filters;
pub mod pipeline;
pub mod search_space;
pub mod throttle;
pub mod validation;

pub use filters::{assess, is_relevant, Relevance};
pub use pipeline::{watch_interrupts, Orchestrator, PipelineError};
pub use search_space::SearchSpace;
pub use throttle::{CallKind, RateLimiter, ThrottlePermit};
pub use validation::ValidationHarness;

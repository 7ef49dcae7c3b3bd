//! Completion provider abstractions for Parley.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `RetryPolicy`: bounded retry-with-backoff for transient failures

pub mod box_provider;
pub mod provider;
pub mod retry;

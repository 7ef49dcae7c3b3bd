//! Shared domain types for Parley.
//!
//! This crate contains the core domain types used across the service:
//! transcript messages, provider turns, configuration, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod llm;
pub mod message;

//! Infrastructure layer for Parley.
//!
//! Contains implementations of the traits defined in `parley-core`:
//! the JSON file transcript store and the OpenAI-compatible completion
//! client, plus configuration loading and data directory resolution.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod store;

//! HTTP/REST API layer for Parley.
//!
//! Axum-based JSON API under `/api/`, with CORS, request tracing, and
//! optional static serving of the web client.

pub mod error;
pub mod handlers;
pub mod router;

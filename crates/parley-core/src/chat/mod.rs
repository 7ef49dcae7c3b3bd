//! Conversation turn orchestration.
//!
//! `ChatService` runs the validate / persist / complete / fallback / persist
//! cycle for each user message. `MessageIdGenerator` hands out collision-free
//! message ids.

pub mod id;
pub mod service;

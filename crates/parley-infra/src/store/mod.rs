//! Transcript store implementations.

pub mod json_file;

pub use json_file::JsonFileTranscriptStore;

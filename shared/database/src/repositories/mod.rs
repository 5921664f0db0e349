//! Repository module for database CRUD operations
//!
//! Typed repositories over the analysis history tables.

pub mod analysis;
pub mod chat;

pub use analysis::{AnalysisRepository, SUMMARY_PREVIEW_CHARS};
pub use chat::ChatRepository;

//! Report content processing
//!
//! Turns uploaded office documents into data the analysis pipeline can use:
//!
//! - [`ContentExtractor`]: format dispatch plus per-format readers
//! - [`Normalizer`]: numeric coercion and synthesized columns
//! - [`Segmenter`]: header-based sectioning of free text
//! - [`summarize`]: per-column descriptive statistics

pub mod classify;
pub mod extractor;
pub mod fallback;
pub mod format;
pub mod heuristics;
pub mod normalizer;
pub mod office;
pub mod pdf;
pub mod segmenter;
pub mod spreadsheet;
pub mod statistics;
pub mod summary;

pub use extractor::{ensure_not_empty, ContentExtractor, ExtractionError, ExtractionResult};
pub use format::DocumentFormat;
pub use heuristics::HeuristicConfig;
pub use normalizer::{normalize, Normalizer};
pub use segmenter::{segment, Segmenter};
pub use statistics::summarize;
pub use summary::{document_summary, table_summary};

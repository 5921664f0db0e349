//! # Insight Domain Models
//!
//! Shared types for the report analysis system.
//!
//! ## Key Models
//!
//! - **CellValue / Row / Table**: tabular content extracted from spreadsheets,
//!   Word tables and PDF text
//! - **TextDocument / Section**: free text with derived counts and sections
//! - **ColumnStatistics**: descriptive statistics for one numeric column
//! - **ChartKind / ChartSuggestion / RenderedChart**: chart proposals and images
//! - **DataAnalysis / ChartAnalysis / TextAnalysis**: LLM analysis payloads
//! - **NewAnalysis / AnalysisRecord / HistoryEntry**: persisted history

pub mod analysis;
pub mod cell;
pub mod chart;
pub mod document;
pub mod history;
pub mod statistics;
pub mod table;


pub use analysis::*;
pub use cell::*;
pub use chart::*;
pub use document::*;
pub use history::*;
pub use statistics::*;
pub use table::*;

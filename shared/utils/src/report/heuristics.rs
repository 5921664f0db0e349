//! Tunable thresholds for document classification.
//!
//! The defaults are empirically tuned values; changing them changes which
//! uploads are treated as tables and which as prose.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    /// Word documents with fewer non-empty lines are always prose.
    pub word_min_lines: usize,
    /// A line needs this many TAB-separated fields to count as tabular.
    pub word_min_tab_fields: usize,
    /// Digit-run to token ratio under which text is considered prose.
    pub numeric_ratio_threshold: f64,
    pub presentation_min_chars: usize,
    pub presentation_min_words: usize,
    pub pdf_min_words: usize,
    pub pdf_max_rows: usize,
    pub fallback_max_numbers: usize,
    pub fallback_max_lines: usize,
    pub header_max_chars: usize,
    pub short_header_max_chars: usize,
    pub score_min: i64,
    pub score_max: i64,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        Self {
            word_min_lines: 5,
            word_min_tab_fields: 3,
            numeric_ratio_threshold: 0.3,
            presentation_min_chars: 100,
            presentation_min_words: 50,
            pdf_min_words: 100,
            pdf_max_rows: 50,
            fallback_max_numbers: 15,
            fallback_max_lines: 10,
            header_max_chars: 100,
            short_header_max_chars: 50,
            score_min: 50,
            score_max: 100,
        }
    }
}

impl HeuristicConfig {
    /// Score bounds in ascending order, whatever the configured order.
    pub fn score_bounds(&self) -> (i64, i64) {
        if self.score_min <= self.score_max {
            (self.score_min, self.score_max)
        } else {
            (self.score_max, self.score_min)
        }
    }
}

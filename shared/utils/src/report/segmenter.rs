//! Splits free text into titled sections using header-line heuristics.

use std::sync::LazyLock;

use insight_models::Section;
use regex::Regex;

use super::heuristics::HeuristicConfig;

pub const INTRODUCTION_TITLE: &str = "Introduction";

static ENUMERATOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9]+\.|[0-9]+\)|[A-Za-z0-9_]\.)").expect("hardcoded regex pattern")
});

pub struct Segmenter {
    header_max_chars: usize,
    short_header_max_chars: usize,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(&HeuristicConfig::default())
    }
}

impl Segmenter {
    pub fn new(config: &HeuristicConfig) -> Self {
        Self {
            header_max_chars: config.header_max_chars,
            short_header_max_chars: config.short_header_max_chars,
        }
    }

    pub fn segment(&self, text: &str) -> Vec<Section> {
        let lines: Vec<&str> = text.split('\n').collect();
        let mut sections = Vec::new();
        let mut current = Section::new(INTRODUCTION_TITLE, "");

        for (index, line) in lines.iter().enumerate() {
            let next = lines.get(index + 1).copied();
            if self.is_header(line, next) {
                let finished = std::mem::replace(&mut current, Section::new(line.trim(), ""));
                if !finished.content.trim().is_empty() {
                    sections.push(finished);
                }
            } else {
                current.content.push_str(line);
                current.content.push('\n');
            }
        }

        if !current.content.trim().is_empty() {
            sections.push(current);
        }
        sections
    }

    /// Whether `line` opens a new section, given the line after it.
    pub fn is_header(&self, line: &str, next: Option<&str>) -> bool {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return false;
        }
        let length = trimmed.chars().count();

        let shouting = length < self.header_max_chars && trimmed == trimmed.to_uppercase();
        let enumerated = ENUMERATOR_RE.is_match(trimmed);
        let before_blank = length < self.short_header_max_chars
            && next.map(|n| n.trim().is_empty()).unwrap_or(false);

        shouting || enumerated || before_blank
    }
}

pub fn segment(text: &str) -> Vec<Section> {
    Segmenter::default().segment(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_and_uppercase_headers() {
        let text = "1. OVERVIEW\n\
            The quarter went well overall and every team delivered on plan.\n\
            Revenue grew in every region, led by strong demand in the north.\n\
            \n\
            DETAILS\n\
            More text follows here in detail.";
        let sections = segment(text);

        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["1. OVERVIEW", "DETAILS"]);
        assert_eq!(
            sections[0].content,
            "The quarter went well overall and every team delivered on plan.\n\
             Revenue grew in every region, led by strong demand in the north.\n\n"
        );
        assert_eq!(sections[1].content, "More text follows here in detail.\n");
    }

    #[test]
    fn test_introduction_is_seeded() {
        let sections = segment("just some lowercase prose without headers");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, INTRODUCTION_TITLE);
    }

    #[test]
    fn test_empty_introduction_is_dropped() {
        let sections = segment("SUMMARY\nbody text goes here");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "SUMMARY");
    }

    #[test]
    fn test_header_rules() {
        let segmenter = Segmenter::default();
        assert!(segmenter.is_header("a. lower case item", None));
        assert!(segmenter.is_header("3) third point of many", None));
        assert!(segmenter.is_header("Short title", Some("   ")));
        assert!(!segmenter.is_header("Short title", Some("body")));
        assert!(!segmenter.is_header("Short title", None));
        assert!(!segmenter.is_header("   ", Some("")));
        assert!(!segmenter.is_header(&"A".repeat(100), None));
    }

    #[test]
    fn test_header_with_empty_body_is_skipped() {
        let sections = segment("FIRST\nSECOND\ncontent");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "SECOND");
    }
}

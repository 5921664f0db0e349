use serde::{Deserialize, Serialize};

use crate::table::Table;

/// A titled span of a text document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: String,
}

impl Section {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }

    pub fn word_count(&self) -> usize {
        self.content.split_whitespace().count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMetadata {
    pub word_count: usize,
    pub paragraph_count: usize,
    pub character_count: usize,
    pub sections: Vec<Section>,
}

/// Free-form text extracted from an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextDocument {
    pub content: String,
    pub metadata: TextMetadata,
}

impl TextDocument {
    /// Build a document; counts are always derived from `content`.
    pub fn new(content: impl Into<String>, sections: Vec<Section>) -> Self {
        let content = content.into();
        let metadata = TextMetadata {
            word_count: content.split_whitespace().count(),
            paragraph_count: content.lines().filter(|l| !l.trim().is_empty()).count(),
            character_count: content.chars().count(),
            sections,
        };
        Self { content, metadata }
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// What the content extractor produced for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum ExtractedContent {
    Table(Table),
    Text(TextDocument),
}

impl ExtractedContent {
    /// True when there is nothing downstream stages can work with.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Table(table) => table.is_empty(),
            Self::Text(doc) => doc.is_empty(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Table(_) => "table",
            Self::Text(_) => "text",
        }
    }
}

//! Content extraction for uploaded reports.
//!
//! Dispatches on the file extension (then the declared media type) and turns
//! the document into either a normalized table or a [`TextDocument`].
//! Presentation and PDF readers degrade to fallback tables instead of failing.

use insight_models::{ExtractedContent, Section, TextDocument};
use rand::Rng;
use thiserror::Error;

use super::classify::{is_prose, pdf_table, word_table};
use super::fallback::{placeholder, simple_data};
use super::format::DocumentFormat;
use super::heuristics::HeuristicConfig;
use super::normalizer::Normalizer;
use super::segmenter::Segmenter;
use super::{office, pdf, spreadsheet};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("Unsupported file type (extension: {extension:?}, media type: {media_type:?})")]
    UnsupportedFormat {
        extension: Option<String>,
        media_type: Option<String>,
    },

    #[error("Failed to read {format} document: {message}")]
    ExtractionFailure { format: DocumentFormat, message: String },

    #[error("No data could be extracted")]
    EmptyResult,
}

pub type ExtractionResult<T> = Result<T, ExtractionError>;

pub struct ContentExtractor {
    config: HeuristicConfig,
    normalizer: Normalizer,
    segmenter: Segmenter,
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new(HeuristicConfig::default())
    }
}

impl ContentExtractor {
    pub fn new(config: HeuristicConfig) -> Self {
        Self {
            normalizer: Normalizer::new(config.clone()),
            segmenter: Segmenter::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &HeuristicConfig {
        &self.config
    }

    pub fn extract(
        &self,
        bytes: &[u8],
        media_type: Option<&str>,
        extension: Option<&str>,
    ) -> ExtractionResult<ExtractedContent> {
        self.extract_with_rng(bytes, media_type, extension, &mut rand::thread_rng())
    }

    pub fn extract_with_rng<R: Rng>(
        &self,
        bytes: &[u8],
        media_type: Option<&str>,
        extension: Option<&str>,
        rng: &mut R,
    ) -> ExtractionResult<ExtractedContent> {
        let format = DocumentFormat::detect(extension, media_type).ok_or_else(|| {
            ExtractionError::UnsupportedFormat {
                extension: extension.map(str::to_string),
                media_type: media_type.map(str::to_string),
            }
        })?;

        tracing::debug!(%format, size = bytes.len(), "Extracting document content");

        let content = match format {
            DocumentFormat::Spreadsheet => {
                let table = spreadsheet::read_first_sheet(bytes)
                    .map_err(|e| failure(format, e))?;
                ExtractedContent::Table(self.normalizer.normalize_with_rng(table, rng))
            }
            DocumentFormat::Word => {
                let text = office::word_text(bytes).map_err(|e| failure(format, e))?;
                self.classify_word(text, rng)
            }
            DocumentFormat::Presentation => self.extract_presentation(bytes, rng),
            DocumentFormat::Pdf => self.extract_pdf(bytes, rng),
        };

        tracing::debug!(%format, kind = content.kind(), "Document classified");
        Ok(content)
    }

    /// Classify Word text as a table or a text document.
    pub fn classify_word<R: Rng>(&self, text: String, rng: &mut R) -> ExtractedContent {
        match word_table(&text, &self.config) {
            Some(table) => ExtractedContent::Table(self.normalizer.normalize_with_rng(table, rng)),
            None => self.text_document(text),
        }
    }

    fn extract_presentation<R: Rng>(&self, bytes: &[u8], rng: &mut R) -> ExtractedContent {
        let slides = match office::presentation_slides(bytes) {
            Ok(slides) => slides,
            Err(e) => {
                let message = format!("{:#}", e);
                tracing::warn!(error = %message, "Presentation unreadable, using placeholder data");
                return ExtractedContent::Table(placeholder("Slide"));
            }
        };
        self.classify_slides(slides, rng)
    }

    /// Classify the text runs of a presentation, one entry per slide.
    pub fn classify_slides<R: Rng>(&self, slides: Vec<String>, rng: &mut R) -> ExtractedContent {
        let text: String = slides.iter().map(|s| format!("{}\n", s)).collect();

        if text.trim().chars().count() <= self.config.presentation_min_chars {
            return ExtractedContent::Table(placeholder("Slide"));
        }

        if is_prose(&text, self.config.presentation_min_words, &self.config) {
            let sections = slides
                .into_iter()
                .enumerate()
                .map(|(idx, content)| Section::new(format!("Slide {}", idx + 1), content))
                .collect();
            return ExtractedContent::Text(TextDocument::new(text, sections));
        }

        let table = simple_data(&text, &self.config);
        ExtractedContent::Table(self.normalizer.normalize_with_rng(table, rng))
    }

    fn extract_pdf<R: Rng>(&self, bytes: &[u8], rng: &mut R) -> ExtractedContent {
        match pdf::pdf_text(bytes) {
            Ok(text) => self.classify_pdf_text(text, rng),
            Err(e) => {
                let message = format!("{:#}", e);
                tracing::warn!(error = %message, "PDF unreadable, using placeholder data");
                ExtractedContent::Table(placeholder("Page"))
            }
        }
    }

    /// Classify extracted PDF text as prose, a recovered table or fallback data.
    pub fn classify_pdf_text<R: Rng>(&self, text: String, rng: &mut R) -> ExtractedContent {
        if is_prose(&text, self.config.pdf_min_words, &self.config) {
            return self.text_document(text);
        }

        let table = pdf_table(&text, &self.config);
        if !table.is_empty() {
            let normalized = self.normalizer.normalize_with_rng(table, rng);
            if !normalized.is_empty() {
                return ExtractedContent::Table(normalized);
            }
        }

        let table = simple_data(&text, &self.config);
        ExtractedContent::Table(self.normalizer.normalize_with_rng(table, rng))
    }

    fn text_document(&self, text: String) -> ExtractedContent {
        let sections = self.segmenter.segment(&text);
        ExtractedContent::Text(TextDocument::new(text, sections))
    }
}

fn failure(format: DocumentFormat, error: anyhow::Error) -> ExtractionError {
    ExtractionError::ExtractionFailure {
        format,
        message: format!("{:#}", error),
    }
}

/// Reject content callers should treat as "no data".
pub fn ensure_not_empty(content: ExtractedContent) -> ExtractionResult<ExtractedContent> {
    if content.is_empty() {
        Err(ExtractionError::EmptyResult)
    } else {
        Ok(content)
    }
}

use std::fmt;

/// Document families the extractor can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Spreadsheet,
    Word,
    Presentation,
    Pdf,
}

impl DocumentFormat {
    /// Detect format from a file extension, with or without the leading dot.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let ext = extension.trim().trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "xlsx" | "xls" => Some(Self::Spreadsheet),
            "docx" | "doc" => Some(Self::Word),
            "pptx" | "ppt" => Some(Self::Presentation),
            "pdf" => Some(Self::Pdf),
            _ => None,
        }
    }

    /// Detect format from a declared media type by keyword.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let media_type = media_type.to_lowercase();
        if media_type.contains("spreadsheet") || media_type.contains("excel") {
            Some(Self::Spreadsheet)
        } else if media_type.contains("word") {
            Some(Self::Word)
        } else if media_type.contains("presentation") || media_type.contains("powerpoint") {
            Some(Self::Presentation)
        } else if media_type.contains("pdf") {
            Some(Self::Pdf)
        } else {
            None
        }
    }

    /// Extension wins; the media type is only consulted when the extension
    /// is missing or unknown.
    pub fn detect(extension: Option<&str>, media_type: Option<&str>) -> Option<Self> {
        extension
            .and_then(Self::from_extension)
            .or_else(|| media_type.and_then(Self::from_media_type))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Spreadsheet => "spreadsheet",
            Self::Word => "word",
            Self::Presentation => "presentation",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

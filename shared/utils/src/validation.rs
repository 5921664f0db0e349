use crate::config::UploadConfig;
use crate::error::{InsightError, InsightResult};
use validator::{Validate, ValidationErrors};

pub fn validate_model<T: Validate>(model: &T) -> InsightResult<()> {
    match model.validate() {
        Ok(()) => Ok(()),
        Err(errors) => {
            let error_messages = format_validation_errors(&errors);
            Err(InsightError::validation("model", error_messages))
        }
    }
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = match (&error.message, error.code.as_ref()) {
                (Some(message), _) => format!("{}: {}", field, message),
                (None, "length") => format!("Length validation failed for field '{}'", field),
                (None, "range") => format!("Value out of range for field '{}'", field),
                (None, "required") => format!("Field '{}' is required", field),
                (None, code) => format!("Validation failed for field '{}': {}", field, code),
            };
            messages.push(message);
        }
    }

    messages.sort();
    messages.join(", ")
}

/// Lower-cased extension of `file_name` including the leading dot.
pub fn file_extension(file_name: &str) -> Option<String> {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}

/// Size limit plus the media type / extension allow-list. Either an allowed
/// media type or an allowed extension is enough.
pub fn validate_upload(
    file_name: &str,
    media_type: Option<&str>,
    size: usize,
    config: &UploadConfig,
) -> InsightResult<()> {
    if size > config.max_file_size {
        return Err(InsightError::PayloadTooLarge {
            size,
            limit: config.max_file_size,
        });
    }

    let media_allowed = media_type
        .map(|mt| {
            let essence = mt.split(';').next().unwrap_or(mt).trim().to_lowercase();
            config.allowed_media_types.iter().any(|allowed| *allowed == essence)
        })
        .unwrap_or(false);

    let extension = file_extension(file_name);
    let extension_allowed = extension
        .as_deref()
        .map(|ext| config.allowed_extensions.iter().any(|allowed| allowed == ext))
        .unwrap_or(false);

    if media_allowed || extension_allowed {
        Ok(())
    } else {
        Err(InsightError::unsupported_format(format!(
            "'{}' is not an accepted file. Allowed types: {}",
            file_name,
            config.allowed_extensions.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("Report.XLSX"), Some(".xlsx".to_string()));
        assert_eq!(file_extension("archive.tar.gz"), Some(".gz".to_string()));
        assert_eq!(file_extension("README"), None);
    }

    #[test]
    fn test_upload_allow_list() {
        let config = UploadConfig::default();

        assert!(validate_upload("deck.pptx", Some("application/zip"), 10, &config).is_ok());
        assert!(validate_upload("blob", Some("application/pdf"), 10, &config).is_ok());
        assert!(validate_upload("data.bin", Some("application/octet-stream"), 10, &config).is_ok());

        let err = validate_upload("notes.txt", Some("text/plain"), 10, &config).unwrap_err();
        assert_eq!(err.http_status_code(), 415);
    }

    #[test]
    fn test_upload_size_limit() {
        let config = UploadConfig {
            max_file_size: 100,
            ..Default::default()
        };
        let err = validate_upload("a.pdf", Some("application/pdf"), 101, &config).unwrap_err();
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
    }
}

pub mod config;
pub mod error;
pub mod logging;
pub mod report;
pub mod validation;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use validation::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ExtractionError;

    #[test]
    fn test_config_loading() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_error_handling() {
        let error = InsightError::validation("test_field", "test message");
        assert_eq!(error.error_code(), "VALIDATION_ERROR");
        assert_eq!(error.http_status_code(), 400);
    }

    #[test]
    fn test_extraction_errors_map_to_statuses() {
        let unsupported: InsightError = ExtractionError::UnsupportedFormat {
            extension: Some(".txt".to_string()),
            media_type: None,
        }
        .into();
        assert_eq!(unsupported.http_status_code(), 415);

        let empty: InsightError = ExtractionError::EmptyResult.into();
        assert_eq!(empty.http_status_code(), 422);
        assert_eq!(empty.error_code(), "EMPTY_RESULT");
    }
}

use std::panic::{self, AssertUnwindSafe};

use anyhow::{anyhow, Context, Result};

/// Full text of a PDF document.
///
/// The PDF library can panic on malformed input; panics are reported as
/// errors.
pub fn pdf_text(bytes: &[u8]) -> Result<String> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));

    match outcome {
        Ok(result) => result.context("Failed to extract PDF text"),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(anyhow!("PDF reader panicked: {}", message))
        }
    }
}

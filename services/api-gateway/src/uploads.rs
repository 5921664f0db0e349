use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::Rng;
use tracing::warn;

use insight_utils::file_extension;

/// `{millis}-{suffix}{ext}`, keeping the original extension.
pub fn stored_file_name(original: &str, now_millis: i64, suffix: u32) -> String {
    format!(
        "{}-{}{}",
        now_millis,
        suffix,
        file_extension(original).unwrap_or_default()
    )
}

pub async fn save_upload(dir: &str, original: &str, bytes: &[u8]) -> Result<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create upload directory {}", dir))?;

    let suffix = rand::thread_rng().gen_range(0..1_000_000_000);
    let name = stored_file_name(original, chrono::Utc::now().timestamp_millis(), suffix);
    let path = Path::new(dir).join(name);

    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("Failed to store upload at {}", path.display()))?;

    Ok(path)
}

/// Delete a stored upload. A file that is already gone is not an error.
pub async fn remove_upload(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove stored upload"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_file_name() {
        assert_eq!(stored_file_name("Q3 Sales.XLSX", 1700000000000, 42), "1700000000000-42.xlsx");
        assert_eq!(stored_file_name("notes", 5, 7), "5-7");
    }

    #[tokio::test]
    async fn test_save_upload_creates_directory() {
        let dir = std::env::temp_dir().join(format!("insight-uploads-{}", uuid::Uuid::new_v4()));
        let dir_str = dir.to_string_lossy().to_string();

        let path = save_upload(&dir_str, "report.pdf", b"%PDF-1.4").await.unwrap();
        assert!(path.starts_with(&dir));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("pdf"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF-1.4");

        remove_upload(&path).await;
        assert!(!path.exists());
        // second removal is a no-op
        remove_upload(&path).await;

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }
}

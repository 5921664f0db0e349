use anyhow::{Context, Result};
use sqlx::PgPool;

pub async fn run_postgres_migrations(pool: &PgPool) -> Result<()> {
    tracing::info!("Running PostgreSQL migrations");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS analysis_history (
            id BIGSERIAL PRIMARY KEY,
            file_name TEXT NOT NULL,
            file_path TEXT NOT NULL,
            file_size BIGINT NOT NULL DEFAULT 0,
            upload_date TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            analysis_type VARCHAR(16) NOT NULL DEFAULT 'data',
            analysis_summary TEXT,
            analysis_trends TEXT,
            analysis_insights TEXT,
            analysis_recommendations TEXT,
            full_analysis TEXT,
            charts_count INTEGER NOT NULL DEFAULT 0,
            text_analysis JSONB
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create analysis_history table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS charts (
            id BIGSERIAL PRIMARY KEY,
            analysis_id BIGINT NOT NULL REFERENCES analysis_history(id) ON DELETE CASCADE,
            chart_type VARCHAR(32) NOT NULL,
            chart_title TEXT,
            chart_image TEXT,
            chart_description TEXT
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create charts table")?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS chat_history (
            id BIGSERIAL PRIMARY KEY,
            analysis_id BIGINT NOT NULL REFERENCES analysis_history(id) ON DELETE CASCADE,
            message TEXT NOT NULL,
            response TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create chat_history table")?;

    // Create indexes for performance
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_analysis_history_upload_date ON analysis_history(upload_date DESC)",
        "CREATE INDEX IF NOT EXISTS idx_charts_analysis_id ON charts(analysis_id)",
        "CREATE INDEX IF NOT EXISTS idx_chat_history_analysis_id ON chat_history(analysis_id, created_at)",
    ] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to run migration: {}", statement))?;
    }

    tracing::info!("PostgreSQL migrations completed");
    Ok(())
}

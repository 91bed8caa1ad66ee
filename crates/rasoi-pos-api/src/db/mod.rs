//! Database access layer for PostgreSQL.
//!
//! Each sub-module implements one of the pipeline's store traits over a
//! `PgPool`.

pub mod catalog;
pub mod conversations;
pub mod sales;

pub use catalog::PgCatalog;
pub use conversations::PgConversationLog;
pub use sales::PgSalesLedger;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use rasoi_assistant::AssistantError;

/// Connect to PostgreSQL and run migrations.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    tracing::info!("running database migrations");
    sqlx::raw_sql(include_str!("../../migrations/001_catalog.sql"))
        .execute(&pool)
        .await?;
    sqlx::raw_sql(include_str!("../../migrations/002_orders.sql"))
        .execute(&pool)
        .await?;
    sqlx::raw_sql(include_str!("../../migrations/003_billing.sql"))
        .execute(&pool)
        .await?;
    sqlx::raw_sql(include_str!("../../migrations/004_assistant.sql"))
        .execute(&pool)
        .await?;
    tracing::info!("migrations complete");

    Ok(pool)
}

/// Map a sqlx failure into the pipeline's storage error.
pub(crate) fn storage_err(e: sqlx::Error) -> AssistantError {
    AssistantError::Storage(e.to_string())
}

/// `"burger"` → `"%burger%"`, with LIKE metacharacters escaped so user
/// phrases can't widen the match.
pub(crate) fn like_pattern(target: &str) -> String {
    let escaped = target
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern("burger"), "%burger%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}

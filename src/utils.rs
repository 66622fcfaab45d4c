use chrono::{DateTime, FixedOffset, Local};
use sqlx::SqlitePool;

pub(crate) async fn is_table_exists(
    pool: &SqlitePool,
    table_name: &str,
) -> Result<bool, sqlx::Error> {
    Ok(
        sqlx::query("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
            .bind(table_name)
            .fetch_optional(pool)
            .await?
            .is_some(),
    )
}

pub(crate) fn get_now() -> DateTime<FixedOffset> {
    let now = Local::now();
    now.with_timezone(now.offset())
}

/// Joins `href` onto `page_url` verbatim. The gateway serves OCR text at a
/// path relative to the page, so no normalization happens here.
pub(crate) fn concat_url(page_url: &str, href: &str) -> String {
    format!("{}{}", page_url, href)
}

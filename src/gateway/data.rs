use crate::{utils, CrawlerError, SubpageRecord, Table, HEADER};
use csv::{Terminator, Writer, WriterBuilder};
use sqlx::{sqlite::SqliteConnectOptions, Row, SqlitePool};
use std::{
    fs::File,
    path::{Path, PathBuf},
};

/// CSV file output. Every row is flushed as soon as it is written, so an
/// interrupted run still leaves a readable file.
pub struct CsvTable {
    name: String,
    path: PathBuf,
    writer: Option<Writer<File>>,
    rows: u32,
}

impl CsvTable {
    pub fn new<P: AsRef<Path>>(path: P) -> CsvTable {
        CsvTable {
            name: path.as_ref().display().to_string(),
            path: path.as_ref().to_path_buf(),
            writer: None,
            rows: 0,
        }
    }
}

#[async_trait::async_trait]
impl Table for CsvTable {
    fn get_name(&self) -> &str {
        self.name.as_str()
    }

    async fn create(&mut self) -> Result<(), CrawlerError> {
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .terminator(Terminator::CRLF)
            .from_path(&self.path)?;
        writer.write_record(HEADER)?;
        writer.flush()?;
        tracing::debug!("Create table {}", self.name);

        self.writer = Some(writer);
        self.rows = 0;
        Ok(())
    }

    async fn insert(&mut self, record: &SubpageRecord) -> Result<(), CrawlerError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| CrawlerError::TableNotCreated(self.name.clone()))?;
        writer.serialize(record)?;
        writer.flush()?;
        self.rows += 1;
        Ok(())
    }

    async fn count(&self) -> Result<u32, CrawlerError> {
        Ok(self.rows)
    }
}

/// SQLite output, one row per subpage in a single table.
pub struct SqliteTable {
    name: String,
    pool: SqlitePool,
}

impl SqliteTable {
    pub async fn new<P: AsRef<Path>>(path: P, name: &str) -> Result<SqliteTable, CrawlerError> {
        let opt = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(opt).await?;
        Ok(SqliteTable {
            name: name.to_string(),
            pool,
        })
    }
}

#[async_trait::async_trait]
impl Table for SqliteTable {
    fn get_name(&self) -> &str {
        self.name.as_str()
    }

    async fn create(&mut self) -> Result<(), CrawlerError> {
        if utils::is_table_exists(&self.pool, &self.name).await? {
            tracing::debug!("Drop table {}", self.name);
            let query = format!("DROP TABLE {}", self.name);
            sqlx::query(&query).execute(&self.pool).await?;
        }

        tracing::debug!("Create table {}", self.name);
        let query = format!(
            r#"
                CREATE TABLE {} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    subpage_url TEXT NOT NULL,
                    publication_date TEXT NOT NULL,
                    volume TEXT NOT NULL,
                    title TEXT NOT NULL,
                    ocr_text TEXT,
                    created_at DATETIME
                )
            "#,
            self.name
        );
        sqlx::query(&query).execute(&self.pool).await?;
        Ok(())
    }

    async fn insert(&mut self, record: &SubpageRecord) -> Result<(), CrawlerError> {
        let query = format!(
            r#"INSERT INTO {} (
                subpage_url,
                publication_date,
                volume,
                title,
                ocr_text,
                created_at) VALUES (?, ?, ?, ?, ?, ?)"#,
            self.name
        );
        sqlx::query(&query)
            .bind(record.url.as_str())
            .bind(record.publication_date.as_str())
            .bind(record.volume.as_str())
            .bind(record.title.as_str())
            .bind(record.ocr_text.as_deref())
            .bind(utils::get_now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count(&self) -> Result<u32, CrawlerError> {
        let query = format!("SELECT COUNT(*) FROM {}", self.name);
        Ok(sqlx::query(&query)
            .fetch_one(&self.pool)
            .await?
            .try_get(0)?)
    }
}

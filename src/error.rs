#[derive(Debug, thiserror::Error)]
pub enum CrawlerError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::error::Error),
    #[error("Request failed: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Invalid url: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("Missing meta tag {0}")]
    MissingMetadata(&'static str),
    #[error("Missing subpage container")]
    MissingSubpages,
    #[error("OCR link has no href")]
    MissingOcrLink,
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Logging setup failed: {0}")]
    LoggingError(#[from] tracing_subscriber::util::TryInitError),
    #[error("Table {0} was not created before insert")]
    TableNotCreated(String),
}

impl CrawlerError {
    /// Errors coming from the output table. These abort the run instead of
    /// being skipped with the page that triggered them.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            CrawlerError::DatabaseError(_)
                | CrawlerError::CsvError(_)
                | CrawlerError::IoError(_)
                | CrawlerError::TableNotCreated(_)
        )
    }
}

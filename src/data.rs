use crate::CrawlerError;
use serde::Serialize;
use std::fmt;

/// Column header of the output table, in row order.
pub const HEADER: [&str; 5] = [
    "Subpage URL",
    "Publication Date",
    "Volume",
    "Title",
    "OCR Text",
];

/// One output row. Only the OCR text may be absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubpageRecord {
    pub url: String,
    pub publication_date: String,
    pub volume: String,
    pub title: String,
    pub ocr_text: Option<String>,
}

impl fmt::Display for SubpageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Url             : {}", self.url)?;
        writeln!(f, "Published Date  : {}", self.publication_date)?;
        writeln!(f, "Volume          : {}", self.volume)?;
        writeln!(f, "Title           : {}", self.title)?;
        if let Some(text) = self.ocr_text.as_ref() {
            writeln!(f, "OCR Text        : {} chars", text.chars().count())?;
        } else {
            writeln!(f, "OCR Text        : None")?;
        }
        Ok(())
    }
}

/// Citation fields taken from the `citation_*` meta tags of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    pub publication_date: String,
    pub volume: String,
    pub title: String,
}

/// Where a page keeps its OCR text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrSource {
    /// Relative link to a plain-text OCR resource.
    Link(String),
    /// Text embedded in the page, already trimmed.
    Inline(String),
    Missing,
}

/// Article links found on one page of search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPage {
    pub articles: Vec<String>,
    pub total: Option<u32>,
}

#[async_trait::async_trait]
pub trait Table {
    fn get_name(&self) -> &str;

    /// Discards previous content and writes the header.
    async fn create(&mut self) -> Result<(), CrawlerError>;
    async fn insert(&mut self, record: &SubpageRecord) -> Result<(), CrawlerError>;
    async fn count(&self) -> Result<u32, CrawlerError>;
}

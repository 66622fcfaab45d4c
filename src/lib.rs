use scraper::Html;
use tracing::{debug, error, info, warn};
use url::Url;

pub mod config;
pub mod gateway;
pub mod logging;

mod data;
mod error;
mod http;
mod progress;
mod utils;

pub use config::{CrawlConfig, LogConfig, OutputConfig, OutputFormat};
pub use data::{Citation, OcrSource, SearchPage, SubpageRecord, Table, HEADER};
pub use error::CrawlerError;
pub use http::HttpSession;
pub use progress::{ConsoleProgress, Progress, PROGRESS_INTERVAL};

/// Site-specific extraction. Implementations only look at parsed documents,
/// fetching is left to the caller.
pub trait Crawler {
    fn extract_total(&self, doc: &Html) -> Option<u32>;
    fn extract_articles(&self, doc: &Html) -> Vec<String>;
    /// `None` when the page has no subpage container at all.
    fn extract_subpages(&self, doc: &Html) -> Option<Vec<String>>;
    fn extract_citation(&self, doc: &Html) -> Result<Citation, CrawlerError>;
    /// Fails when the page has an OCR link without a target.
    fn extract_ocr(&self, doc: &Html) -> Result<OcrSource, CrawlerError>;
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub search_pages: u32,
    pub articles: u32,
    pub subpages: u32,
    pub rows: u32,
    pub errors: u32,
}

async fn resolve_ocr(
    session: &HttpSession,
    page_url: &str,
    source: OcrSource,
) -> Result<Option<String>, CrawlerError> {
    match source {
        OcrSource::Link(href) => {
            let ocr_url = utils::concat_url(page_url, &href);
            match session.get_text(&ocr_url).await {
                Ok(text) => Ok(Some(text.trim().to_string())),
                // The page itself was fine, keep its metadata.
                Err(CrawlerError::RequestError(e)) if e.is_status() => {
                    warn!("No OCR text at {}: {}", ocr_url, e);
                    Ok(None)
                }
                Err(e) => Err(e),
            }
        }
        OcrSource::Inline(text) => Ok(Some(text)),
        OcrSource::Missing => Ok(None),
    }
}

/// Fetches `page_url` and returns its OCR text, following the OCR link when
/// the page has one. A page without OCR text gives `Ok(None)`.
pub async fn extract_ocr_text<C: Crawler>(
    crawler: &C,
    session: &HttpSession,
    page_url: &str,
) -> Result<Option<String>, CrawlerError> {
    let html = session.get_text(page_url).await?;
    let source = {
        let doc = Html::parse_document(&html);
        crawler.extract_ocr(&doc)?
    };
    resolve_ocr(session, page_url, source).await
}

async fn build_record<C: Crawler>(
    crawler: &C,
    session: &HttpSession,
    subpage_url: &str,
) -> Result<SubpageRecord, CrawlerError> {
    let html = session.get_text(subpage_url).await?;
    let (citation, source) = {
        let doc = Html::parse_document(&html);
        (crawler.extract_citation(&doc)?, crawler.extract_ocr(&doc)?)
    };
    let ocr_text = resolve_ocr(session, subpage_url, source).await?;

    Ok(SubpageRecord {
        url: subpage_url.to_string(),
        publication_date: citation.publication_date,
        volume: citation.volume,
        title: citation.title,
        ocr_text,
    })
}

/// Builds the row for one subpage. Failures are logged against the subpage
/// url and yield `None`.
pub async fn get_metadata_and_ocr<C: Crawler>(
    crawler: &C,
    session: &HttpSession,
    subpage_url: &str,
) -> Option<SubpageRecord> {
    match build_record(crawler, session, subpage_url).await {
        Ok(record) => Some(record),
        Err(e) => {
            error!("Error processing {}: {}", subpage_url, e);
            None
        }
    }
}

/// Fetches an article page and returns its subpage urls, resolved against
/// `base_url`, in document order.
pub async fn resolve_subpages<C: Crawler>(
    crawler: &C,
    session: &HttpSession,
    base_url: &Url,
    article_url: &str,
) -> Result<Vec<String>, CrawlerError> {
    let html = session.get_text(article_url).await?;
    let links = {
        let doc = Html::parse_document(&html);
        crawler.extract_subpages(&doc)
    }
    .ok_or(CrawlerError::MissingSubpages)?;

    let subpages = links
        .iter()
        .map(|link| base_url.join(link).map(String::from))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(subpages)
}

pub async fn fetch_search_page<C: Crawler>(
    crawler: &C,
    session: &HttpSession,
    base_url: &Url,
    search_url: &str,
) -> Result<SearchPage, CrawlerError> {
    let html = session.get_text(search_url).await?;
    let (links, total) = {
        let doc = Html::parse_document(&html);
        (crawler.extract_articles(&doc), crawler.extract_total(&doc))
    };

    let articles = links
        .iter()
        .map(|link| base_url.join(link).map(String::from))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SearchPage { articles, total })
}

/// Walks every search page, article and subpage in order, streaming one row
/// per subpage into the table.
pub struct Scrapper<C, T> {
    crawler: C,
    session: HttpSession,
    table: T,
    config: CrawlConfig,
    progress: Box<dyn Progress + Send>,
}

impl<C, T> Scrapper<C, T>
where
    C: Crawler,
    T: Table + Send + Sync,
{
    pub fn new(crawler: C, session: HttpSession, table: T, config: CrawlConfig) -> Self {
        Scrapper {
            crawler,
            session,
            table,
            config,
            progress: Box::new(ConsoleProgress),
        }
    }

    pub fn with_progress<P: Progress + Send + 'static>(mut self, progress: P) -> Self {
        self.progress = Box::new(progress);
        self
    }

    pub fn table(&self) -> &T {
        &self.table
    }

    pub async fn run(&mut self) -> Result<RunStats, CrawlerError> {
        self.table.create().await?;

        info!("Script started");
        self.progress.started();

        let mut stats = RunStats::default();
        let mut total = self.config.total_articles;
        let mut offset = 0;

        while total.map_or(true, |total| offset < total) {
            let search_url = self.config.search_url(offset);
            info!("Processing articles from {}", search_url);

            if let Err(e) = self
                .process_search_page(&search_url, offset, &mut total, &mut stats)
                .await
            {
                if e.is_fatal() {
                    return Err(e);
                }
                stats.errors += 1;
                error!("Error processing search page {}: {}", search_url, e);
            }

            if total.is_none() {
                warn!("Number of articles unknown after {}, stopping", search_url);
                total = Some(offset + self.config.page_size);
            }

            self.session.pause().await;
            offset += self.config.page_size;
        }

        let rows = self.table.count().await?;
        info!(
            "Wrote {} rows to {} from {} subpages of {} articles ({} errors)",
            rows,
            self.table.get_name(),
            stats.subpages,
            stats.articles,
            stats.errors
        );
        self.progress.finished();
        info!("Script finished");
        Ok(stats)
    }

    async fn process_search_page(
        &mut self,
        search_url: &str,
        offset: u32,
        total: &mut Option<u32>,
        stats: &mut RunStats,
    ) -> Result<(), CrawlerError> {
        let page =
            fetch_search_page(&self.crawler, &self.session, &self.config.base_url, search_url)
                .await?;
        stats.search_pages += 1;
        debug!("Found {} articles in {}", page.articles.len(), search_url);

        let total = match (*total, page.total) {
            (Some(known), _) => known,
            (None, Some(discovered)) => {
                info!("Collection has {} articles", discovered);
                *total = Some(discovered);
                discovered
            }
            (None, None) => {
                let fallback = offset + self.config.page_size;
                *total = Some(fallback);
                warn!("No result count in {}, stopping after this page", search_url);
                fallback
            }
        };

        // Counts articles of this page only.
        let mut current_iteration = 0;
        for article_url in &page.articles {
            current_iteration += 1;
            stats.articles += 1;

            if let Err(e) = self.process_article(article_url, stats).await {
                if e.is_fatal() {
                    return Err(e);
                }
                stats.errors += 1;
                error!("Error processing article {}: {}", article_url, e);
            }

            if current_iteration % PROGRESS_INTERVAL == 0 {
                self.progress.articles_processed(current_iteration, total);
            }
        }
        Ok(())
    }

    async fn process_article(
        &mut self,
        article_url: &str,
        stats: &mut RunStats,
    ) -> Result<(), CrawlerError> {
        let subpages = resolve_subpages(
            &self.crawler,
            &self.session,
            &self.config.base_url,
            article_url,
        )
        .await?;
        debug!("Found {} subpages in {}", subpages.len(), article_url);

        for subpage_url in &subpages {
            stats.subpages += 1;
            match get_metadata_and_ocr(&self.crawler, &self.session, subpage_url).await {
                Some(record) => {
                    debug!("Insert row\n{}", record);
                    self.table.insert(&record).await?;
                    stats.rows += 1;
                }
                None => stats.errors += 1,
            }
            self.session.pause().await;
        }
        Ok(())
    }
}

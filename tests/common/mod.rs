//! Helpers shared by the pipeline tests: a mock gateway, log capture and a
//! progress recorder.

use gateway_ocr_crawler::{CrawlConfig, HttpSession, Progress};
use mockito::{Mock, Server, ServerGuard};
use std::io;
use std::sync::{Arc, Mutex};
use tokio::time::Duration;
use tracing::subscriber::DefaultGuard;
use url::Url;

pub const SEARCH_PATH: &str = "/search/{}/";

pub async fn setup_mock_server() -> ServerGuard {
    Server::new_async().await
}

pub async fn create_html_mock(server: &mut ServerGuard, path: &str, html: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create_async()
        .await
}

pub async fn create_text_mock(server: &mut ServerGuard, path: &str, text: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/plain; charset=utf-8")
        .with_body(text)
        .create_async()
        .await
}

#[allow(dead_code)]
pub async fn create_error_mock(server: &mut ServerGuard, path: &str, status: usize) -> Mock {
    server
        .mock("GET", path)
        .with_status(status)
        .create_async()
        .await
}

pub fn crawl_config(server: &ServerGuard, total_articles: Option<u32>, page_size: u32) -> CrawlConfig {
    CrawlConfig {
        base_url: Url::parse(&server.url()).unwrap(),
        search_url: format!("{}{}", server.url(), SEARCH_PATH),
        total_articles,
        page_size,
        delay: Duration::ZERO,
        user_agent: "gateway-ocr-crawler-tests".to_string(),
    }
}

pub fn session() -> HttpSession {
    HttpSession::new("gateway-ocr-crawler-tests", Duration::ZERO).unwrap()
}

pub fn search_html(article_paths: &[&str], total: Option<u32>) -> String {
    let articles = article_paths
        .iter()
        .map(|p| format!(r#"<article><h3><a href="{}">Issue</a></h3></article>"#, p))
        .collect::<String>();
    let count = total
        .map(|t| format!("<p>Showing 1 - {} of {} results</p>", article_paths.len(), t))
        .unwrap_or_default();
    format!("<html><body>{}<section>{}</section></body></html>", count, articles)
}

pub fn article_html(subpage_paths: &[&str]) -> String {
    let links = subpage_paths
        .iter()
        .map(|p| format!(r#"<li><a href="{}">Page</a></li>"#, p))
        .collect::<String>();
    format!(
        r#"<html><body><div id="more-pages"><ul>{}</ul></div></body></html>"#,
        links
    )
}

pub fn subpage_html(date: &str, volume: &str, title: &str, body: &str) -> String {
    format!(
        r#"<html><head>
<meta name="citation_publication_date" content="{}">
<meta name="citation_volume" content="{}">
<meta name="citation_title" content="{}">
</head><body>{}</body></html>"#,
        date, volume, title, body
    )
}

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn lines_containing(&self, needle: &str) -> usize {
        self.contents().lines().filter(|l| l.contains(needle)).count()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes this thread's events into a buffer until the guard drops.
pub fn capture_logs() -> (LogBuffer, DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}

#[derive(Clone, Default)]
pub struct ProgressRecorder(Arc<Mutex<Vec<(u32, u32)>>>);

impl ProgressRecorder {
    pub fn marks(&self) -> Vec<(u32, u32)> {
        self.0.lock().unwrap().clone()
    }
}

impl Progress for ProgressRecorder {
    fn articles_processed(&mut self, current: u32, total: u32) {
        self.0.lock().unwrap().push((current, total));
    }
}

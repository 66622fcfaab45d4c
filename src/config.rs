//! Command-line and environment configuration.
//!
//! The defaults target the Cherokee Advocate collection on the Oklahoma
//! Historical Society gateway.

use crate::CrawlerError;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tokio::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://gateway.okhistory.org";
pub const DEFAULT_SEARCH_URL: &str = "https://gateway.okhistory.org/search/?q=cherokee+advocate&t=fulltext&fq=untl_collection%3ACHRAD&start={}";
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const OFFSET_PLACEHOLDER: &str = "{}";
const QUIET_DEPENDENCIES: &str = "html5ever=error,selectors=error,hyper=warn,reqwest=info,sqlx=warn";

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Root of the gateway, used to resolve relative article and subpage links
    #[arg(long, env = "GATEWAY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Search results URL, `{}` is replaced with the start offset
    #[arg(long, env = "GATEWAY_SEARCH_URL", default_value = DEFAULT_SEARCH_URL)]
    pub search_url: String,

    /// Number of articles to walk. Read from the first search page when unset
    #[arg(long, env = "GATEWAY_TOTAL_ARTICLES")]
    pub total_articles: Option<u32>,

    /// Articles per search results page
    #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: u32,

    /// Delay after every subpage and every search page, in milliseconds
    #[arg(long, default_value_t = 3000)]
    pub delay_ms: u64,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Output file, truncated on start
    #[arg(short, long, default_value = "cherokee-advocate.csv")]
    pub output: PathBuf,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Log file, appended to
    #[arg(long, default_value = "scraping.log")]
    pub log_file: PathBuf,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Sqlite,
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub base_url: Url,
    pub search_url: String,
    pub total_articles: Option<u32>,
    pub page_size: u32,
    pub delay: Duration,
    pub user_agent: String,
}

impl CrawlConfig {
    pub fn search_url(&self, offset: u32) -> String {
        self.search_url
            .replace(OFFSET_PLACEHOLDER, &offset.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub file: PathBuf,
    pub level: String,
}

impl LogConfig {
    pub fn directives(&self) -> String {
        format!("{},{}", self.level, QUIET_DEPENDENCIES)
    }
}

#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
}

impl Cli {
    pub fn into_parts(self) -> Result<(CrawlConfig, LogConfig, OutputConfig), CrawlerError> {
        if !self.search_url.contains(OFFSET_PLACEHOLDER) {
            return Err(CrawlerError::InvalidConfig(format!(
                "search url {} has no {} placeholder",
                self.search_url, OFFSET_PLACEHOLDER
            )));
        }

        let crawl = CrawlConfig {
            base_url: Url::parse(&self.base_url)?,
            search_url: self.search_url,
            total_articles: self.total_articles,
            page_size: self.page_size,
            delay: Duration::from_millis(self.delay_ms),
            user_agent: self.user_agent,
        };
        let log = LogConfig {
            file: self.log_file,
            level: self.log_level,
        };
        let output = OutputConfig {
            path: self.output,
            format: self.format,
        };
        Ok((crawl, log, output))
    }
}

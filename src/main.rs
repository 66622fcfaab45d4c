use clap::Parser;
use gateway_ocr_crawler::config::Cli;
use gateway_ocr_crawler::gateway::{CsvTable, GatewayCrawler, SqliteTable, SQLITE_TABLE};
use gateway_ocr_crawler::{logging, CrawlerError, HttpSession, OutputFormat, RunStats, Scrapper};
use tracing::error;

async fn run_scrapper(cli: Cli) -> Result<RunStats, CrawlerError> {
    let (crawl, log, output) = cli.into_parts()?;
    logging::init_tracing(&log)?;

    let session = HttpSession::new(&crawl.user_agent, crawl.delay)?;
    let stats = match output.format {
        OutputFormat::Csv => {
            let table = CsvTable::new(&output.path);
            Scrapper::new(GatewayCrawler, session, table, crawl)
                .run()
                .await
        }
        OutputFormat::Sqlite => {
            let table = SqliteTable::new(&output.path, SQLITE_TABLE).await?;
            Scrapper::new(GatewayCrawler, session, table, crawl)
                .run()
                .await
        }
    };

    if let Err(e) = &stats {
        error!("Run aborted: {}", e);
    }
    stats
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_scrapper(Cli::parse()).await?;
    Ok(())
}

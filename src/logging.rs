use crate::{config::LogConfig, CrawlerError};
use std::{fs::OpenOptions, sync::Arc};
use tracing::Subscriber;
use tracing_error::ErrorLayer;
use tracing_subscriber::prelude::*;

/// Builds the file subscriber: plain lines appended to the configured log
/// file, filtered by the configured level.
pub fn subscriber(config: &LogConfig) -> Result<impl Subscriber + Send + Sync, CrawlerError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)?;
    let filter = tracing_subscriber::EnvFilter::try_new(config.directives())
        .map_err(|e| CrawlerError::InvalidConfig(e.to_string()))?;

    Ok(tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false),
        )
        .with(filter)
        .with(ErrorLayer::default()))
}

/// Installs the file subscriber globally.
pub fn init_tracing(config: &LogConfig) -> Result<(), CrawlerError> {
    subscriber(config)?.try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use tracing::{debug, error, info};

    #[test]
    fn log_file_is_appended_with_plain_lines() {
        let dir = TempDir::new().unwrap();
        let config = LogConfig {
            file: dir.path().join("scraping.log"),
            level: "info".to_string(),
        };
        fs::write(&config.file, "earlier run\n").unwrap();

        tracing::subscriber::with_default(subscriber(&config).unwrap(), || {
            info!("Script started");
            debug!("Visit http://localhost/hidden/");
            error!("Error processing http://localhost/a/1/: Missing meta tag citation_volume");
        });

        let written = fs::read_to_string(&config.file).unwrap();
        let lines = written.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "earlier run");
        assert!(lines[1].contains("INFO") && lines[1].ends_with("Script started"));
        assert!(lines[2].contains("ERROR") && lines[2].contains("citation_volume"));
        assert!(!written.contains("hidden"));
        assert!(!written.contains("\x1b["));
    }

    #[test]
    fn bad_level_is_a_config_error() {
        let dir = TempDir::new().unwrap();
        let config = LogConfig {
            file: dir.path().join("scraping.log"),
            level: "reqwest=loud".to_string(),
        };
        assert!(matches!(
            subscriber(&config),
            Err(CrawlerError::InvalidConfig(_))
        ));
    }
}

mod crawler;
mod data;

pub use crawler::GatewayCrawler;
pub use data::{CsvTable, SqliteTable};

/// Table name used for SQLite output.
pub const SQLITE_TABLE: &str = "subpages";

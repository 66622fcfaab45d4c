/// Articles between two progress notifications.
pub const PROGRESS_INTERVAL: u32 = 5;

/// Receives human-facing progress while a run goes on.
pub trait Progress {
    fn started(&mut self) {}

    /// `current` counts articles on the current search page only.
    fn articles_processed(&mut self, current: u32, total: u32);

    fn finished(&mut self) {}
}

/// Prints plain progress lines to stdout.
#[derive(Debug, Default)]
pub struct ConsoleProgress;

impl Progress for ConsoleProgress {
    fn started(&mut self) {
        println!("Scraping started");
    }

    fn articles_processed(&mut self, current: u32, total: u32) {
        println!("Processing {} of {} articles", current, total);
    }

    fn finished(&mut self) {
        println!("Scraping finished");
    }
}

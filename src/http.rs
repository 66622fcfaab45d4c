use crate::CrawlerError;
use reqwest::Client;
use tokio::time::Duration;
use tracing::debug;

/// Shared HTTP client for one run. Every request carries the same
/// `User-Agent`, and cookies and connections are kept between requests.
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: Client,
    delay: Duration,
}

impl HttpSession {
    pub fn new(user_agent: &str, delay: Duration) -> Result<HttpSession, CrawlerError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .cookie_store(true)
            .build()?;
        Ok(HttpSession { client, delay })
    }

    /// Returns the body of `url`. Non-2xx responses are errors.
    pub async fn get_text(&self, url: &str) -> Result<String, CrawlerError> {
        debug!("Visit {}", url);
        let text = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }

    /// Fixed politeness delay between requests.
    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

//! HTTP page scraper

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::html::extract_paragraphs;
use crate::config::ScraperConfig;
use crate::domain::{DomainError, ScrapeError, Scraper};
use crate::infrastructure::http_client::build_client;

/// Scraper performing a single GET per page, without retries
#[derive(Debug, Clone)]
pub struct WebScraper {
    client: reqwest::Client,
}

impl WebScraper {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn from_config(config: &ScraperConfig) -> Result<Self, DomainError> {
        let client = build_client(
            Duration::from_secs(config.timeout_secs),
            Some(&config.user_agent),
        )?;

        Ok(Self::new(client))
    }
}

#[async_trait]
impl Scraper for WebScraper {
    async fn scrape(&self, url: &str) -> Result<String, ScrapeError> {
        debug!(url = %url, "Fetching webpage");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Failed to fetch webpage");
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| ScrapeError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let content = extract_paragraphs(&body);
        debug!(url = %url, chars = content.len(), "Scraped webpage");

        Ok(content)
    }
}

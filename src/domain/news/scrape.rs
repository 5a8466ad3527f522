use async_trait::async_trait;
use thiserror::Error;

/// Failure to fetch a page for scraping
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Failed to fetch webpage: {status}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },
}

impl ScrapeError {
    pub fn url(&self) -> &str {
        match self {
            Self::Status { url, .. } | Self::Request { url, .. } => url,
        }
    }
}

/// Trait for page scrapers returning the visible paragraph text
#[async_trait]
pub trait Scraper: Send + Sync + std::fmt::Debug {
    async fn scrape(&self, url: &str) -> Result<String, ScrapeError>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_names_code() {
        let err = ScrapeError::Status {
            url: "https://example.com".to_string(),
            status: 404,
        };

        assert_eq!(err.to_string(), "Failed to fetch webpage: 404");
        assert_eq!(err.url(), "https://example.com");
    }
}

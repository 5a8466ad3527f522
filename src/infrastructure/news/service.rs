//! Outlet news: search, then scrape each article body

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::news::UNTITLED;
use crate::domain::{DomainError, NewsSearch, OutletArticle, Scraper};
use crate::infrastructure::observability::record_outlet_scrape;

/// Upper bound on articles scraped per request
pub const DEFAULT_MAX_ARTICLES: usize = 5;

/// Fetches recent articles of an outlet with their scraped body text
#[derive(Debug, Clone)]
pub struct OutletNewsService {
    search: Arc<dyn NewsSearch>,
    scraper: Arc<dyn Scraper>,
    max_articles: usize,
}

impl OutletNewsService {
    pub fn new(search: Arc<dyn NewsSearch>, scraper: Arc<dyn Scraper>) -> Self {
        Self {
            search,
            scraper,
            max_articles: DEFAULT_MAX_ARTICLES,
        }
    }

    /// Lower the per-request cap; values outside `1..=5` are clamped
    pub fn with_max_articles(mut self, max_articles: usize) -> Self {
        self.max_articles = max_articles.clamp(1, DEFAULT_MAX_ARTICLES);
        self
    }

    /// Articles for `source_id`, or `None` when there is nothing to return.
    ///
    /// Only the first `max_articles` search results are considered. Results
    /// without a URL and pages that fail to scrape are dropped.
    pub async fn fetch(
        &self,
        source_id: &str,
        query: Option<&str>,
    ) -> Result<Option<Vec<OutletArticle>>, DomainError> {
        if source_id.trim().is_empty() {
            warn!("Source id must be provided");
            return Ok(None);
        }

        let response = self.search.everything(source_id, query).await?;

        if !response.is_ok() {
            warn!(
                source_id = %source_id,
                code = ?response.code,
                error_message = response.message.as_deref().unwrap_or("Unknown error"),
                "Error fetching news"
            );
            return Ok(None);
        }

        if response.articles.is_empty() {
            info!(source_id = %source_id, "No articles found for source");
            return Ok(None);
        }

        let mut articles = Vec::new();

        for article in response.articles.iter().take(self.max_articles) {
            let Some(url) = article.url.as_deref().filter(|u| !u.is_empty()) else {
                debug!(source_id = %source_id, "Skipping article without URL");
                continue;
            };

            match self.scraper.scrape(url).await {
                Ok(content) => {
                    record_outlet_scrape(true);
                    articles.push(OutletArticle {
                        title: article.title.clone().unwrap_or_else(|| UNTITLED.to_string()),
                        content,
                    });
                }
                Err(e) => {
                    record_outlet_scrape(false);
                    warn!(url = %url, error = %e, "Error scraping article content");
                }
            }
        }

        info!(
            source_id = %source_id,
            scraped = articles.len(),
            "Fetched outlet articles"
        );

        Ok(if articles.is_empty() { None } else { Some(articles) })
    }
}

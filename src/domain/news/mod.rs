//! News domain: outlet directory, news-search and scraping seams

mod outlet;
mod scrape;
mod search;

pub use outlet::{NEWS_OUTLETS, Outlet, OutletDirectory};
pub use scrape::{ScrapeError, Scraper};
pub use search::{NewsSearch, STATUS_OK, SearchArticle, SearchResponse};

use serde::{Deserialize, Serialize};

/// Title used when the news-search API omits one
pub const UNTITLED: &str = "No Title";

/// An outlet article with its scraped body text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutletArticle {
    pub title: String,
    pub content: String,
}

#[cfg(test)]
pub mod mock {
    pub use super::scrape::mock::MockScraper;
    pub use super::search::mock::MockNewsSearch;
}

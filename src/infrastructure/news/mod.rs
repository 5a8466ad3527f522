//! News-search client and outlet news fetching

mod newsapi;
mod service;

pub use newsapi::NewsApiClient;
pub use service::{DEFAULT_MAX_ARTICLES, OutletNewsService};

//! Infrastructure layer - External service implementations

pub mod http_client;
pub mod inference;
pub mod logging;
pub mod news;
pub mod observability;
pub mod scraper;
pub mod tracking;

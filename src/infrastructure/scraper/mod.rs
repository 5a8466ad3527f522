//! Web page scraping

mod html;
mod web;

pub use html::extract_paragraphs;
pub use web::WebScraper;

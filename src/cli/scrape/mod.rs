//! Scrape command - prints the paragraph text of one page

use clap::Args;

use crate::config::AppConfig;
use crate::domain::Scraper;
use crate::infrastructure::scraper::WebScraper;

#[derive(Debug, Args)]
pub struct ScrapeArgs {
    /// Page to fetch
    pub url: String,
}

pub async fn run(args: ScrapeArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Scraping needs no profile; fall back to defaults outside a configured environment
    let scraper_config = AppConfig::load()
        .map(|config| config.scraper)
        .unwrap_or_default();

    let scraper = WebScraper::from_config(&scraper_config)?;
    let text = scraper.scrape(&args.url).await?;
    println!("{}", text);

    Ok(())
}

//! Command-line entry points
//!
//! - `serve`: run the HTTP API
//! - `config`: print the merged configuration
//! - `scrape`: print the paragraph text of a page

pub mod config;
pub mod scrape;
pub mod serve;

use clap::{Parser, Subcommand};

/// Political leaning classifier API
#[derive(Parser)]
#[command(name = "political-leaning-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load the models and run the HTTP API
    Serve,

    /// Print the merged configuration as JSON with secrets redacted
    Config,

    /// Fetch a page and print its paragraph text
    Scrape(scrape::ScrapeArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scrape_command() {
        let cli = Cli::try_parse_from(["political-leaning-api", "scrape", "https://example.com"])
            .unwrap();

        match cli.command {
            Command::Scrape(args) => assert_eq!(args.url, "https://example.com"),
            _ => panic!("expected scrape command"),
        }
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Cli::try_parse_from(["political-leaning-api"]).is_err());
    }
}

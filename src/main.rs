use clap::Parser;
use political_leaning_api::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::Config => cli::config::run(),
        Command::Scrape(args) => cli::scrape::run(args).await,
    }
}

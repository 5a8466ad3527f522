//! Config command - prints the merged configuration

use crate::config::AppConfig;

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load()?;
    config.inference.resolve_device();
    println!("{}", serde_json::to_string_pretty(&config.redacted())?);

    Ok(())
}

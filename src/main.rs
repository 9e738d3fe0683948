use tracing::Level;

use crate::config::AppConfig;
use crate::notifier::Notifier;
use crate::rest_client::MirrorFetcher;
use crate::telegram::TelegramBot;

mod config;
mod data;
mod error;
mod leaderboard;
mod notifier;
mod rest_client;
mod snapshot;
mod telegram;
mod utils;
#[cfg(test)]
mod tests;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), anyhow::Error> {
    dotenv::dotenv().ok();

    let config = AppConfig::from_env();
    let level = config
        .as_ref()
        .ok()
        .and_then(|c| c.logging.level.parse::<Level>().ok())
        .unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = config?;
    tracing::info!(
        "Starting movers run: {} spot mirrors, {} futures mirrors, top {}",
        config.exchange.spot_mirrors.len(),
        config.exchange.futures_mirrors.len(),
        config.leaderboard.top_n
    );

    let fetcher = MirrorFetcher::from_config(&config.exchange)?;
    let bot = TelegramBot::new(config.telegram.clone());
    let notifier = Notifier::new(fetcher, bot, config.leaderboard.top_n);
    notifier.run().await?;

    Ok(())
}

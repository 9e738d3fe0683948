use chrono::Utc;
use tracing::{error, info};

use crate::data::{MarketSnapshot, MarketType};
use crate::error::LeaderboardResult;
use crate::leaderboard::{assemble_message, error_message};
use crate::rest_client::{HttpGet, MirrorFetcher};
use crate::snapshot::build_snapshot;
use crate::telegram::{ChatSender, ParseMode};

pub struct Notifier<H: HttpGet, S: ChatSender> {
    pub fetcher: MirrorFetcher<H>,
    pub sender: S,
    pub top_n: usize,
}

impl<H: HttpGet, S: ChatSender> Notifier<H, S> {
    pub fn new(fetcher: MirrorFetcher<H>, sender: S, top_n: usize) -> Self {
        Self { fetcher, sender, top_n }
    }

    async fn collect(&self) -> LeaderboardResult<(MarketSnapshot, MarketSnapshot)> {
        let spot = build_snapshot(&self.fetcher, MarketType::Spot).await?;
        let futures = build_snapshot(&self.fetcher, MarketType::Futures).await?;
        Ok((spot, futures))
    }

    /// One full run: both snapshots, ranking, one chat message. A fetch
    /// failure is reported to the chat and the run ends cleanly; delivery
    /// errors are returned.
    pub async fn run(&self) -> LeaderboardResult<()> {
        let (spot, futures) = match self.collect().await {
            Ok(snapshots) => snapshots,
            Err(e) if e.is_fetch_failure() => {
                error!("Market data fetch failed: {}", e);
                self.sender.send_message(&error_message(&e.to_string()), None).await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let msg = assemble_message(&spot, &futures, self.top_n, Utc::now());
        self.sender.send_message(&msg, Some(ParseMode::Markdown)).await?;
        info!(
            "Leaderboard sent ({} spot rows, {} futures rows)",
            spot.len(),
            futures.len()
        );
        Ok(())
    }
}

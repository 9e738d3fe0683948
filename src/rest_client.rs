use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::USER_AGENT, Client};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ExchangeConfig;
use crate::data::MarketType;
use crate::error::{LeaderboardError, LeaderboardResult};

#[async_trait]
pub trait HttpGet: Send + Sync {
    async fn get_json(&self, url: &str) -> LeaderboardResult<Value>;
}

pub struct BinanceClient {
    pub client: Client,
    pub user_agent: String,
}

impl BinanceClient {
    pub fn new(timeout: Duration, user_agent: &str) -> LeaderboardResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            user_agent: user_agent.to_string(),
        })
    }
}

#[async_trait]
impl HttpGet for BinanceClient {
    async fn get_json(&self, url: &str) -> LeaderboardResult<Value> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LeaderboardError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str::<Value>(&body)?)
    }
}

/// Tries `attempt` on each candidate in order and returns the first `Ok`.
/// Failures are logged and skipped; the error returned after the last
/// candidate carries `path` and the number of candidates tried.
pub async fn first_success<C, T, F, Fut>(
    candidates: &[C],
    path: &str,
    mut attempt: F,
) -> LeaderboardResult<T>
where
    C: Display,
    F: FnMut(&C) -> Fut,
    Fut: Future<Output = LeaderboardResult<T>>,
{
    for candidate in candidates {
        match attempt(candidate).await {
            Ok(value) => return Ok(value),
            Err(e) => warn!("⚠️ Request failed: {}{} - {}", candidate, path, e),
        }
    }

    Err(LeaderboardError::NoReachableMirror {
        path: path.to_string(),
        attempted: candidates.len(),
    })
}

/// Market data fetcher over the spot and futures mirror sets.
pub struct MirrorFetcher<H: HttpGet> {
    pub http: H,
    pub spot_mirrors: Vec<String>,
    pub futures_mirrors: Vec<String>,
}

impl<H: HttpGet> MirrorFetcher<H> {
    pub fn new(http: H, spot_mirrors: Vec<String>, futures_mirrors: Vec<String>) -> Self {
        Self { http, spot_mirrors, futures_mirrors }
    }

    pub fn mirrors(&self, market: MarketType) -> &[String] {
        match market {
            MarketType::Spot => &self.spot_mirrors,
            MarketType::Futures => &self.futures_mirrors,
        }
    }

    pub async fn fetch(&self, path: &str, market: MarketType) -> LeaderboardResult<Value> {
        let http = &self.http;
        first_success(self.mirrors(market), path, move |base| {
            let url = format!("{}{}", base, path);
            async move {
                debug!("GET {}", url);
                http.get_json(&url).await
            }
        })
        .await
    }
}

impl MirrorFetcher<BinanceClient> {
    pub fn from_config(cfg: &ExchangeConfig) -> LeaderboardResult<Self> {
        let http = BinanceClient::new(cfg.timeout(), &cfg.user_agent)?;
        Ok(Self::new(http, cfg.spot_mirrors.clone(), cfg.futures_mirrors.clone()))
    }
}

use std::env;
use std::time::Duration;

use crate::error::{LeaderboardError, LeaderboardResult};

pub const DEFAULT_SPOT_MIRRORS: [&str; 3] = [
    "https://api1.binance.com",
    "https://api2.binance.com",
    "https://api3.binance.com",
];
pub const DEFAULT_FUTURES_MIRRORS: [&str; 1] = ["https://fapi.binance.com"];
/// Four tables of this many rows still fit in one 4096-character Telegram
/// message.
pub const MAX_LEADERBOARD_SIZE: usize = 25;
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_url: String,
}

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    pub spot_mirrors: Vec<String>,
    pub futures_mirrors: Vec<String>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct LeaderboardConfig {
    pub top_n: usize,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub telegram: TelegramConfig,
    pub exchange: ExchangeConfig,
    pub leaderboard: LeaderboardConfig,
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            telegram: TelegramConfig {
                bot_token: String::new(),
                chat_id: String::new(),
                api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            },
            exchange: ExchangeConfig {
                spot_mirrors: DEFAULT_SPOT_MIRRORS.iter().map(|s| s.to_string()).collect(),
                futures_mirrors: DEFAULT_FUTURES_MIRRORS.iter().map(|s| s.to_string()).collect(),
                timeout_secs: 10,
                user_agent: "Mozilla/5.0".to_string(),
            },
            leaderboard: LeaderboardConfig { top_n: 10 },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl ExchangeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> LeaderboardResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source. `from_env` is the
    /// process-environment flavour of this.
    pub fn from_lookup<F>(lookup: F) -> LeaderboardResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.telegram.bot_token = lookup("TELEGRAM_BOT_TOKEN")
            .ok_or_else(|| LeaderboardError::Configuration("TELEGRAM_BOT_TOKEN not found".to_string()))?;

        config.telegram.chat_id = lookup("TELEGRAM_CHAT_ID")
            .ok_or_else(|| LeaderboardError::Configuration("TELEGRAM_CHAT_ID not found".to_string()))?;

        if let Some(api_url) = lookup("TELEGRAM_API_URL") {
            config.telegram.api_url = api_url.trim_end_matches('/').to_string();
        }

        // Exchange configuration
        if let Some(mirrors) = lookup("BINANCE_SPOT_MIRRORS") {
            config.exchange.spot_mirrors = parse_mirrors(&mirrors);
        }

        if let Some(mirrors) = lookup("BINANCE_FUTURES_MIRRORS") {
            config.exchange.futures_mirrors = parse_mirrors(&mirrors);
        }

        if let Some(timeout) = lookup("HTTP_TIMEOUT_SECS") {
            config.exchange.timeout_secs = timeout.trim().parse()
                .map_err(|_| LeaderboardError::Configuration("Invalid HTTP_TIMEOUT_SECS".to_string()))?;
        }

        if let Some(size) = lookup("LEADERBOARD_SIZE") {
            config.leaderboard.top_n = size.trim().parse()
                .map_err(|_| LeaderboardError::Configuration("Invalid LEADERBOARD_SIZE".to_string()))?;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.logging.level = level.trim().to_lowercase();
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> LeaderboardResult<()> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(LeaderboardError::Configuration("Bot token cannot be empty".to_string()));
        }

        if self.telegram.chat_id.trim().is_empty() {
            return Err(LeaderboardError::Configuration("Chat ID cannot be empty".to_string()));
        }

        if self.exchange.spot_mirrors.is_empty() {
            return Err(LeaderboardError::Configuration("At least one spot mirror is required".to_string()));
        }

        if self.exchange.futures_mirrors.is_empty() {
            return Err(LeaderboardError::Configuration("At least one futures mirror is required".to_string()));
        }

        if self.exchange.timeout_secs == 0 {
            return Err(LeaderboardError::Configuration("HTTP timeout must be greater than 0".to_string()));
        }

        if self.leaderboard.top_n == 0 || self.leaderboard.top_n > MAX_LEADERBOARD_SIZE {
            return Err(LeaderboardError::Configuration(format!(
                "Leaderboard size must be between 1 and {}",
                MAX_LEADERBOARD_SIZE
            )));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(LeaderboardError::Configuration(format!("Invalid log level: {}", self.logging.level)));
        }

        Ok(())
    }
}

fn parse_mirrors(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|m| m.trim().trim_end_matches('/'))
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect()
}

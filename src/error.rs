use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeaderboardError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("No reachable mirror for {path} ({attempted} tried)")]
    NoReachableMirror { path: String, attempted: usize },

    #[error("Malformed {0} exchangeInfo response: missing symbols")]
    MalformedMetadata(String),

    #[error("Malformed {0} ticker response: expected an array")]
    MalformedPayload(String),

    #[error("Notification failed: {0}")]
    Notification(String),
}

impl LeaderboardError {
    /// Errors that end the fetch phase of a run. These are reported to the
    /// chat instead of aborting the process.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            LeaderboardError::NoReachableMirror { .. }
                | LeaderboardError::MalformedMetadata(_)
                | LeaderboardError::MalformedPayload(_)
                | LeaderboardError::HttpStatus { .. }
                | LeaderboardError::Network(_)
                | LeaderboardError::InvalidPayload(_)
        )
    }
}

impl From<reqwest::Error> for LeaderboardError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LeaderboardError::Network(format!("Request timeout: {}", err))
        } else if err.is_connect() {
            LeaderboardError::Network(format!("Connection error: {}", err))
        } else if err.is_decode() {
            LeaderboardError::InvalidPayload(format!("Body decode error: {}", err))
        } else {
            LeaderboardError::Network(format!("HTTP error: {}", err))
        }
    }
}

impl From<serde_json::Error> for LeaderboardError {
    fn from(err: serde_json::Error) -> Self {
        LeaderboardError::InvalidPayload(format!("JSON parsing error: {}", err))
    }
}

pub type LeaderboardResult<T> = Result<T, LeaderboardError>;

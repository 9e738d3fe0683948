use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::error::{LeaderboardError, LeaderboardResult};
use crate::rest_client::{HttpGet, MirrorFetcher};
use crate::telegram::{ChatSender, ParseMode};

pub const SPOT_MIRRORS: [&str; 3] = ["https://m1.test", "https://m2.test", "https://m3.test"];
pub const FUTURES_MIRRORS: [&str; 1] = ["https://f1.test"];

pub enum Reply {
    Json(Value),
    Status(u16),
}

/// Scripted HTTP transport. Unknown URLs behave like an unreachable host.
#[derive(Default)]
pub struct FakeHttp {
    routes: HashMap<String, Reply>,
    calls: Mutex<Vec<String>>,
}

impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, url: &str, reply: Reply) -> Self {
        self.routes.insert(url.to_string(), reply);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpGet for FakeHttp {
    async fn get_json(&self, url: &str) -> LeaderboardResult<Value> {
        self.calls.lock().unwrap().push(url.to_string());
        match self.routes.get(url) {
            Some(Reply::Json(v)) => Ok(v.clone()),
            Some(Reply::Status(status)) => Err(LeaderboardError::HttpStatus {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(LeaderboardError::Network(format!("Connection error: {}", url))),
        }
    }
}

#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<(String, Option<ParseMode>)>>,
    pub fail: bool,
}

impl RecordingSender {
    pub fn failing() -> Self {
        Self { fail: true, ..Default::default() }
    }

    pub fn messages(&self) -> Vec<(String, Option<ParseMode>)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatSender for RecordingSender {
    async fn send_message(&self, text: &str, parse_mode: Option<ParseMode>) -> LeaderboardResult<()> {
        self.sent.lock().unwrap().push((text.to_string(), parse_mode));
        if self.fail {
            return Err(LeaderboardError::Notification("chat not found".to_string()));
        }
        Ok(())
    }
}

pub fn fetcher(http: FakeHttp) -> MirrorFetcher<FakeHttp> {
    MirrorFetcher::new(
        http,
        SPOT_MIRRORS.iter().map(|s| s.to_string()).collect(),
        FUTURES_MIRRORS.iter().map(|s| s.to_string()).collect(),
    )
}

pub fn spot_exchange_info() -> Value {
    json!({
        "timezone": "UTC",
        "symbols": [
            { "symbol": "BTCUSDT", "status": "TRADING" },
            { "symbol": "ETHUSDT", "status": "TRADING" },
            { "symbol": "SOLUSDT", "status": "TRADING" },
            { "symbol": "DOGEUSDT", "status": "TRADING" },
            { "symbol": "XRPUSDT", "status": "TRADING" },
            { "symbol": "LUNAUSDT", "status": "BREAK" },
            { "symbol": "ETHBTC", "status": "TRADING" },
            { "symbol": "BADUSDT", "status": "TRADING" },
            { "status": "TRADING" }
        ]
    })
}

pub fn spot_tickers() -> Value {
    json!([
        { "symbol": "BTCUSDT", "priceChangePercent": "5.000", "lastPrice": "65000.12340000" },
        { "symbol": "ETHUSDT", "priceChangePercent": "-3.000", "lastPrice": "3456.78000000" },
        { "symbol": "SOLUSDT", "priceChangePercent": "10.000", "lastPrice": "150.25000000" },
        { "symbol": "DOGEUSDT", "priceChangePercent": "-8.000", "lastPrice": "0.12345000" },
        { "symbol": "XRPUSDT", "priceChangePercent": "0.000", "lastPrice": "0.50000000" },
        { "symbol": "LUNAUSDT", "priceChangePercent": "40.000", "lastPrice": "0.00010000" },
        { "symbol": "ETHBTC", "priceChangePercent": "1.000", "lastPrice": "0.05300000" },
        { "symbol": "BADUSDT", "priceChangePercent": "N/A", "lastPrice": "1.00000000" },
        { "symbol": "NEWUSDT", "priceChangePercent": "99.000", "lastPrice": "1.00000000" }
    ])
}

pub fn futures_exchange_info() -> Value {
    json!({
        "symbols": [
            { "symbol": "BTCUSDT", "status": "TRADING" },
            { "symbol": "ETHUSDT", "status": "TRADING" },
            { "symbol": "1000PEPEUSDT", "status": "TRADING" },
            { "symbol": "OLDUSDT", "status": "SETTLING" }
        ]
    })
}

pub fn futures_tickers() -> Value {
    json!([
        { "symbol": "BTCUSDT", "priceChangePercent": "4.100", "lastPrice": "64990.1" },
        { "symbol": "ETHUSDT", "priceChangePercent": "-2.500", "lastPrice": "3455.10" },
        { "symbol": "1000PEPEUSDT", "priceChangePercent": "12.345", "lastPrice": "0.0123" },
        { "symbol": "OLDUSDT", "priceChangePercent": "-50.000", "lastPrice": "1.0" }
    ])
}

pub fn healthy_http() -> FakeHttp {
    FakeHttp::new()
        .route("https://m1.test/api/v3/exchangeInfo", Reply::Json(spot_exchange_info()))
        .route("https://m1.test/api/v3/ticker/24hr", Reply::Json(spot_tickers()))
        .route("https://f1.test/fapi/v1/exchangeInfo", Reply::Json(futures_exchange_info()))
        .route("https://f1.test/fapi/v1/ticker/24hr", Reply::Json(futures_tickers()))
}

/// A request as seen by `LocalServer`. `head` is lowercased, `path` is not.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub path: String,
    pub head: String,
    pub body: String,
}

/// Plain HTTP/1.1 server on 127.0.0.1 answering every request to a known
/// path with a canned status and body. Unknown paths get a 404.
pub struct LocalServer {
    pub base: String,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl LocalServer {
    pub async fn start(routes: &[(&str, u16, &str)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let routes: HashMap<String, (u16, String)> = routes
            .iter()
            .map(|(path, status, body)| (path.to_string(), (*status, body.to_string())))
            .collect();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let Some(request) = read_request(&mut socket).await else {
                    continue;
                };
                let (status, body) = routes
                    .get(&request.path)
                    .cloned()
                    .unwrap_or((404, "{}".to_string()));
                log.lock().unwrap().push(request);

                let response = format!(
                    "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        Self { base, seen }
    }

    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

async fn read_request(socket: &mut TcpStream) -> Option<SeenRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    let head_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let raw_head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let path = raw_head.split_whitespace().nth(1).unwrap_or("/").to_string();
    let head = raw_head.to_lowercase();
    let content_length = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buf[head_end..]).to_string();
    Some(SeenRequest { path, head, body })
}

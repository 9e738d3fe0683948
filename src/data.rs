use std::fmt;

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketType {
    Spot,
    Futures,
}

impl MarketType {
    pub fn exchange_info_path(&self) -> &'static str {
        match self {
            MarketType::Spot => "/api/v3/exchangeInfo",
            MarketType::Futures => "/fapi/v1/exchangeInfo",
        }
    }

    pub fn ticker_path(&self) -> &'static str {
        match self {
            MarketType::Spot => "/api/v3/ticker/24hr",
            MarketType::Futures => "/fapi/v1/ticker/24hr",
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketType::Spot => write!(f, "spot"),
            MarketType::Futures => write!(f, "futures"),
        }
    }
}

/// `exchangeInfo` as it comes off the wire. Entries of `symbols` are parsed
/// one by one so a single odd entry does not reject the whole payload.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawExchangeInfo {
    pub symbols: Option<Vec<Value>>,
}

/// One entry of `exchangeInfo.symbols`. Everything else in the entry is
/// ignored.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawSymbolInfo {
    pub symbol: Option<String>,
    pub status: Option<String>,
}

/// One element of the 24hr ticker array. Binance sends the numbers as
/// strings, so both numeric fields are kept untyped until coercion.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RawTicker {
    pub symbol: Option<String>,
    #[serde(rename = "priceChangePercent")]
    pub price_change_percent: Option<Value>,
    #[serde(rename = "lastPrice")]
    pub last_price: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickerRow {
    pub symbol: String,
    pub price_change_percent: f64,
    pub last_price: f64,
}

pub type MarketSnapshot = Vec<TickerRow>;

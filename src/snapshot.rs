use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::data::{MarketSnapshot, MarketType, RawExchangeInfo, RawSymbolInfo, RawTicker, TickerRow};
use crate::error::{LeaderboardError, LeaderboardResult};
use crate::rest_client::{HttpGet, MirrorFetcher};

pub const QUOTE_ASSET: &str = "USDT";
const TRADING_STATUS: &str = "TRADING";

/// Symbols currently in `TRADING` state according to an `exchangeInfo`
/// payload. A payload without a `symbols` array is rejected.
pub fn active_symbols(info: &Value, market: MarketType) -> LeaderboardResult<HashSet<String>> {
    let entries = Some(info)
        .filter(|v| v.is_object())
        .and_then(|v| RawExchangeInfo::deserialize(v).ok())
        .and_then(|raw| raw.symbols)
        .ok_or_else(|| LeaderboardError::MalformedMetadata(market.to_string()))?;

    Ok(entries
        .iter()
        .filter_map(|entry| RawSymbolInfo::deserialize(entry).ok())
        .filter(|s| s.status.as_deref() == Some(TRADING_STATUS))
        .filter_map(|s| s.symbol)
        .collect())
}

/// Accepts JSON numbers and numeric strings. Everything else, including
/// "NaN" and "inf", yields `None`.
pub fn coerce_number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}

pub fn is_listed(symbol: &str, active: &HashSet<String>) -> bool {
    symbol.ends_with(QUOTE_ASSET) && active.contains(symbol)
}

/// Turns raw ticker entries into clean rows, keeping fetch order.
pub fn clean_tickers(entries: &[Value], active: &HashSet<String>) -> MarketSnapshot {
    let rows: Vec<TickerRow> = entries
        .iter()
        .filter(|entry| entry.is_object())
        .filter_map(|entry| RawTicker::deserialize(entry).ok())
        .filter_map(|raw| {
            Some(TickerRow {
                symbol: raw.symbol?,
                price_change_percent: coerce_number(raw.price_change_percent.as_ref())?,
                last_price: coerce_number(raw.last_price.as_ref())?,
            })
        })
        .collect();
    filter_rows(&rows, active)
}

/// Keeps rows that are listed, USDT-quoted and carry finite numbers.
pub fn filter_rows(rows: &[TickerRow], active: &HashSet<String>) -> MarketSnapshot {
    rows.iter()
        .filter(|row| is_listed(&row.symbol, active))
        .filter(|row| row.price_change_percent.is_finite() && row.last_price.is_finite())
        .cloned()
        .collect()
}

pub async fn build_snapshot<H: HttpGet>(
    fetcher: &MirrorFetcher<H>,
    market: MarketType,
) -> LeaderboardResult<MarketSnapshot> {
    let info = fetcher.fetch(market.exchange_info_path(), market).await?;
    let active = active_symbols(&info, market)?;
    debug!("{} symbols trading on {}", active.len(), market);

    let tickers = fetcher.fetch(market.ticker_path(), market).await?;
    let entries = tickers
        .as_array()
        .ok_or_else(|| LeaderboardError::MalformedPayload(market.to_string()))?;

    let rows = clean_tickers(entries, &active);
    info!("{} snapshot: {} USDT rows out of {} tickers", market, rows.len(), entries.len());
    Ok(rows)
}

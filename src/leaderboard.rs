use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset, Utc};

use crate::data::TickerRow;
use crate::utils::format_significant;

pub const SYMBOL_WIDTH: usize = 12;
pub const PRICE_DIGITS: usize = 4;
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M (UTC+8)";
const UTC8_OFFSET_SECS: i32 = 8 * 3600;

pub const SECTION_TITLES: [&str; 4] = [
    "Spot Top Gainers",
    "Spot Top Losers",
    "Futures Top Gainers",
    "Futures Top Losers",
];

fn by_change(a: &TickerRow, b: &TickerRow) -> Ordering {
    a.price_change_percent
        .partial_cmp(&b.price_change_percent)
        .unwrap_or(Ordering::Equal)
}

/// Top `n` rows by descending percentage change. Ties keep input order.
pub fn gainers(rows: &[TickerRow], n: usize) -> Vec<TickerRow> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| by_change(b, a));
    ranked.truncate(n);
    ranked
}

/// Top `n` rows by ascending percentage change. Ties keep input order.
pub fn losers(rows: &[TickerRow], n: usize) -> Vec<TickerRow> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(by_change);
    ranked.truncate(n);
    ranked
}

pub fn format_change(pct: f64) -> String {
    // -0.0 would otherwise print as "+-0.00"
    let pct = if pct == 0.0 { 0.0 } else { pct };
    if pct >= 0.0 {
        format!("+{:.2}", pct)
    } else {
        format!("{:.2}", pct)
    }
}

pub fn format_row(row: &TickerRow) -> String {
    let symbol: String = row.symbol.chars().take(SYMBOL_WIDTH).collect();
    format!(
        "{:<width$} {}%   ${}",
        symbol,
        format_change(row.price_change_percent),
        format_significant(row.last_price, PRICE_DIGITS),
        width = SYMBOL_WIDTH
    )
}

pub fn format_table(rows: &[TickerRow]) -> String {
    rows.iter().map(format_row).collect::<Vec<_>>().join("\n")
}

pub fn utc8_timestamp(now: DateTime<Utc>) -> String {
    let utc8 = FixedOffset::east_opt(UTC8_OFFSET_SECS).expect("UTC+8 is within +/-24h");
    now.with_timezone(&utc8).format(TIMESTAMP_FORMAT).to_string()
}

/// Markdown message with the four ranked tables in fixed order and the
/// generation time on the last line.
pub fn assemble_message(
    spot: &[TickerRow],
    futures: &[TickerRow],
    top_n: usize,
    now: DateTime<Utc>,
) -> String {
    let tables = [
        gainers(spot, top_n),
        losers(spot, top_n),
        gainers(futures, top_n),
        losers(futures, top_n),
    ];

    let mut msg = String::from("📊 *Binance 24H Movers (USDT)*\n\n");
    for (title, rows) in SECTION_TITLES.iter().zip(tables.iter()) {
        msg.push_str(&format!(
            "🔸 *{}*\n```text\n{}\n```\n",
            title,
            format_table(rows)
        ));
    }
    msg.push_str(&format!("📅 Updated: {}", utc8_timestamp(now)));
    msg
}

pub fn error_message(detail: &str) -> String {
    format!("❌ fetch failed: {}", detail)
}

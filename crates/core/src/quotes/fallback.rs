use crate::quotes::{PricePoint, Quote, QuoteSource};
use chrono::{Days, NaiveDate};
use std::collections::HashMap;

const HISTORY_DAYS: u64 = 30;

// symbol, last price, day change, day change %
const FALLBACK_PRICES: [(&str, f64, f64, f64); 62] = [
    ("AAPL", 175.50, 2.30, 1.33),
    ("MSFT", 380.20, -1.80, -0.47),
    ("GOOGL", 140.80, 3.20, 2.32),
    ("AMZN", 145.60, 1.40, 0.97),
    ("META", 485.30, 8.70, 1.82),
    ("TSLA", 245.90, -5.10, -2.03),
    ("NVDA", 485.20, 12.80, 2.71),
    ("VTI", 245.60, 1.20, 0.49),
    ("SPY", 450.30, 2.10, 0.47),
    ("QQQ", 380.40, 3.60, 0.96),
    ("VOO", 420.80, 1.90, 0.45),
    ("BND", 78.50, 0.30, 0.38),
    ("JNJ", 165.20, 0.80, 0.49),
    ("KO", 58.40, -0.20, -0.34),
    ("PG", 152.80, 1.10, 0.72),
    ("WMT", 62.30, 0.40, 0.65),
    ("UNH", 485.60, 3.20, 0.66),
    ("JPM", 142.50, 1.30, 0.92),
    ("XOM", 98.70, -0.80, -0.80),
    ("CVX", 148.90, 1.10, 0.74),
    ("BAC", 32.40, 0.20, 0.62),
    ("PFE", 28.60, -0.30, -1.04),
    ("CRM", 245.80, 4.20, 1.74),
    ("ADBE", 485.30, 6.70, 1.40),
    ("NFLX", 485.20, 8.50, 1.78),
    ("ORCL", 118.40, 1.60, 1.37),
    ("INTC", 28.90, 0.40, 1.40),
    ("VZ", 38.50, 0.30, 0.78),
    ("T", 15.80, 0.10, 0.64),
    ("DIS", 88.40, 1.20, 1.38),
    ("NKE", 98.60, 0.80, 0.82),
    ("SBUX", 88.20, 0.60, 0.68),
    ("HD", 285.40, 2.10, 0.74),
    ("MCD", 278.50, 1.80, 0.65),
    ("AMD", 138.40, 2.60, 1.91),
    ("PLTR", 18.60, 0.40, 2.20),
    ("COIN", 78.40, 1.20, 1.55),
    ("SHOP", 58.20, 0.80, 1.39),
    ("UBER", 68.40, 1.10, 1.63),
    ("LYFT", 14.20, 0.20, 1.43),
    ("SNAP", 9.80, 0.10, 1.03),
    ("SPOT", 198.60, 3.40, 1.74),
    ("VUG", 285.40, 2.80, 0.99),
    ("VTV", 165.80, 1.20, 0.73),
    ("VB", 185.60, 2.10, 1.14),
    ("VNQ", 78.40, 0.60, 0.77),
    ("VGT", 485.20, 4.80, 1.00),
    ("XLK", 185.60, 1.80, 0.98),
    ("XLV", 138.40, 1.20, 0.88),
    ("XLF", 38.50, 0.30, 0.78),
    ("VWO", 42.80, 0.40, 0.94),
    ("ARKK", 45.60, 1.20, 2.70),
    ("SOXL", 12.40, 0.80, 6.90),
    ("TQQQ", 45.80, 1.40, 3.15),
    ("ARKG", 28.40, 0.60, 2.16),
    ("VYM", 108.40, 0.80, 0.74),
    ("SCHD", 75.60, 0.50, 0.67),
    ("VXUS", 58.40, 0.40, 0.69),
    ("SCHB", 52.80, 0.30, 0.57),
    ("IVV", 485.20, 2.10, 0.43),
    ("AGG", 98.40, 0.20, 0.20),
    ("BRK.B", 348.50, 2.80, 0.81),
];

/// Placeholder quotes served while live data loads.
///
/// History is a straight line from the implied start price to the last
/// price over the month ending the day before `today`, enough to draw a
/// sparkline without pretending to be real data.
pub fn fallback_quotes(today: NaiveDate) -> HashMap<String, Quote> {
    FALLBACK_PRICES
        .iter()
        .map(|&(symbol, price, change, change_percent)| {
            let quote = Quote {
                symbol: symbol.to_string(),
                current_price: price,
                previous_close: round_cents(price - change),
                change,
                change_percent,
                volume: None,
                market_cap: None,
                dividend_yield: None,
                pe_ratio: None,
                history: placeholder_history(today, price, change_percent),
                source: QuoteSource::Fallback,
            };
            (symbol.to_string(), quote)
        })
        .collect()
}

fn placeholder_history(today: NaiveDate, price: f64, change_percent: f64) -> Vec<PricePoint> {
    let base = price / (1.0 + change_percent / 100.0);
    (0..HISTORY_DAYS)
        .filter_map(|i| {
            let date = today.checked_sub_days(Days::new(HISTORY_DAYS - i))?;
            let progress = i as f64 / HISTORY_DAYS as f64;
            Some(PricePoint {
                date,
                price: round_cents(base * (1.0 + change_percent / 100.0 * progress)),
            })
        })
        .collect()
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

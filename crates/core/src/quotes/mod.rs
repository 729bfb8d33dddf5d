//! Market data for display next to recommendations.
//!
//! Nothing in here feeds the engine; prices are presentation only.

pub mod cache;
pub mod fallback;
pub mod provider;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    Live,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub current_price: f64,
    pub previous_close: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: Option<u64>,
    pub market_cap: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub pe_ratio: Option<f64>,
    pub history: Vec<PricePoint>,
    pub source: QuoteSource,
}

/// Cache and fallback keys are trimmed upper-case tickers.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_ascii_uppercase()
}

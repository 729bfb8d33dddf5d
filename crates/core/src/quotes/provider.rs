use crate::config::Settings;
use crate::quotes::{normalize_symbol, PricePoint, Quote, QuoteSource};
use anyhow::{Context, Result};
use chrono::DateTime;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RETRIES: u32 = 2;
const HISTORY_RANGE: &str = "1mo";
const HISTORY_INTERVAL: &str = "1d";

#[async_trait::async_trait]
pub trait QuoteProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote>;
}

/// Yahoo Finance v8 chart endpoint: one request gives the latest price and a
/// month of daily closes.
#[derive(Debug, Clone)]
pub struct YahooChartProvider {
    http: reqwest::Client,
    base_url: String,
    retries: u32,
}

impl YahooChartProvider {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let base_url = settings
            .quote_provider_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = std::env::var("QUOTE_PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let retries = std::env::var("QUOTE_PROVIDER_RETRIES")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(DEFAULT_RETRIES)
            .max(1);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build quote provider http client")?;

        Ok(Self {
            http,
            base_url,
            retries,
        })
    }

    fn url(&self, symbol: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}",
            self.base_url.trim_end_matches('/'),
            yahoo_symbol(symbol)
        )
    }

    fn headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        // Yahoo rejects requests without a browser-like agent.
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0 (nestegg)"));
        headers
    }

    async fn fetch_once(&self, symbol: &str) -> Result<Quote> {
        let res = self
            .http
            .get(self.url(symbol))
            .headers(Self::headers())
            .query(&[("range", HISTORY_RANGE), ("interval", HISTORY_INTERVAL)])
            .send()
            .await
            .with_context(|| format!("quote request failed for {symbol}"))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .context("failed to read quote provider response")?;
        let raw_json = serde_json::from_str::<Value>(&text)
            .with_context(|| format!("quote provider response is not valid JSON: {text}"))?;

        if !status.is_success() {
            anyhow::bail!("quote provider HTTP {status} for {symbol}: {raw_json}");
        }

        parse_chart(symbol, raw_json)
    }
}

#[async_trait::async_trait]
impl QuoteProvider for YahooChartProvider {
    fn provider_name(&self) -> &'static str {
        "yahoo_chart"
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match self.fetch_once(symbol).await {
                Ok(quote) => return Ok(quote),
                Err(err) => {
                    if attempt >= self.retries {
                        return Err(err);
                    }
                    let backoff = Duration::from_millis(500 << (attempt - 1));
                    tracing::warn!(symbol, attempt, ?backoff, error = %err, "quote fetch failed; retrying");
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }
}

/// Share classes use a dot in the catalog ("BRK.B") and a dash on Yahoo.
fn yahoo_symbol(symbol: &str) -> String {
    normalize_symbol(symbol).replace('.', "-")
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    regular_market_price: Option<f64>,
    chart_previous_close: Option<f64>,
    previous_close: Option<f64>,
    regular_market_volume: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBars>,
}

#[derive(Debug, Deserialize)]
struct QuoteBars {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

fn parse_chart(symbol: &str, raw: Value) -> Result<Quote> {
    let envelope = serde_json::from_value::<ChartEnvelope>(raw)
        .context("failed to parse quote provider response into chart envelope")?;

    if let Some(err) = envelope.chart.error {
        anyhow::bail!("quote provider error [{}]: {}", err.code, err.description);
    }

    let result = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .with_context(|| format!("no chart data returned for {symbol}"))?;

    let current_price = result
        .meta
        .regular_market_price
        .with_context(|| format!("no market price returned for {symbol}"))?;
    let previous_close = result
        .meta
        .chart_previous_close
        .or(result.meta.previous_close)
        .unwrap_or(current_price);

    let change = current_price - previous_close;
    let change_percent = if previous_close > 0.0 {
        change / previous_close * 100.0
    } else {
        0.0
    };

    let closes = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    // Yahoo leaves holes (null closes) on halted days.
    let history = result
        .timestamp
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let date = DateTime::from_timestamp(*ts, 0)?.date_naive();
            Some(PricePoint {
                date,
                price: close?,
            })
        })
        .collect();

    Ok(Quote {
        symbol: normalize_symbol(symbol),
        current_price,
        previous_close,
        change,
        change_percent,
        volume: result.meta.regular_market_volume,
        market_cap: None,
        dividend_yield: None,
        pe_ratio: None,
        history,
        source: QuoteSource::Live,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn parses_chart_meta_and_skips_null_closes() {
        let v = json!({
            "chart": {
                "result": [{
                    "meta": {
                        "symbol": "AAPL",
                        "regularMarketPrice": 110.0,
                        "chartPreviousClose": 100.0,
                        "regularMarketVolume": 1234
                    },
                    "timestamp": [1_767_571_200, 1_767_657_600, 1_767_744_000],
                    "indicators": {"quote": [{"close": [99.5, null, 110.0]}]}
                }],
                "error": null
            }
        });

        let quote = parse_chart("aapl", v).unwrap();
        assert_eq!(quote.symbol, "AAPL");
        assert_eq!(quote.change, 10.0);
        assert_eq!(quote.change_percent, 10.0);
        assert_eq!(quote.volume, Some(1234));
        assert_eq!(quote.source, QuoteSource::Live);
        assert_eq!(quote.history.len(), 2);
        assert_eq!(
            quote.history[0].date,
            NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
        );
        assert_eq!(quote.history[1].price, 110.0);
    }

    #[test]
    fn surfaces_provider_error_payload() {
        let v = json!({
            "chart": {
                "result": null,
                "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
            }
        });

        let err = parse_chart("ZZZZ", v).unwrap_err();
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn rejects_result_without_price() {
        let v = json!({
            "chart": {
                "result": [{"meta": {}, "indicators": {"quote": []}}],
                "error": null
            }
        });
        assert!(parse_chart("AAPL", v).is_err());
    }

    #[test]
    fn share_class_symbols_use_dash() {
        assert_eq!(yahoo_symbol(" brk.b "), "BRK-B");
        assert_eq!(yahoo_symbol("VTI"), "VTI");
    }
}

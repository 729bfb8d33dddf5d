use crate::config::Settings;
use crate::quotes::fallback::fallback_quotes;
use crate::quotes::provider::{QuoteProvider, YahooChartProvider};
use crate::quotes::{normalize_symbol, Quote};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

pub const DEFAULT_TTL: Duration = Duration::from_secs(10 * 60);

/// Refresh-ahead quote cache.
///
/// A fresh entry is served as-is. A stale entry, or a fallback placeholder when
/// nothing was ever fetched, is served immediately while one background task
/// per symbol fetches live data. Only symbols with neither wait on the
/// provider. Lookups never fail; an unavailable symbol is `None`.
#[derive(Clone)]
pub struct QuoteCache {
    inner: Arc<Inner>,
}

struct Inner {
    provider: Arc<dyn QuoteProvider>,
    fallback: HashMap<String, Quote>,
    ttl: Duration,
    state: Mutex<CacheState>,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CachedQuote>,
    refreshing: HashSet<String>,
}

struct CachedQuote {
    quote: Quote,
    fetched_at: Instant,
}

enum Lookup {
    Fresh(Quote),
    Stale(Quote),
    Miss,
}

impl QuoteCache {
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        fallback: HashMap<String, Quote>,
        ttl: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                fallback,
                ttl,
                state: Mutex::new(CacheState::default()),
            }),
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let provider = YahooChartProvider::from_settings(settings)?;
        let ttl = std::env::var("QUOTE_CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TTL);
        let fallback = fallback_quotes(chrono::Utc::now().date_naive());

        tracing::info!(
            provider = provider.provider_name(),
            ttl_secs = ttl.as_secs(),
            fallback_symbols = fallback.len(),
            "quote cache ready"
        );
        Ok(Self::new(Arc::new(provider), fallback, ttl))
    }

    pub async fn get_quote(&self, symbol: &str) -> Option<Quote> {
        let key = normalize_symbol(symbol);
        if key.is_empty() {
            return None;
        }

        let stale = match self.lookup(&key) {
            Lookup::Fresh(quote) => return Some(quote),
            Lookup::Stale(quote) => Some(quote),
            Lookup::Miss => None,
        };

        if let Some(quote) = stale.or_else(|| self.inner.fallback.get(&key).cloned()) {
            self.spawn_refresh(key);
            return Some(quote);
        }

        match self.fetch_and_store(&key).await {
            Ok(quote) => Some(quote),
            Err(err) => {
                tracing::warn!(symbol = %key, error = %err, "quote unavailable");
                None
            }
        }
    }

    /// Fetches all symbols concurrently. Symbols that cannot be served are
    /// left out of the map; they never fail the batch.
    pub async fn get_quotes(&self, symbols: &[String]) -> BTreeMap<String, Quote> {
        let mut tasks = JoinSet::new();
        for symbol in symbols {
            let cache = self.clone();
            let symbol = symbol.clone();
            tasks.spawn(async move {
                let quote = cache.get_quote(&symbol).await;
                (symbol, quote)
            });
        }

        let mut out = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((symbol, Some(quote))) => {
                    out.insert(symbol, quote);
                }
                Ok((symbol, None)) => {
                    tracing::debug!(%symbol, "no quote available; leaving symbol out");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "quote task failed");
                }
            }
        }
        out
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup(&self, key: &str) -> Lookup {
        let state = self.state();
        match state.entries.get(key) {
            Some(entry) if entry.fetched_at.elapsed() < self.inner.ttl => {
                Lookup::Fresh(entry.quote.clone())
            }
            Some(entry) => Lookup::Stale(entry.quote.clone()),
            None => Lookup::Miss,
        }
    }

    async fn fetch_and_store(&self, key: &str) -> anyhow::Result<Quote> {
        let quote = self.inner.provider.fetch_quote(key).await?;
        self.state().entries.insert(
            key.to_string(),
            CachedQuote {
                quote: quote.clone(),
                fetched_at: Instant::now(),
            },
        );
        Ok(quote)
    }

    fn spawn_refresh(&self, key: String) {
        if !self.state().refreshing.insert(key.clone()) {
            return;
        }

        let cache = self.clone();
        tokio::spawn(async move {
            if let Err(err) = cache.fetch_and_store(&key).await {
                tracing::warn!(symbol = %key, error = %err, "background quote refresh failed");
            }
            cache.state().refreshing.remove(&key);
        });
    }
}

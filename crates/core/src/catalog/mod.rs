use crate::config::Settings;
use crate::domain::instrument::Instrument;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::Path;

const BUILTIN_CATALOG_JSON: &str = include_str!("../../data/catalog.json");

/// Read-only list of investable instruments.
///
/// Built once at startup and handed to the engine by reference; order is
/// significant because the scorer keeps catalog order for equal scores.
#[derive(Debug, Clone)]
pub struct Catalog {
    instruments: Vec<Instrument>,
}

impl Catalog {
    pub fn new(instruments: Vec<Instrument>) -> Result<Self> {
        let mut seen_ids = BTreeSet::<&str>::new();
        for item in &instruments {
            validate_instrument(item)
                .with_context(|| format!("invalid catalog entry id={}", item.id))?;
            anyhow::ensure!(
                seen_ids.insert(item.id.as_str()),
                "duplicate catalog id: {}",
                item.id
            );
        }
        Ok(Self { instruments })
    }

    /// The table shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_CATALOG_JSON).context("embedded catalog is invalid")
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let instruments = serde_json::from_str::<Vec<Instrument>>(json)
            .context("catalog is not a JSON array of instruments")?;
        Self::new(instruments)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("failed to load catalog file {}", path.display()))
    }

    /// `NESTEGG_CATALOG_PATH` when set, otherwise the built-in table.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let catalog = match settings.catalog_path.as_deref() {
            Some(path) => Self::from_path(path)?,
            None => Self::builtin()?,
        };
        tracing::info!(
            instruments = catalog.len(),
            source = settings.catalog_path.as_deref().unwrap_or("builtin"),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    pub fn get(&self, symbol: &str) -> Option<&Instrument> {
        self.instruments
            .iter()
            .find(|i| i.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

fn validate_instrument(item: &Instrument) -> Result<()> {
    anyhow::ensure!(!item.id.trim().is_empty(), "id must be non-empty");
    anyhow::ensure!(!item.symbol.trim().is_empty(), "symbol must be non-empty");
    anyhow::ensure!(!item.name.trim().is_empty(), "name must be non-empty");
    anyhow::ensure!(!item.horizons.is_empty(), "horizons must be non-empty");
    anyhow::ensure!(
        item.minimum_investment.is_finite() && item.minimum_investment >= 0.0,
        "minimum_investment must be a non-negative number (got {})",
        item.minimum_investment
    );
    anyhow::ensure!(
        item.volatility <= 100,
        "volatility must be 0..=100 (got {})",
        item.volatility
    );

    let r = &item.expected_return;
    anyhow::ensure!(
        r.conservative.is_finite() && r.average.is_finite() && r.optimistic.is_finite(),
        "expected_return values must be finite"
    );
    for (field, value) in [
        ("dividend_yield", item.dividend_yield),
        ("expense_ratio", item.expense_ratio),
    ] {
        if let Some(v) = value {
            anyhow::ensure!(v.is_finite() && v >= 0.0, "{field} must be >= 0 (got {v})");
        }
    }
    Ok(())
}

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordinal risk tier, shared by instruments (what they carry) and criteria
/// (how much the investor will tolerate). Declaration order is the ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    /// True when an instrument of tier `self` fits under the `ceiling` an
    /// investor asked for. Safer is fine, riskier never is.
    pub fn is_within(self, ceiling: RiskLevel) -> bool {
        self <= ceiling
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskLevel::Low),
            "medium" => Ok(RiskLevel::Medium),
            "high" => Ok(RiskLevel::High),
            other => bail!("unknown risk level: {other:?} (expected low, medium or high)"),
        }
    }
}

/// Intended holding period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Horizon {
    #[serde(alias = "short-term", alias = "short_term")]
    Short,
    #[serde(alias = "mid-term", alias = "mid_term")]
    Mid,
    #[serde(alias = "long-term", alias = "long_term")]
    Long,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Horizon::Short, Horizon::Mid, Horizon::Long];

    pub fn as_str(self) -> &'static str {
        match self {
            Horizon::Short => "short",
            Horizon::Mid => "mid",
            Horizon::Long => "long",
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Horizon {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" | "short-term" | "short_term" => Ok(Horizon::Short),
            "mid" | "mid-term" | "mid_term" => Ok(Horizon::Mid),
            "long" | "long-term" | "long_term" => Ok(Horizon::Long),
            other => bail!("unknown horizon: {other:?} (expected short, mid or long)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstrumentKind {
    #[serde(alias = "stock")]
    Equity,
    #[serde(alias = "etf")]
    Fund,
}

/// Expected annual return in percent under three market outlooks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedReturn {
    pub conservative: f64,
    pub average: f64,
    pub optimistic: f64,
}

impl ExpectedReturn {
    /// Low-risk investors are quoted the conservative figure, high-risk ones
    /// the optimistic figure.
    pub fn for_risk(&self, risk: RiskLevel) -> f64 {
        match risk {
            RiskLevel::Low => self.conservative,
            RiskLevel::Medium => self.average,
            RiskLevel::High => self.optimistic,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub kind: InstrumentKind,
    pub sector: String,
    pub risk: RiskLevel,
    pub horizons: Vec<Horizon>,
    pub minimum_investment: f64,
    pub expected_return: ExpectedReturn,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dividend_yield: Option<f64>,
    /// Percent per year; funds only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense_ratio: Option<f64>,
    /// Display label such as "Large Cap"; equities only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<String>,
    /// 0..=100, higher swings harder.
    pub volatility: u8,
}

impl Instrument {
    pub fn suits(&self, horizon: Horizon) -> bool {
        self.horizons.contains(&horizon)
    }

    pub fn is_fund(&self) -> bool {
        self.kind == InstrumentKind::Fund
    }
}

use crate::domain::instrument::{Horizon, Instrument, RiskLevel};
use serde::{Deserialize, Serialize};

/// A validated request. Build one through
/// [`CriteriaRequest`](crate::domain::contract::CriteriaRequest) unless the
/// inputs are already typed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    pub amount: f64,
    pub horizon: Horizon,
    pub risk: RiskLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub instrument: Instrument,
    pub allocation_percentage: u32,
    pub recommended_amount: f64,
    pub rationale: String,
}

/// Currency amount for a whole-percent share of `total`, rounded to whole units.
pub fn amount_for(total: f64, percentage: u32) -> f64 {
    (total * (f64::from(percentage) / 100.0)).round()
}

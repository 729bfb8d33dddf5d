//! Filter, score, select, allocate, rebalance and explain.
//!
//! Every stage is total: an empty intermediate result flows through to an
//! empty recommendation list, which callers present as "nothing suitable for
//! these criteria" rather than as an error.

pub mod allocate;
pub mod explain;
pub mod filter;
pub mod rebalance;
pub mod score;

use crate::catalog::Catalog;
use crate::domain::recommendation::{Criteria, Recommendation};

pub fn recommend(catalog: &Catalog, criteria: &Criteria) -> Vec<Recommendation> {
    let compatible = filter::compatible(catalog.instruments(), criteria);
    let ranked = score::rank(compatible, criteria);
    let ranked_len = ranked.len();
    let selected = allocate::select(ranked, criteria.amount);
    let allocations = allocate::allocate(&selected, criteria);
    let balanced = rebalance::rebalance(allocations, criteria.amount);

    tracing::debug!(
        amount = criteria.amount,
        horizon = %criteria.horizon,
        risk = %criteria.risk,
        compatible = ranked_len,
        selected = selected.len(),
        recommended = balanced.len(),
        "recommendation pipeline finished"
    );

    balanced
        .into_iter()
        .map(|a| Recommendation {
            instrument: a.instrument.clone(),
            allocation_percentage: a.percentage,
            recommended_amount: a.amount,
            rationale: explain::rationale(a.instrument, criteria, a.percentage),
        })
        .collect()
}

#[cfg(test)]
pub(crate) fn test_instrument(
    id: &str,
    kind: crate::domain::instrument::InstrumentKind,
    risk: crate::domain::instrument::RiskLevel,
    horizons: &[crate::domain::instrument::Horizon],
    minimum_investment: f64,
) -> crate::domain::instrument::Instrument {
    crate::domain::instrument::Instrument {
        id: id.to_string(),
        symbol: id.to_uppercase(),
        name: format!("Test {id}"),
        kind,
        sector: "Test".to_string(),
        risk,
        horizons: horizons.to_vec(),
        minimum_investment,
        expected_return: crate::domain::instrument::ExpectedReturn {
            conservative: 0.0,
            average: 0.0,
            optimistic: 0.0,
        },
        description: String::new(),
        dividend_yield: None,
        expense_ratio: None,
        market_cap: None,
        volatility: 10,
    }
}

use crate::domain::instrument::{Instrument, RiskLevel};
use crate::domain::recommendation::{amount_for, Criteria};
use crate::engine::score::ScoredInstrument;

const SMALL_AMOUNT: f64 = 1_000.0;
const MEDIUM_AMOUNT: f64 = 5_000.0;

const LOW_DEFAULT: [u32; 7] = [30, 20, 15, 15, 10, 5, 5];
const MEDIUM_DEFAULT: [u32; 7] = [25, 20, 18, 15, 12, 5, 5];
const HIGH_DEFAULT: [u32; 7] = [20, 18, 16, 16, 15, 8, 7];

/// One selected instrument with its share of the amount.
#[derive(Debug, Clone, Copy)]
pub struct Allocation<'a> {
    pub instrument: &'a Instrument,
    pub percentage: u32,
    pub amount: f64,
}

/// Smaller amounts are spread over fewer holdings.
pub fn max_selection(amount: f64) -> usize {
    if amount < SMALL_AMOUNT {
        3
    } else if amount < MEDIUM_AMOUNT {
        5
    } else {
        7
    }
}

pub fn select<'a>(mut ranked: Vec<ScoredInstrument<'a>>, amount: f64) -> Vec<ScoredInstrument<'a>> {
    ranked.truncate(max_selection(amount));
    ranked
}

/// Percentage weights for `count` ranked holdings.
///
/// Weight is front-loaded onto the best picks; low risk concentrates harder
/// than high risk. Counts above five read a prefix of the seven-slot default,
/// so six holdings sum to less than 100 until rebalanced.
pub fn weights(risk: RiskLevel, count: usize) -> Vec<u32> {
    let table: &[u32] = match (risk, count) {
        (_, 0) => &[],
        (_, 1) => &[100],

        (RiskLevel::Low, 2) => &[70, 30],
        (RiskLevel::Low, 3) => &[50, 30, 20],
        (RiskLevel::Low, 4) => &[40, 30, 20, 10],
        (RiskLevel::Low, 5) => &[35, 25, 20, 15, 5],
        (RiskLevel::Low, _) => &LOW_DEFAULT,

        (RiskLevel::Medium, 2) => &[60, 40],
        (RiskLevel::Medium, 3) => &[45, 35, 20],
        (RiskLevel::Medium, 4) => &[35, 30, 20, 15],
        (RiskLevel::Medium, 5) => &[30, 25, 20, 15, 10],
        (RiskLevel::Medium, _) => &MEDIUM_DEFAULT,

        (RiskLevel::High, 2) => &[55, 45],
        (RiskLevel::High, 3) => &[40, 35, 25],
        (RiskLevel::High, 4) => &[30, 25, 25, 20],
        (RiskLevel::High, 5) => &[25, 20, 20, 20, 15],
        (RiskLevel::High, _) => &HIGH_DEFAULT,
    };

    table.iter().take(count).copied().collect()
}

/// Pairs each selected instrument with its weight and currency amount.
pub fn allocate<'a>(selected: &[ScoredInstrument<'a>], criteria: &Criteria) -> Vec<Allocation<'a>> {
    let weights = weights(criteria.risk, selected.len());

    selected
        .iter()
        .zip(weights)
        .map(|(scored, percentage)| Allocation {
            instrument: scored.instrument,
            percentage,
            amount: amount_for(criteria.amount, percentage),
        })
        .collect()
}

use crate::domain::instrument::{Instrument, RiskLevel};
use crate::domain::recommendation::Criteria;
use std::cmp::Ordering;

pub const RETURN_WEIGHT: f64 = 10.0;
pub const EXACT_RISK_BONUS: f64 = 20.0;
pub const FUND_BONUS: f64 = 15.0;
pub const LOW_FEE_BONUS: f64 = 10.0;
/// Expense ratio in percent.
pub const LOW_FEE_THRESHOLD: f64 = 0.1;
pub const VOLATILITY_PENALTY: f64 = 15.0;
pub const VOLATILITY_LIMIT: u8 = 30;
pub const DIVIDEND_BONUS: f64 = 10.0;
/// Dividend yield in percent.
pub const DIVIDEND_THRESHOLD: f64 = 2.0;
/// Always earned by anything that passed the filter, which already requires
/// the horizon. Kept so scores stay comparable with earlier results.
pub const HORIZON_BONUS: f64 = 10.0;

#[derive(Debug, Clone, Copy)]
pub struct ScoredInstrument<'a> {
    pub instrument: &'a Instrument,
    pub score: f64,
}

pub fn score(instrument: &Instrument, criteria: &Criteria) -> f64 {
    let mut score = instrument.expected_return.for_risk(criteria.risk) * RETURN_WEIGHT;

    if instrument.risk == criteria.risk {
        score += EXACT_RISK_BONUS;
    }

    if instrument.is_fund() {
        score += FUND_BONUS;
    }

    if instrument
        .expense_ratio
        .is_some_and(|er| er < LOW_FEE_THRESHOLD)
    {
        score += LOW_FEE_BONUS;
    }

    if criteria.risk == RiskLevel::Low && instrument.volatility > VOLATILITY_LIMIT {
        score -= VOLATILITY_PENALTY;
    }

    if criteria.risk == RiskLevel::Low
        && instrument
            .dividend_yield
            .is_some_and(|dy| dy > DIVIDEND_THRESHOLD)
    {
        score += DIVIDEND_BONUS;
    }

    if instrument.suits(criteria.horizon) {
        score += HORIZON_BONUS;
    }

    score
}

/// Scores every instrument and sorts best-first. The sort is stable, so equal
/// scores keep their incoming (catalog) order.
pub fn rank<'a>(instruments: Vec<&'a Instrument>, criteria: &Criteria) -> Vec<ScoredInstrument<'a>> {
    let mut scored: Vec<ScoredInstrument<'a>> = instruments
        .into_iter()
        .map(|instrument| ScoredInstrument {
            instrument,
            score: score(instrument, criteria),
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::instrument::{ExpectedReturn, Horizon, InstrumentKind};
    use crate::engine::test_instrument;

    fn criteria(horizon: Horizon, risk: RiskLevel) -> Criteria {
        Criteria {
            amount: 10_000.0,
            horizon,
            risk,
        }
    }

    fn dividend_fund() -> Instrument {
        let mut i = test_instrument(
            "schd",
            InstrumentKind::Fund,
            RiskLevel::Low,
            &[Horizon::Short, Horizon::Mid, Horizon::Long],
            100.0,
        );
        i.expected_return = ExpectedReturn {
            conservative: 4.0,
            average: 7.0,
            optimistic: 10.0,
        };
        i.expense_ratio = Some(0.06);
        i.dividend_yield = Some(3.5);
        i.volatility = 14;
        i
    }

    #[test]
    fn low_risk_fund_earns_every_conservative_bonus() {
        // 40 return + 20 exact risk + 15 fund + 10 fee + 10 dividend + 10 horizon
        let s = score(&dividend_fund(), &criteria(Horizon::Short, RiskLevel::Low));
        assert_eq!(s, 105.0);
    }

    #[test]
    fn dividend_bonus_applies_only_to_low_risk_investors() {
        // 70 return + 15 fund + 10 fee + 10 horizon; no exact-risk or dividend bonus
        let s = score(&dividend_fund(), &criteria(Horizon::Long, RiskLevel::Medium));
        assert_eq!(s, 105.0);
    }

    #[test]
    fn volatile_pick_is_penalised_for_low_risk_investors() {
        let mut i = test_instrument("t", InstrumentKind::Equity, RiskLevel::Low, &[Horizon::Mid], 25.0);
        i.expected_return.conservative = 3.0;
        i.volatility = 35;
        i.dividend_yield = Some(5.0);

        // 30 + 20 - 15 + 10 + 10
        assert_eq!(score(&i, &criteria(Horizon::Mid, RiskLevel::Low)), 55.0);

        i.volatility = VOLATILITY_LIMIT;
        assert_eq!(score(&i, &criteria(Horizon::Mid, RiskLevel::Low)), 70.0);
    }

    #[test]
    fn fee_threshold_is_strict_and_zero_counts() {
        let mut i = test_instrument("f", InstrumentKind::Fund, RiskLevel::High, &[Horizon::Long], 10.0);
        i.expected_return.optimistic = 20.0;
        let c = criteria(Horizon::Long, RiskLevel::High);

        // 200 + 20 + 15 + 10
        i.expense_ratio = Some(0.1);
        assert_eq!(score(&i, &c), 245.0);
        i.expense_ratio = Some(0.0);
        assert_eq!(score(&i, &c), 255.0);
        i.expense_ratio = None;
        assert_eq!(score(&i, &c), 245.0);
    }

    #[test]
    fn ranking_is_descending_and_stable_on_ties() {
        let a = test_instrument("a", InstrumentKind::Equity, RiskLevel::Medium, &[Horizon::Long], 1.0);
        let b = test_instrument("b", InstrumentKind::Fund, RiskLevel::Medium, &[Horizon::Long], 1.0);
        let c = test_instrument("c", InstrumentKind::Equity, RiskLevel::Medium, &[Horizon::Long], 1.0);

        let ranked = rank(vec![&a, &b, &c], &criteria(Horizon::Long, RiskLevel::Medium));
        let ids: Vec<&str> = ranked.iter().map(|s| s.instrument.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert!(ranked[0].score > ranked[1].score);
        assert_eq!(ranked[1].score, ranked[2].score);
    }
}

use crate::domain::instrument::Instrument;
use crate::domain::recommendation::Criteria;
use crate::engine::score::{DIVIDEND_THRESHOLD, LOW_FEE_THRESHOLD};

const CORE_HOLDING_ABOVE: u32 = 30;
const IMPORTANT_COMPONENT_ABOVE: u32 = 15;

/// Builds the "why this pick" sentence list for one holding at its final
/// allocation. Reasons appear in a fixed order and exactly one sizing note
/// closes the list.
pub fn rationale(instrument: &Instrument, criteria: &Criteria, allocation_percentage: u32) -> String {
    let mut reasons: Vec<String> = Vec::new();

    if instrument.is_fund() {
        reasons.push("Provides instant diversification, reducing risk".to_string());
    }

    if instrument.risk == criteria.risk {
        reasons.push(format!("Matches your {} risk tolerance", criteria.risk));
    } else if instrument.risk < criteria.risk {
        reasons.push("Adds stability to your portfolio".to_string());
    }

    if instrument.suits(criteria.horizon) {
        reasons.push(format!("Suitable for {} term investing", criteria.horizon));
    }

    if let Some(dy) = instrument.dividend_yield.filter(|dy| *dy > DIVIDEND_THRESHOLD) {
        reasons.push(format!("Provides {dy}% dividend income"));
    }

    if instrument
        .expense_ratio
        .is_some_and(|er| er < LOW_FEE_THRESHOLD)
    {
        reasons.push("Low fees maximize your returns".to_string());
    }

    let sizing = if allocation_percentage > CORE_HOLDING_ABOVE {
        "Core holding for your portfolio"
    } else if allocation_percentage > IMPORTANT_COMPONENT_ABOVE {
        "Important component for diversification"
    } else {
        "Provides additional diversification"
    };
    reasons.push(sizing.to_string());

    format!("{}.", reasons.join(". "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::instrument::{Horizon, InstrumentKind, RiskLevel};
    use crate::engine::test_instrument;

    fn criteria(horizon: Horizon, risk: RiskLevel) -> Criteria {
        Criteria {
            amount: 5_000.0,
            horizon,
            risk,
        }
    }

    #[test]
    fn bond_fund_for_conservative_investor() {
        let mut bnd = test_instrument(
            "bnd",
            InstrumentKind::Fund,
            RiskLevel::Low,
            &[Horizon::Short, Horizon::Mid, Horizon::Long],
            100.0,
        );
        bnd.dividend_yield = Some(3.4);
        bnd.expense_ratio = Some(0.03);

        assert_eq!(
            rationale(&bnd, &criteria(Horizon::Short, RiskLevel::Low), 50),
            "Provides instant diversification, reducing risk. \
             Matches your low risk tolerance. \
             Suitable for short term investing. \
             Provides 3.4% dividend income. \
             Low fees maximize your returns. \
             Core holding for your portfolio."
        );
    }

    #[test]
    fn safer_pick_reads_as_stability() {
        let mut i = test_instrument("i", InstrumentKind::Equity, RiskLevel::Medium, &[Horizon::Long], 1.0);
        i.dividend_yield = Some(2.0);

        assert_eq!(
            rationale(&i, &criteria(Horizon::Long, RiskLevel::High), 20),
            "Adds stability to your portfolio. \
             Suitable for long term investing. \
             Important component for diversification."
        );
    }

    #[test]
    fn whole_number_yield_prints_without_decimals() {
        let mut i = test_instrument("i", InstrumentKind::Equity, RiskLevel::Low, &[Horizon::Mid], 1.0);
        i.dividend_yield = Some(3.0);
        let text = rationale(&i, &criteria(Horizon::Mid, RiskLevel::Low), 10);
        assert!(text.contains("Provides 3% dividend income."));
    }

    #[test]
    fn sizing_note_boundaries_are_exclusive() {
        let i = test_instrument("i", InstrumentKind::Equity, RiskLevel::High, &[Horizon::Mid], 1.0);
        let c = criteria(Horizon::Mid, RiskLevel::High);

        let cases = [
            (31, "Core holding for your portfolio."),
            (30, "Important component for diversification."),
            (16, "Important component for diversification."),
            (15, "Provides additional diversification."),
        ];
        for (pct, suffix) in cases {
            let text = rationale(&i, &c, pct);
            assert!(text.ends_with(suffix), "{pct}: {text}");
            let notes = ["Core holding", "Important component", "additional diversification"];
            assert_eq!(notes.iter().filter(|n| text.contains(*n)).count(), 1);
        }
    }
}

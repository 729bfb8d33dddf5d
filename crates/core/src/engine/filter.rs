use crate::domain::instrument::Instrument;
use crate::domain::recommendation::Criteria;

/// An instrument is compatible when the investor can afford its minimum, it
/// suits the requested horizon, and it is no riskier than requested.
pub fn is_compatible(instrument: &Instrument, criteria: &Criteria) -> bool {
    let can_afford = instrument.minimum_investment <= criteria.amount;
    let horizon_match = instrument.suits(criteria.horizon);
    let risk_ok = instrument.risk.is_within(criteria.risk);

    can_afford && horizon_match && risk_ok
}

/// Catalog order is preserved.
pub fn compatible<'a>(instruments: &'a [Instrument], criteria: &Criteria) -> Vec<&'a Instrument> {
    instruments
        .iter()
        .filter(|i| is_compatible(i, criteria))
        .collect()
}

use crate::domain::recommendation::amount_for;
use crate::engine::allocate::Allocation;

const TARGET_TOTAL: u32 = 100;

/// Drops holdings whose amount is under the instrument minimum and rescales
/// the survivors back to exactly 100%.
///
/// Rescaling only ever raises the percentage of earlier slots, but the last
/// slot absorbs rounding and can dip, so drop-and-rescale repeats until every
/// survivor clears its minimum. Each extra pass removes at least one holding.
pub fn rebalance<'a>(mut allocations: Vec<Allocation<'a>>, total: f64) -> Vec<Allocation<'a>> {
    loop {
        let before = allocations.len();
        allocations.retain(|a| a.amount >= a.instrument.minimum_investment);
        if allocations.len() < before {
            tracing::debug!(
                dropped = before - allocations.len(),
                remaining = allocations.len(),
                "dropped holdings below minimum investment"
            );
        }

        if allocations.is_empty() {
            return allocations;
        }

        let percentages: Vec<u32> = allocations.iter().map(|a| a.percentage).collect();
        let adjusted = renormalize(&percentages);
        for (allocation, percentage) in allocations.iter_mut().zip(adjusted) {
            allocation.percentage = percentage;
            allocation.amount = amount_for(total, percentage);
        }

        if allocations
            .iter()
            .all(|a| a.amount >= a.instrument.minimum_investment)
        {
            return allocations;
        }
    }
}

/// Scales `percentages` to sum to exactly 100. Every slot but the last is
/// rounded to the nearest integer; the last takes whatever remains.
pub fn renormalize(percentages: &[u32]) -> Vec<u32> {
    let current: u32 = percentages.iter().sum();
    if current == TARGET_TOTAL || current == 0 {
        return percentages.to_vec();
    }

    let factor = f64::from(TARGET_TOTAL) / f64::from(current);
    let last = percentages.len() - 1;
    let mut running: u32 = 0;
    let mut out = Vec::with_capacity(percentages.len());

    for &p in &percentages[..last] {
        let adjusted = (f64::from(p) * factor).round() as u32;
        running += adjusted;
        out.push(adjusted);
    }
    out.push(TARGET_TOTAL.saturating_sub(running));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::instrument::{Horizon, Instrument, InstrumentKind, RiskLevel};
    use crate::engine::test_instrument;

    fn holding(min: f64) -> Instrument {
        test_instrument("h", InstrumentKind::Fund, RiskLevel::Low, &[Horizon::Long], min)
    }

    fn allocations<'a>(items: &'a [Instrument], pcts: &[u32], total: f64) -> Vec<Allocation<'a>> {
        items
            .iter()
            .zip(pcts)
            .map(|(instrument, &percentage)| Allocation {
                instrument,
                percentage,
                amount: amount_for(total, percentage),
            })
            .collect()
    }

    #[test]
    fn renormalize_gives_remainder_to_last_slot() {
        assert_eq!(renormalize(&[50, 30]), vec![63, 37]); // 62.5 rounds up
        assert_eq!(renormalize(&[5, 5, 5]), vec![33, 33, 34]);
        assert_eq!(renormalize(&[30, 20, 15, 15, 10, 5]), vec![32, 21, 16, 16, 11, 4]);
        assert_eq!(renormalize(&[40, 30, 20, 10]), vec![40, 30, 20, 10]);
        assert_eq!(renormalize(&[20]), vec![100]);
    }

    #[test]
    fn untouched_when_everything_clears_minimum() {
        let items = vec![holding(10.0), holding(10.0), holding(10.0)];
        let out = rebalance(allocations(&items, &[50, 30, 20], 1_000.0), 1_000.0);
        let pcts: Vec<u32> = out.iter().map(|a| a.percentage).collect();
        assert_eq!(pcts, vec![50, 30, 20]);
        assert_eq!(out[2].amount, 200.0);
    }

    #[test]
    fn drops_underfunded_holding_and_rescales_the_rest() {
        // 1000 * 20% = 200 < 250
        let items = vec![holding(100.0), holding(100.0), holding(250.0)];
        let out = rebalance(allocations(&items, &[50, 30, 20], 1_000.0), 1_000.0);

        let pcts: Vec<u32> = out.iter().map(|a| a.percentage).collect();
        assert_eq!(pcts, vec![63, 37]);
        assert_eq!(out[0].amount, 630.0);
        assert_eq!(out[1].amount, 370.0);
    }

    #[test]
    fn everything_dropped_yields_empty() {
        let items = vec![holding(900.0), holding(900.0), holding(900.0)];
        let out = rebalance(allocations(&items, &[50, 30, 20], 1_000.0), 1_000.0);
        assert!(out.is_empty());
    }

    #[test]
    fn repeats_when_last_slot_falls_under_its_minimum() {
        // Six holdings read [30, 20, 15, 15, 10, 5] (sum 95). Rescaling hands
        // the last slot 4% = 40, under its minimum of 45, so a second pass
        // drops it and rescales [32, 21, 16, 16, 11].
        let items = vec![
            holding(1.0),
            holding(1.0),
            holding(1.0),
            holding(1.0),
            holding(1.0),
            holding(45.0),
        ];
        let out = rebalance(
            allocations(&items, &[30, 20, 15, 15, 10, 5], 1_000.0),
            1_000.0,
        );

        let pcts: Vec<u32> = out.iter().map(|a| a.percentage).collect();
        assert_eq!(pcts, vec![33, 22, 17, 17, 11]);
        for a in &out {
            assert!(a.amount >= a.instrument.minimum_investment);
        }
    }
}

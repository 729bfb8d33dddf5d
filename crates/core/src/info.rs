//! Static copy shown next to the horizon and risk pickers.

use crate::domain::instrument::{Horizon, RiskLevel};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HorizonInfo {
    pub duration: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskLevelInfo {
    pub description: &'static str,
    pub expected_return: &'static str,
    pub volatility: &'static str,
}

pub fn time_period_info() -> BTreeMap<Horizon, HorizonInfo> {
    BTreeMap::from([
        (
            Horizon::Short,
            HorizonInfo {
                duration: "1-2 years",
                description: "Best for emergency funds or money you'll need soon. Lower risk, lower returns.",
            },
        ),
        (
            Horizon::Mid,
            HorizonInfo {
                duration: "3-7 years",
                description: "Good for goals like buying a house or car. Balanced risk and return potential.",
            },
        ),
        (
            Horizon::Long,
            HorizonInfo {
                duration: "8+ years",
                description: "Ideal for retirement or long-term wealth building. Higher growth potential over time.",
            },
        ),
    ])
}

pub fn risk_level_info() -> BTreeMap<RiskLevel, RiskLevelInfo> {
    BTreeMap::from([
        (
            RiskLevel::Low,
            RiskLevelInfo {
                description: "Conservative approach with focus on preserving capital and steady income.",
                expected_return: "3-6% annually",
                volatility: "Low price swings, more predictable returns",
            },
        ),
        (
            RiskLevel::Medium,
            RiskLevelInfo {
                description: "Balanced approach seeking moderate growth with reasonable stability.",
                expected_return: "6-10% annually",
                volatility: "Moderate price swings, some ups and downs expected",
            },
        ),
        (
            RiskLevel::High,
            RiskLevelInfo {
                description: "Aggressive approach targeting maximum growth, accepting significant volatility.",
                expected_return: "10-15%+ annually (with higher risk of losses)",
                volatility: "High price swings, expect significant ups and downs",
            },
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_cover_every_choice_in_order() {
        let horizons: Vec<Horizon> = time_period_info().into_keys().collect();
        assert_eq!(horizons, Horizon::ALL.to_vec());

        let risks: Vec<RiskLevel> = risk_level_info().into_keys().collect();
        assert_eq!(risks, RiskLevel::ALL.to_vec());
    }

    #[test]
    fn serializes_with_snake_case_keys() {
        let v = serde_json::to_value(risk_level_info()).unwrap();
        assert_eq!(v["medium"]["expected_return"], "6-10% annually");

        let v = serde_json::to_value(time_period_info()).unwrap();
        assert_eq!(v["long"]["duration"], "8+ years");
    }
}

use crate::domain::instrument::{Horizon, RiskLevel};
use crate::domain::recommendation::Criteria;
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};

/// Untyped criteria as they arrive from a form, an HTTP body or the command
/// line. The engine never sees this; it is checked here and turned into
/// [`Criteria`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriteriaRequest {
    pub amount: f64,
    pub horizon: String,
    pub risk: String,
}

impl CriteriaRequest {
    pub fn validate_and_into_criteria(self) -> anyhow::Result<Criteria> {
        ensure!(
            self.amount.is_finite(),
            "amount must be a finite number (got {})",
            self.amount
        );
        ensure!(
            self.amount > 0.0,
            "amount must be greater than zero (got {})",
            self.amount
        );

        let horizon = self
            .horizon
            .parse::<Horizon>()
            .context("invalid horizon")?;
        let risk = self.risk.parse::<RiskLevel>().context("invalid risk")?;

        Ok(Criteria {
            amount: self.amount,
            horizon,
            risk,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(amount: f64, horizon: &str, risk: &str) -> CriteriaRequest {
        CriteriaRequest {
            amount,
            horizon: horizon.to_string(),
            risk: risk.to_string(),
        }
    }

    #[test]
    fn accepts_well_formed_request() {
        let v = json!({"amount": 2500.0, "horizon": "mid-term", "risk": "medium"});
        let req: CriteriaRequest = serde_json::from_value(v).unwrap();
        let criteria = req.validate_and_into_criteria().unwrap();
        assert_eq!(criteria.amount, 2500.0);
        assert_eq!(criteria.horizon, Horizon::Mid);
        assert_eq!(criteria.risk, RiskLevel::Medium);
    }

    #[test]
    fn rejects_zero_and_negative_amounts() {
        let err = request(0.0, "short", "low")
            .validate_and_into_criteria()
            .unwrap_err();
        assert!(err.to_string().contains("greater than zero"));
        assert!(request(-50.0, "short", "low")
            .validate_and_into_criteria()
            .is_err());
        assert!(request(f64::NAN, "short", "low")
            .validate_and_into_criteria()
            .is_err());
    }

    #[test]
    fn rejects_unknown_enum_values() {
        let err = request(100.0, "someday", "low")
            .validate_and_into_criteria()
            .unwrap_err();
        assert!(format!("{err:#}").contains("someday"));
        assert!(request(100.0, "short", "yolo")
            .validate_and_into_criteria()
            .is_err());
    }
}

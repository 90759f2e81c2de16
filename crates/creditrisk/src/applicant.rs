//! Typed applicant profile for the CR22 bureau attributes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bands::long_term_delinquency_count;
use crate::record::RawRecord;

/// Raw field names produced by [`ApplicantProfile::to_record`].
pub mod fields {
    pub const SCORE_CR22: &str = "SCORE_CR22";
    pub const DEROGATORIES: &str = "DEROGATORIES";
    pub const LATE_PAYMENT_30DPD_LAST_12M: &str = "Late_Payment_30DPD_Last_12M";
    pub const LATE_PAYMENT_30DPD_LAST_24M: &str = "Late_Payment_30DPD_Last_24M";
    pub const LONG_TERM_PAYMENT_DELINQUENCY_COUNT: &str = "Long_Term_Payment_Delinquency_Count";
    pub const CREDIT_CARD_PAYMENT_FAILURE_COUNT: &str = "Credit_Card_Payment_Failure_Count";
    pub const RECENT_PAYMENT_IRREGULARITY_FLAG: &str = "Recent_Payment_Irregularity_Flag";
    pub const CREDIT_CARD_CR22: &str = "CREDIT_CARD_CR22";
    pub const DEFAULT_CNT_CR22: &str = "DEFAULT_CNT_CR22";
    pub const DEFAULT_OPEN_CNT_CR22: &str = "DEFAULT_OPEN_CNT_CR22";
}

/// Bureau attributes collected for one applicant.
///
/// The long-term delinquency count is not an input: it is derived from the
/// two late-payment counts when the record is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantProfile {
    /// CR22 bureau score.
    pub score_cr22: i64,
    pub derogatories: u32,
    /// Payments 30+ days past due in the last 12 months.
    pub late_payments_12m: u32,
    /// Payments 30+ days past due in the last 24 months.
    pub late_payments_24m: u32,
    pub credit_card_payment_failures: u32,
    /// Months since the most recent payment irregularity.
    pub recent_payment_irregularity: u32,
    pub active_credit_cards: u32,
    pub total_defaults: u32,
    pub open_defaults: u32,
    /// Categorical status fields (e.g. `RESIDENTIAL`, `SCORECARD`).
    #[serde(default)]
    pub categorical: BTreeMap<String, String>,
}

impl Default for ApplicantProfile {
    fn default() -> Self {
        Self {
            score_cr22: 650,
            derogatories: 0,
            late_payments_12m: 0,
            late_payments_24m: 0,
            credit_card_payment_failures: 0,
            recent_payment_irregularity: 0,
            active_credit_cards: 1,
            total_defaults: 0,
            open_defaults: 0,
            categorical: BTreeMap::new(),
        }
    }
}

impl ApplicantProfile {
    /// Derived long-term delinquency count.
    pub fn long_term_delinquency(&self) -> u32 {
        long_term_delinquency_count(self.late_payments_12m, self.late_payments_24m)
    }

    /// Set a categorical field.
    pub fn with_category(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.categorical.insert(field.into(), value.into());
        self
    }

    /// Build the raw record scored by the model.
    pub fn to_record(&self) -> RawRecord {
        let mut record = RawRecord::new()
            .with(fields::SCORE_CR22, self.score_cr22)
            .with(fields::DEROGATORIES, self.derogatories)
            .with(fields::LATE_PAYMENT_30DPD_LAST_12M, self.late_payments_12m)
            .with(fields::LATE_PAYMENT_30DPD_LAST_24M, self.late_payments_24m)
            .with(
                fields::LONG_TERM_PAYMENT_DELINQUENCY_COUNT,
                self.long_term_delinquency(),
            )
            .with(
                fields::CREDIT_CARD_PAYMENT_FAILURE_COUNT,
                self.credit_card_payment_failures,
            )
            .with(
                fields::RECENT_PAYMENT_IRREGULARITY_FLAG,
                self.recent_payment_irregularity,
            )
            .with(fields::CREDIT_CARD_CR22, self.active_credit_cards)
            .with(fields::DEFAULT_CNT_CR22, self.total_defaults)
            .with(fields::DEFAULT_OPEN_CNT_CR22, self.open_defaults);

        for (field, value) in &self.categorical {
            record.insert(field.as_str(), value.as_str());
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;

    #[test]
    fn record_has_all_numeric_fields() {
        let record = ApplicantProfile::default().to_record();
        assert_eq!(record.len(), 10);
        assert_eq!(record.get(fields::SCORE_CR22), Some(&FieldValue::Numeric(650.0)));
        assert_eq!(record.get(fields::CREDIT_CARD_CR22), Some(&FieldValue::Numeric(1.0)));
    }

    #[test]
    fn derives_long_term_delinquency() {
        let profile = ApplicantProfile {
            late_payments_12m: 3,
            late_payments_24m: 2,
            ..Default::default()
        };
        let record = profile.to_record();
        assert_eq!(
            record
                .get(fields::LONG_TERM_PAYMENT_DELINQUENCY_COUNT)
                .and_then(FieldValue::as_f64),
            Some(4.0)
        );
    }

    #[test]
    fn categoricals_are_carried() {
        let record = ApplicantProfile::default()
            .with_category("RESIDENTIAL", "RENT")
            .to_record();
        assert_eq!(record.len(), 11);
        assert!(record.get("RESIDENTIAL").unwrap().is_categorical());
    }

    #[test]
    fn deserializes_with_default_categoricals() {
        let profile: ApplicantProfile = serde_json::from_str(
            r#"{"score_cr22": 700, "derogatories": 1, "late_payments_12m": 0,
                "late_payments_24m": 0, "credit_card_payment_failures": 0,
                "recent_payment_irregularity": 0, "active_credit_cards": 2,
                "total_defaults": 0, "open_defaults": 0}"#,
        )
        .unwrap();
        assert_eq!(profile.score_cr22, 700);
        assert!(profile.categorical.is_empty());
    }
}

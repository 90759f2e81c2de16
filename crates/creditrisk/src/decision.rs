//! Threshold decision over the "Bad" class probability.
//!
//! The threshold is business policy, not a model property: the default of
//! 0.3 labels more applicants "Bad" than the model's natural 0.5 boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::align::AlignedRecord;
use crate::error::{Result, RiskError};
use crate::model::{BAD_CLASS, Classifier};

/// Default probability cutoff for a "Bad" decision.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Binary decision label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLabel {
    Good,
    Bad,
}

impl RiskLabel {
    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Bad => "Bad",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Model output for one applicant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    /// Probability of the "Bad" class, in `[0, 1]`.
    pub prob_bad: f64,
    pub label: RiskLabel,
    /// Cutoff the label was decided against.
    pub threshold: f64,
}

/// Maps a "Bad" probability to a label: `Bad` iff `prob_bad >= threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionPolicy {
    threshold: f64,
}

impl DecisionPolicy {
    /// Create a policy. The threshold must already be validated to `[0, 1]`;
    /// see [`crate::config::PredictorConfig`].
    pub(crate) fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Cutoff for a "Bad" decision.
    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Label for a given "Bad" probability.
    #[inline]
    pub fn label(&self, prob_bad: f64) -> RiskLabel {
        if prob_bad >= self.threshold {
            RiskLabel::Bad
        } else {
            RiskLabel::Good
        }
    }

    /// Score an aligned record and apply the threshold.
    ///
    /// # Errors
    ///
    /// Propagates classifier failures as [`RiskError::Inference`], and fails
    /// the same way if the classifier returns a probability outside `[0, 1]`.
    pub fn decide<C: Classifier + ?Sized>(
        &self,
        classifier: &C,
        record: &AlignedRecord,
    ) -> Result<Prediction> {
        let proba = classifier.predict_proba(record.values())?;
        let prob_bad = proba[BAD_CLASS];
        if !(0.0..=1.0).contains(&prob_bad) {
            return Err(RiskError::inference(format!(
                "classifier returned invalid probability {prob_bad}"
            )));
        }

        Ok(Prediction {
            prob_bad,
            label: self.label(prob_bad),
            threshold: self.threshold,
        })
    }
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, RiskLabel::Good)]
    #[case(0.299_999, RiskLabel::Good)]
    #[case(0.3, RiskLabel::Bad)]
    #[case(0.5, RiskLabel::Bad)]
    #[case(1.0, RiskLabel::Bad)]
    fn default_threshold_labels(#[case] prob: f64, #[case] expected: RiskLabel) {
        assert_eq!(DecisionPolicy::default().label(prob), expected);
    }

    #[test]
    fn label_is_monotone_in_probability() {
        let policy = DecisionPolicy::new(0.42);
        let mut seen_bad = false;
        for i in 0..=1000 {
            let label = policy.label(f64::from(i) / 1000.0);
            if seen_bad {
                assert_eq!(label, RiskLabel::Bad);
            }
            seen_bad |= label == RiskLabel::Bad;
        }
        assert!(seen_bad);
    }

    #[test]
    fn label_display() {
        assert_eq!(RiskLabel::Bad.to_string(), "Bad");
        assert_eq!(serde_json::to_string(&RiskLabel::Good).unwrap(), r#""Good""#);
    }
}

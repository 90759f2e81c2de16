//! Test fixtures.
//!
//! Small in-memory bundles and a fake classifier so scoring code can be
//! exercised without a trained artifact on disk.

use std::sync::Arc;

use ndarray::{Array1, ArrayView1};

use crate::applicant::fields;
use crate::bundle::{BundleMeta, ModelBundle};
use crate::encode::CategoryLevels;
use crate::error::Result;
use crate::model::{Classifier, LogisticModel, check_width};
use crate::scaler::StandardScaler;
use crate::schema::FeatureSchema;

/// Feature columns of the fixture bundle, in training order.
///
/// Baselines dropped at training time: `RESIDENTIAL_OWNER`, `SCORECARD_A`.
pub const FIXTURE_FEATURES: [&str; 14] = [
    fields::SCORE_CR22,
    fields::DEROGATORIES,
    fields::LATE_PAYMENT_30DPD_LAST_12M,
    fields::LATE_PAYMENT_30DPD_LAST_24M,
    fields::LONG_TERM_PAYMENT_DELINQUENCY_COUNT,
    fields::CREDIT_CARD_PAYMENT_FAILURE_COUNT,
    fields::RECENT_PAYMENT_IRREGULARITY_FLAG,
    fields::CREDIT_CARD_CR22,
    fields::DEFAULT_CNT_CR22,
    fields::DEFAULT_OPEN_CNT_CR22,
    "RESIDENTIAL_OTHER",
    "RESIDENTIAL_RENT",
    "SCORECARD_B",
    "SCORECARD_C",
];

/// Logistic regression bundle over [`FIXTURE_FEATURES`].
///
/// Scales the score and the two late-payment counts; knows the levels of
/// `RESIDENTIAL` and `SCORECARD`.
pub fn fixture_bundle() -> ModelBundle {
    let schema = Arc::new(FeatureSchema::new(FIXTURE_FEATURES).expect("fixture schema is valid"));

    let scaler = StandardScaler::new(
        &schema,
        vec![
            fields::SCORE_CR22.into(),
            fields::LATE_PAYMENT_30DPD_LAST_12M.into(),
            fields::LATE_PAYMENT_30DPD_LAST_24M.into(),
        ],
        vec![640.0, 0.6, 1.1],
        vec![85.0, 1.2, 1.9],
    )
    .expect("fixture scaler is valid");

    let mut levels = CategoryLevels::new();
    levels.insert("RESIDENTIAL", ["OWNER", "OTHER", "RENT"]);
    levels.insert("SCORECARD", ["A", "B", "C"]);

    let coefficients = Array1::from(vec![
        -0.9, 0.35, 0.4, 0.3, 0.25, 0.3, -0.02, -0.05, 0.6, 0.8, 0.15, 0.2, 0.1, 0.3,
    ]);
    let model = LogisticModel::new(coefficients, -1.1).into();

    ModelBundle::new(schema, scaler, levels, model)
        .expect("fixture bundle is consistent")
        .with_meta(BundleMeta {
            name: Some("cr22-fixture".into()),
            description: Some("hand-built logistic fixture".into()),
        })
}

/// Classifier that returns the same probability for every row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedProbability {
    prob_bad: f64,
    n_features: usize,
}

impl FixedProbability {
    /// The probability is returned as-is, even outside `[0, 1]`.
    pub fn new(prob_bad: f64, n_features: usize) -> Self {
        Self {
            prob_bad,
            n_features,
        }
    }
}

impl Classifier for FixedProbability {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, row: ArrayView1<'_, f64>) -> Result<[f64; 2]> {
        check_width(&row, self.n_features)?;
        Ok([1.0 - self.prob_bad, self.prob_bad])
    }
}

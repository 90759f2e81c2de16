//! Pre-trained binary classifiers.
//!
//! # Key Types
//!
//! - [`Classifier`] - probability estimation over one aligned row
//! - [`Model`] - the concrete classifiers a bundle can carry
//! - [`LogisticModel`] - linear log-odds with a sigmoid link
//! - [`TreeEnsemble`] - boosted or averaged decision trees
//!
//! Class `0` is "Good" and class `1` is "Bad".

mod forest;
mod logistic;

pub use forest::{Aggregation, Tree, TreeEnsemble};
pub use logistic::LogisticModel;

use ndarray::ArrayView1;

use crate::error::{Result, RiskError};

/// Index of the "Bad" class in [`Classifier::predict_proba`] output.
pub const BAD_CLASS: usize = 1;

/// Binary probability estimator over a schema-ordered row.
///
/// Implementations must be pure: the same row always yields the same
/// probabilities, and no internal state changes between calls.
pub trait Classifier: Send + Sync {
    /// Number of input columns the classifier expects.
    fn n_features(&self) -> usize;

    /// Class probabilities `[P(good), P(bad)]` for one row.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::Inference`] if the row width does not match
    /// [`n_features`](Self::n_features).
    fn predict_proba(&self, row: ArrayView1<'_, f64>) -> Result<[f64; 2]>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn n_features(&self) -> usize {
        (**self).n_features()
    }

    fn predict_proba(&self, row: ArrayView1<'_, f64>) -> Result<[f64; 2]> {
        (**self).predict_proba(row)
    }
}

impl<C: Classifier + ?Sized> Classifier for std::sync::Arc<C> {
    fn n_features(&self) -> usize {
        (**self).n_features()
    }

    fn predict_proba(&self, row: ArrayView1<'_, f64>) -> Result<[f64; 2]> {
        (**self).predict_proba(row)
    }
}

/// Any classifier a model bundle can carry.
#[derive(Debug, Clone)]
pub enum Model {
    Logistic(LogisticModel),
    TreeEnsemble(TreeEnsemble),
}

impl Model {
    /// Short kind name for logs and inspection.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Logistic(_) => "logistic",
            Self::TreeEnsemble(_) => "tree_ensemble",
        }
    }
}

impl Classifier for Model {
    fn n_features(&self) -> usize {
        match self {
            Self::Logistic(m) => m.n_features(),
            Self::TreeEnsemble(m) => m.n_features(),
        }
    }

    fn predict_proba(&self, row: ArrayView1<'_, f64>) -> Result<[f64; 2]> {
        match self {
            Self::Logistic(m) => m.predict_proba(row),
            Self::TreeEnsemble(m) => m.predict_proba(row),
        }
    }
}

impl From<LogisticModel> for Model {
    fn from(m: LogisticModel) -> Self {
        Self::Logistic(m)
    }
}

impl From<TreeEnsemble> for Model {
    fn from(m: TreeEnsemble) -> Self {
        Self::TreeEnsemble(m)
    }
}

/// Fail with [`RiskError::Inference`] unless `row` has `expected` columns.
#[inline]
pub(crate) fn check_width(row: &ArrayView1<'_, f64>, expected: usize) -> Result<()> {
    if row.len() != expected {
        return Err(RiskError::inference(format!(
            "row has {} columns, classifier expects {expected}",
            row.len()
        )));
    }
    Ok(())
}

/// Numerically stable sigmoid.
/// Clamps input to [-500, 500] to prevent overflow.
#[inline]
pub(crate) fn sigmoid(x: f64) -> f64 {
    let clamped = x.clamp(-500.0, 500.0);
    if clamped >= 0.0 {
        1.0 / (1.0 + (-clamped).exp())
    } else {
        let e = clamped.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn sigmoid_reference_points() {
        assert_abs_diff_eq!(sigmoid(0.0), 0.5);
        assert_abs_diff_eq!(sigmoid(2.0), 0.880_797_077_977_882_3, epsilon = 1e-12);
        assert_abs_diff_eq!(sigmoid(-2.0), 0.119_202_922_022_117_7, epsilon = 1e-12);
    }

    #[test]
    fn sigmoid_saturates_without_nan() {
        assert_abs_diff_eq!(sigmoid(1e6), 1.0);
        assert_abs_diff_eq!(sigmoid(-1e6), 0.0);
    }

    #[test]
    fn model_dispatch() {
        let model = Model::from(LogisticModel::new(array![1.0, -1.0], 0.0));
        assert_eq!(model.kind(), "logistic");
        assert_eq!(model.n_features(), 2);

        let [good, bad] = model.predict_proba(array![1.0, 1.0].view()).unwrap();
        assert_abs_diff_eq!(bad, 0.5);
        assert_abs_diff_eq!(good + bad, 1.0);
    }

    #[test]
    fn width_mismatch_is_inference_error() {
        let model = Model::from(LogisticModel::new(array![1.0, -1.0], 0.0));
        let err = model.predict_proba(array![1.0].view()).unwrap_err();
        assert!(matches!(err, RiskError::Inference(_)));
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn models_are_send_sync() {
        assert_send_sync::<Model>();
        assert_send_sync::<Box<dyn Classifier>>();
    }
}

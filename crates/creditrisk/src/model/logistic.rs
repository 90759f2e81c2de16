//! Logistic regression.

use ndarray::{Array1, ArrayView1};

use super::{Classifier, check_width, sigmoid};
use crate::error::Result;

/// Binary logistic regression: `P(bad) = sigmoid(w · x + b)`.
///
/// # Example
///
/// ```
/// use creditrisk::model::{Classifier, LogisticModel};
/// use ndarray::array;
///
/// let model = LogisticModel::new(array![0.5, -0.25], 0.1);
/// let [good, bad] = model.predict_proba(array![1.0, 2.0].view()).unwrap();
/// assert!((good + bad - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LogisticModel {
    /// One coefficient per input column.
    coefficients: Array1<f64>,
    intercept: f64,
}

impl LogisticModel {
    /// Create a model from coefficients and intercept.
    pub fn new(coefficients: Array1<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    /// Coefficients in schema order.
    pub fn coefficients(&self) -> ArrayView1<'_, f64> {
        self.coefficients.view()
    }

    /// Intercept term.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Raw log-odds of the "Bad" class.
    #[inline]
    pub fn decision_function(&self, row: ArrayView1<'_, f64>) -> f64 {
        self.coefficients.dot(&row) + self.intercept
    }
}

impl Classifier for LogisticModel {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict_proba(&self, row: ArrayView1<'_, f64>) -> Result<[f64; 2]> {
        check_width(&row, self.coefficients.len())?;
        let bad = sigmoid(self.decision_function(row));
        Ok([1.0 - bad, bad])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn decision_function_is_affine() {
        let model = LogisticModel::new(array![2.0, -1.0, 0.5], -0.5);
        let margin = model.decision_function(array![1.0, 3.0, 4.0].view());
        // 2 - 3 + 2 - 0.5
        assert_abs_diff_eq!(margin, 0.5);
    }

    #[test]
    fn probabilities_follow_margin() {
        let model = LogisticModel::new(array![1.0], 0.0);
        let [_, low] = model.predict_proba(array![-3.0].view()).unwrap();
        let [_, high] = model.predict_proba(array![3.0].view()).unwrap();
        assert!(low < 0.5 && high > 0.5);
        assert_abs_diff_eq!(low + high, 1.0, epsilon = 1e-12);
    }
}

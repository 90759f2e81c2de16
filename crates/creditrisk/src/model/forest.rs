//! Decision tree ensembles.
//!
//! Trees are stored structure-of-arrays: node `i` is described by the `i`-th
//! entry of each array. Node 0 is the root and every child index is greater
//! than its parent's, so traversal always terminates.

use ndarray::ArrayView1;

use super::{Classifier, check_width, sigmoid};
use crate::error::{Result, RiskError};

/// How per-tree leaf values combine into `P(bad)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aggregation {
    /// Gradient boosting: leaves are log-odds contributions (learning rate
    /// already applied); `P(bad) = sigmoid(base_score + Σ leaf)`.
    Boosted { base_score: f64 },
    /// Bagging: leaves are `P(bad)` estimates; the ensemble averages them.
    Averaged,
}

/// A single binary decision tree.
///
/// Numeric split: go left when `x <= threshold`, right otherwise. Missing
/// (NaN) values follow `default_left`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    split_features: Vec<u32>,
    thresholds: Vec<f64>,
    children_left: Vec<u32>,
    children_right: Vec<u32>,
    default_left: Vec<bool>,
    is_leaf: Vec<bool>,
    /// Leaf outputs; ignored for internal nodes.
    values: Vec<f64>,
}

impl Tree {
    /// Build a tree from its node arrays.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::SchemaMismatch`] if the arrays differ in length,
    /// the tree is empty, a child index is out of bounds or does not point
    /// forward, or a leaf value is not finite.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        split_features: Vec<u32>,
        thresholds: Vec<f64>,
        children_left: Vec<u32>,
        children_right: Vec<u32>,
        default_left: Vec<bool>,
        is_leaf: Vec<bool>,
        values: Vec<f64>,
    ) -> Result<Self> {
        let n = is_leaf.len();
        if n == 0 {
            return Err(RiskError::schema("tree has no nodes"));
        }
        let lens = [
            split_features.len(),
            thresholds.len(),
            children_left.len(),
            children_right.len(),
            default_left.len(),
            values.len(),
        ];
        if lens.iter().any(|&len| len != n) {
            return Err(RiskError::schema(format!(
                "tree node arrays have inconsistent lengths: {lens:?}, expected {n}"
            )));
        }

        for node in 0..n {
            if is_leaf[node] {
                if !values[node].is_finite() {
                    return Err(RiskError::schema(format!(
                        "leaf {node} has a non-finite value"
                    )));
                }
                continue;
            }
            for child in [children_left[node], children_right[node]] {
                let child = child as usize;
                if child <= node || child >= n {
                    return Err(RiskError::schema(format!(
                        "node {node} references invalid child {child} (tree has {n} nodes)"
                    )));
                }
            }
            if thresholds[node].is_nan() {
                return Err(RiskError::schema(format!("node {node} has a NaN threshold")));
            }
        }

        Ok(Self {
            split_features,
            thresholds,
            children_left,
            children_right,
            default_left,
            is_leaf,
            values,
        })
    }

    /// A tree with a single leaf.
    pub fn leaf(value: f64) -> Self {
        Self {
            split_features: vec![0],
            thresholds: vec![0.0],
            children_left: vec![0],
            children_right: vec![0],
            default_left: vec![true],
            is_leaf: vec![true],
            values: vec![value],
        }
    }

    /// A depth-one tree: `feature <= threshold ? left : right`.
    pub fn stump(feature: u32, threshold: f64, left: f64, right: f64) -> Self {
        Self {
            split_features: vec![feature, 0, 0],
            thresholds: vec![threshold, 0.0, 0.0],
            children_left: vec![1, 0, 0],
            children_right: vec![2, 0, 0],
            default_left: vec![true, true, true],
            is_leaf: vec![false, true, true],
            values: vec![0.0, left, right],
        }
    }

    /// Number of nodes.
    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    pub fn split_features(&self) -> &[u32] {
        &self.split_features
    }

    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    pub fn children_left(&self) -> &[u32] {
        &self.children_left
    }

    pub fn children_right(&self) -> &[u32] {
        &self.children_right
    }

    pub fn default_left(&self) -> &[bool] {
        &self.default_left
    }

    pub fn is_leaf(&self) -> &[bool] {
        &self.is_leaf
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Largest feature index used by a split, if any.
    pub fn max_split_feature(&self) -> Option<u32> {
        (0..self.n_nodes())
            .filter(|&i| !self.is_leaf[i])
            .map(|i| self.split_features[i])
            .max()
    }

    /// Leaf values reached by this tree's splits.
    fn leaf_values(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.n_nodes())
            .filter(|&i| self.is_leaf[i])
            .map(|i| self.values[i])
    }

    /// Walk from the root to a leaf and return its value.
    #[inline]
    pub fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut node = 0usize;
        while !self.is_leaf[node] {
            let x = row[self.split_features[node] as usize];
            let go_left = if x.is_nan() {
                self.default_left[node]
            } else {
                x <= self.thresholds[node]
            };
            node = if go_left {
                self.children_left[node]
            } else {
                self.children_right[node]
            } as usize;
        }
        self.values[node]
    }
}

/// Ensemble of decision trees producing a binary probability.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsemble {
    trees: Vec<Tree>,
    n_features: usize,
    aggregation: Aggregation,
}

impl TreeEnsemble {
    /// Build an ensemble over rows of `n_features` columns.
    ///
    /// # Errors
    ///
    /// Returns [`RiskError::SchemaMismatch`] if there are no trees, a split
    /// references a column at or beyond `n_features`, a leaf value is not
    /// finite, or an averaged ensemble has a leaf outside `[0, 1]`.
    pub fn new(trees: Vec<Tree>, n_features: usize, aggregation: Aggregation) -> Result<Self> {
        if trees.is_empty() {
            return Err(RiskError::schema("tree ensemble has no trees"));
        }

        for (i, tree) in trees.iter().enumerate() {
            if let Some(feature) = tree.max_split_feature()
                && feature as usize >= n_features
            {
                return Err(RiskError::schema(format!(
                    "tree {i} splits on column {feature}, schema has {n_features} columns"
                )));
            }
            if tree.leaf_values().any(|v| !v.is_finite()) {
                return Err(RiskError::schema(format!("tree {i} has a non-finite leaf value")));
            }
            if aggregation == Aggregation::Averaged
                && tree.leaf_values().any(|v| !(0.0..=1.0).contains(&v))
            {
                return Err(RiskError::schema(format!(
                    "tree {i} has a leaf probability outside [0, 1]"
                )));
            }
        }

        if let Aggregation::Boosted { base_score } = aggregation
            && !base_score.is_finite()
        {
            return Err(RiskError::schema("boosted ensemble base score is not finite"));
        }

        Ok(Self {
            trees,
            n_features,
            aggregation,
        })
    }

    /// Trees in ensemble order.
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Number of trees.
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Aggregation rule.
    pub fn aggregation(&self) -> Aggregation {
        self.aggregation
    }
}

impl Classifier for TreeEnsemble {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, row: ArrayView1<'_, f64>) -> Result<[f64; 2]> {
        check_width(&row, self.n_features)?;

        let sum: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
        let bad = match self.aggregation {
            Aggregation::Boosted { base_score } => sigmoid(base_score + sum),
            Aggregation::Averaged => sum / self.trees.len() as f64,
        };

        if !(0.0..=1.0).contains(&bad) {
            return Err(RiskError::inference(format!(
                "tree ensemble produced invalid probability {bad}"
            )));
        }
        Ok([1.0 - bad, bad])
    }
}

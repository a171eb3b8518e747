//! Stage-1 estimator: a pre-trained random-forest regressor.
//!
//! The forest consumes a flattened window of normalized counts and emits one
//! scalar point estimate. Trees are stored in the flattened node-array layout
//! the training pipeline exports (parallel arrays indexed by node id, with
//! negative feature ids marking leaves): evaluation is a simple index walk
//! with no allocation.

use serde::{Deserialize, Serialize};

use super::error::ForecastError;

/// A single regression tree in flattened node-array form.
///
/// All arrays have one entry per node. Internal nodes split on
/// `x[feature] <= threshold`, descending to `children_left` on true and
/// `children_right` on false. A node with `feature < 0` is a leaf and `value`
/// holds its output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f64>,
    pub value: Vec<f64>,
}

impl DecisionTree {
    /// Check that the parallel arrays agree and every child index is a valid
    /// node id.
    fn validate(&self, n_features: usize) -> Result<(), ForecastError> {
        let n = self.feature.len();
        if n == 0 {
            return Err(ForecastError::Artifact("tree has no nodes".to_string()));
        }
        if self.children_left.len() != n
            || self.children_right.len() != n
            || self.threshold.len() != n
            || self.value.len() != n
        {
            return Err(ForecastError::Artifact(
                "tree node arrays have mismatched lengths".to_string(),
            ));
        }
        for i in 0..n {
            let f = self.feature[i];
            if f >= 0 {
                if f as usize >= n_features {
                    return Err(ForecastError::Artifact(format!(
                        "tree node {i} splits on feature {f}, but input width is {n_features}"
                    )));
                }
                for &child in [self.children_left[i], self.children_right[i]].iter() {
                    if child < 0 || child as usize >= n {
                        return Err(ForecastError::Artifact(format!(
                            "tree node {i} has out-of-range child {child}"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk the tree for one input vector.
    fn evaluate(&self, x: &[f64]) -> f64 {
        let mut idx = 0usize;
        while self.feature[idx] >= 0 {
            let f = self.feature[idx] as usize;
            idx = if x[f] <= self.threshold[idx] {
                self.children_left[idx] as usize
            } else {
                self.children_right[idx] as usize
            };
        }
        self.value[idx]
    }
}

/// A pre-trained random-forest regressor.
///
/// Deterministic given identical weights and input; no internal state is
/// mutated by prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    /// Expected input width (the flattened window length).
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

impl RandomForestRegressor {
    /// Build a forest from trees, validating every tree against the expected
    /// input width.
    pub fn new(n_features: usize, trees: Vec<DecisionTree>) -> Result<Self, ForecastError> {
        let forest = Self { n_features, trees };
        forest.validate()?;
        Ok(forest)
    }

    /// Validate the forest's structure. Called on construction and when
    /// deserialized from an artifact file.
    pub fn validate(&self) -> Result<(), ForecastError> {
        if self.trees.is_empty() {
            return Err(ForecastError::Artifact(
                "forest artifact contains no trees".to_string(),
            ));
        }
        for tree in &self.trees {
            tree.validate(self.n_features)?;
        }
        Ok(())
    }

    /// Predict one scalar from a flattened window of normalized values.
    ///
    /// Returns [`ForecastError::ShapeMismatch`] unless `window` has exactly
    /// `n_features` values.
    pub fn predict(&self, window: &[f64]) -> Result<f64, ForecastError> {
        if window.len() != self.n_features {
            return Err(ForecastError::ShapeMismatch {
                stage: "stage-1 forest",
                expected: self.n_features,
                actual: window.len(),
            });
        }
        let sum: f64 = self.trees.iter().map(|t| t.evaluate(window)).sum();
        Ok(sum / self.trees.len() as f64)
    }

    /// A forest consisting of one leaf that always emits `value`. Test helper.
    #[doc(hidden)]
    pub fn constant(n_features: usize, value: f64) -> Self {
        Self {
            n_features,
            trees: vec![DecisionTree {
                children_left: vec![-1],
                children_right: vec![-1],
                feature: vec![-2],
                threshold: vec![0.0],
                value: vec![value],
            }],
        }
    }
}

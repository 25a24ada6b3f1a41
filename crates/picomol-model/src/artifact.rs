//! Pre-trained scoring model artifact.
//!
//! The model is trained and exported elsewhere; this crate only
//! deserializes and evaluates it. The artifact is JSON carrying the
//! descriptor names the estimator consumes (in order) plus one estimator
//! payload: a linear regressor or an averaged tree ensemble (the export
//! of a random-forest regressor).

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use picomol_common::error::{PicomolError, Result};

/// A deserialized pre-trained regression model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringModel {
    /// Descriptor names, in the exact order the estimator consumes them.
    pub feature_names: Vec<String>,
    pub estimator: Estimator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Estimator {
    Linear(LinearModel),
    Forest(ForestModel),
}

/// Ordinary linear regression: intercept plus one coefficient per feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

/// Averaged ensemble of binary decision trees.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    pub trees: Vec<DecisionTree>,
}

/// One regression tree, nodes stored flat; node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl ScoringModel {
    /// Deserialize the artifact from disk. Loaded fresh for every pipeline
    /// run; never cached across runs.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let model: Self = serde_json::from_str(&content)
            .map_err(|e| PicomolError::Processing(format!("invalid model artifact: {e}")))?;
        model.validate()?;
        debug!(
            features = model.feature_names.len(),
            "Loaded scoring model artifact"
        );
        Ok(model)
    }

    /// Number of feature columns the estimator expects.
    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    /// Score one feature row. Callers must have checked the row width.
    pub(crate) fn score_row(&self, row: &[f64]) -> f64 {
        match &self.estimator {
            Estimator::Linear(m) => {
                m.intercept
                    + row
                        .iter()
                        .zip(&m.coefficients)
                        .map(|(x, c)| x * c)
                        .sum::<f64>()
            }
            Estimator::Forest(f) => {
                let total: f64 = f.trees.iter().map(|t| t.score_row(row)).sum();
                total / f.trees.len() as f64
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.feature_names.is_empty() {
            return Err(PicomolError::Processing(
                "model artifact declares no features".to_string(),
            ));
        }
        match &self.estimator {
            Estimator::Linear(m) => {
                if m.coefficients.len() != self.feature_names.len() {
                    return Err(PicomolError::Processing(format!(
                        "model artifact has {} coefficients for {} features",
                        m.coefficients.len(),
                        self.feature_names.len()
                    )));
                }
            }
            Estimator::Forest(f) => {
                if f.trees.is_empty() {
                    return Err(PicomolError::Processing(
                        "model artifact has an empty tree ensemble".to_string(),
                    ));
                }
                for (t, tree) in f.trees.iter().enumerate() {
                    tree.validate(t, self.feature_names.len())?;
                }
            }
        }
        Ok(())
    }
}

impl DecisionTree {
    fn score_row(&self, row: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split { feature, threshold, left, right } => {
                    index = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    fn validate(&self, tree_index: usize, feature_count: usize) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(PicomolError::Processing(format!(
                "tree {tree_index} has no nodes"
            )));
        }
        for (n, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { feature, left, right, .. } = node {
                if *feature >= feature_count {
                    return Err(PicomolError::Processing(format!(
                        "tree {tree_index} node {n} tests feature {feature}, but the model has {feature_count} features"
                    )));
                }
                // Children must point strictly forward so traversal terminates.
                if *left <= n || *right <= n || *left >= self.nodes.len() || *right >= self.nodes.len() {
                    return Err(PicomolError::Processing(format!(
                        "tree {tree_index} node {n} has out-of-range children"
                    )));
                }
            }
        }
        Ok(())
    }
}

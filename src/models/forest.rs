//! Decision-tree ensemble (random forest) evaluation.
//!
//! Each tree is a flat node list rooted at index 0. Split nodes send the
//! sample left when `x[feature] <= threshold`; leaf nodes hold the fraction
//! of positive-class training samples that reached them. The forest
//! probability is the mean leaf value across trees.

use serde::{Deserialize, Serialize};

use crate::domain::{FEATURE_NAMES, FeatureVector, N_FEATURES};
use crate::error::ModelError;
use crate::models::Classifier;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    fn validate(&self, tree_idx: usize) -> Result<(), ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::Invalid(format!("tree {tree_idx} has no nodes")));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= N_FEATURES {
                        return Err(ModelError::Invalid(format!(
                            "tree {tree_idx} node {idx}: feature index {feature} out of range"
                        )));
                    }
                    if !threshold.is_finite() {
                        return Err(ModelError::Invalid(format!(
                            "tree {tree_idx} node {idx}: non-finite threshold"
                        )));
                    }
                    // Children must point forward, which also rules out cycles.
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(ModelError::Invalid(format!(
                                "tree {tree_idx} node {idx}: bad child index {child}"
                            )));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !(value.is_finite() && (0.0..=1.0).contains(&value)) {
                        return Err(ModelError::Invalid(format!(
                            "tree {tree_idx} node {idx}: leaf value {value} outside [0, 1]"
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf.
    ///
    /// A path longer than the node count means a cycle, which `validate` rejects
    /// but a hand-built tree may still contain.
    fn leaf_value(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let mut idx = 0;
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return Ok(*value),
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = features
                        .get(*feature)
                        .ok_or_else(|| ModelError::Inference(format!("missing feature {feature}")))?;
                    idx = if x <= *threshold { *left } else { *right };
                }
                None => return Err(ModelError::Inference(format!("dangling node index {idx}"))),
            }
        }
        Err(ModelError::Inference(format!("no leaf reached within {} steps", self.nodes.len())))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    /// Column names the forest was trained with; checked against `FEATURE_NAMES`.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub trees: Vec<DecisionTree>,
}

impl ForestModel {
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(names) = &self.feature_names {
            if names.iter().map(String::as_str).ne(FEATURE_NAMES.iter().copied()) {
                return Err(ModelError::Invalid(format!(
                    "feature order {names:?} does not match {FEATURE_NAMES:?}"
                )));
            }
        }
        if self.trees.is_empty() {
            return Err(ModelError::Invalid("forest has no trees".to_string()));
        }
        for (idx, tree) in self.trees.iter().enumerate() {
            tree.validate(idx)?;
        }
        Ok(())
    }
}

impl Classifier for ForestModel {
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        let mut sum = 0.0;
        for tree in &self.trees {
            sum += tree.leaf_value(features)?;
        }
        Ok(sum / self.trees.len() as f64)
    }

    fn name(&self) -> &str {
        "forest"
    }
}

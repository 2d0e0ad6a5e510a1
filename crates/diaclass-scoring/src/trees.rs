//! Gradient-boosted tree ensemble scorer
//!
//! Binary logistic objective: the probability is the sigmoid of
//! `base_margin` plus the leaf value reached in every tree.

use diaclass_core::{DiaclassError, DiaclassResult};
use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::traits::{check_dim, sigmoid, Scorer};

/// One node of a regression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Go `left` when `features[feature] < threshold`, else `right`.
    /// NaN inputs follow `default_left`.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default)]
        default_left: bool,
    },
    Leaf {
        value: f64,
    },
}

/// A regression tree stored as a flat node array rooted at index 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    fn validate(&self, feature_count: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if feature >= feature_count {
                        return Err(format!(
                            "node {} splits on feature {} but only {} features exist",
                            i, feature, feature_count
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {} has a non-finite threshold", i));
                    }
                    // children after their parent keeps every walk finite
                    for child in [left, right] {
                        if child <= i || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", i, child));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} has a non-finite value", i));
                    }
                }
            }
        }
        Ok(())
    }

    /// Leaf value reached by `features`
    pub fn leaf_value(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let x = features[feature];
                    idx = if x.is_nan() {
                        if default_left {
                            left
                        } else {
                            right
                        }
                    } else if x < threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }
}

/// Serialized boosted ensemble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostedTreesSpec {
    #[serde(default)]
    pub base_margin: f64,
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub calibration: Option<Calibration>,
}

/// Boosted regression trees with a logistic link
#[derive(Debug, Clone)]
pub struct BoostedTreesScorer {
    base_margin: f64,
    trees: Vec<Tree>,
    feature_count: usize,
}

impl BoostedTreesScorer {
    /// Build a scorer from its spec, checking every split against `feature_count`
    pub fn from_spec(spec: &BoostedTreesSpec, feature_count: usize) -> DiaclassResult<Self> {
        if spec.trees.is_empty() {
            return Err(DiaclassError::BundleCorrupt(
                "tree ensemble has no trees".to_string(),
            ));
        }
        if !spec.base_margin.is_finite() {
            return Err(DiaclassError::BundleCorrupt(
                "base_margin must be finite".to_string(),
            ));
        }
        for (t, tree) in spec.trees.iter().enumerate() {
            tree.validate(feature_count)
                .map_err(|e| DiaclassError::BundleCorrupt(format!("tree {}: {}", t, e)))?;
        }

        Ok(Self {
            base_margin: spec.base_margin,
            trees: spec.trees.clone(),
            feature_count,
        })
    }

    pub fn margin(&self, features: &[f64]) -> f64 {
        self.base_margin
            + self
                .trees
                .iter()
                .map(|tree| tree.leaf_value(features))
                .sum::<f64>()
    }
}

impl Scorer for BoostedTreesScorer {
    fn score(&self, features: &[f64]) -> DiaclassResult<f64> {
        check_dim(self.feature_count, features)?;
        Ok(sigmoid(self.margin(features)))
    }

    fn input_dim(&self) -> Option<usize> {
        Some(self.feature_count)
    }

    fn name(&self) -> &'static str {
        "boosted_trees"
    }
}

//! Model bundle and its on-disk artifact

use diaclass_core::{DiaclassError, DiaclassResult, ModelMetadata};
use diaclass_scoring::{Scorer, ScorerSpec};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Serialized form of a bundle, as written by the training pipeline's export step
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BundleArtifact {
    pub model_name: String,
    pub version: String,
    pub threshold: f64,
    pub features: Vec<String>,
    pub scorer: ScorerSpec,
}

/// A loaded, validated model bundle. Immutable after construction.
#[derive(Debug, Clone)]
pub struct ModelBundle {
    scorer: Arc<dyn Scorer>,
    threshold: f64,
    features: Vec<String>,
    model_name: String,
    version: String,
}

impl ModelBundle {
    /// Assemble a bundle from its parts.
    ///
    /// Fails with `BundleCorrupt` if the threshold is outside [0, 1], the
    /// feature list is empty or has duplicates, or the scorer was fit on a
    /// different number of features.
    pub fn new(
        scorer: Arc<dyn Scorer>,
        threshold: f64,
        features: Vec<String>,
        model_name: impl Into<String>,
        version: impl Into<String>,
    ) -> DiaclassResult<Self> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(DiaclassError::BundleCorrupt(format!(
                "threshold {} is outside [0, 1]",
                threshold
            )));
        }
        validate_features(&features)?;
        if let Some(dim) = scorer.input_dim() {
            if dim != features.len() {
                return Err(DiaclassError::BundleCorrupt(format!(
                    "scorer expects {} features but bundle lists {}",
                    dim,
                    features.len()
                )));
            }
        }

        Ok(Self {
            scorer,
            threshold,
            features,
            model_name: model_name.into(),
            version: version.into(),
        })
    }

    /// Build a bundle from a parsed artifact
    pub fn from_artifact(artifact: BundleArtifact) -> DiaclassResult<Self> {
        validate_features(&artifact.features)?;
        let scorer = artifact.scorer.build(artifact.features.len())?;
        Self::new(
            scorer,
            artifact.threshold,
            artifact.features,
            artifact.model_name,
            artifact.version,
        )
    }

    /// Parse and validate a JSON artifact
    pub fn from_json(bytes: &[u8]) -> DiaclassResult<Self> {
        let artifact: BundleArtifact = serde_json::from_slice(bytes)
            .map_err(|e| DiaclassError::BundleCorrupt(e.to_string()))?;
        Self::from_artifact(artifact)
    }

    pub fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Required feature names, in scorer column order
    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Descriptive fields, without the scorer
    pub fn metadata(&self) -> ModelMetadata {
        ModelMetadata {
            model_name: self.model_name.clone(),
            version: self.version.clone(),
            threshold: self.threshold,
            features: self.features.clone(),
        }
    }
}

fn validate_features(features: &[String]) -> DiaclassResult<()> {
    if features.is_empty() {
        return Err(DiaclassError::BundleCorrupt(
            "feature list is empty".to_string(),
        ));
    }
    let mut seen = HashSet::with_capacity(features.len());
    for name in features {
        if name.trim().is_empty() {
            return Err(DiaclassError::BundleCorrupt(
                "feature list contains an empty name".to_string(),
            ));
        }
        if !seen.insert(name.as_str()) {
            return Err(DiaclassError::BundleCorrupt(format!(
                "duplicate feature: {}",
                name
            )));
        }
    }
    Ok(())
}

//! Inference engine

use diaclass_core::{
    Decision, DiaclassError, DiaclassResult, FeatureLookup, ModelMetadata, RiskClass,
};
use diaclass_store::BundleStore;
use std::sync::Arc;
use tracing::debug;

use crate::features::build_feature_vector;

/// Turns patient profiles into decisions using the store's bundle
pub struct InferenceEngine {
    store: Arc<BundleStore>,
}

impl InferenceEngine {
    /// Create a new engine over `store`
    pub fn new(store: Arc<BundleStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<BundleStore> {
        &self.store
    }

    /// Score a profile and apply the bundle's threshold
    pub async fn predict<P>(&self, profile: &P) -> DiaclassResult<Decision>
    where
        P: FeatureLookup + Sync + ?Sized,
    {
        let bundle = self.store.get().await?;

        let vector = build_feature_vector(bundle.features(), profile)?;
        let probability = bundle.scorer().score(&vector).map_err(|e| match e {
            DiaclassError::ScoringFailed(reason) => DiaclassError::ScoringFailed(reason),
            other => DiaclassError::ScoringFailed(other.to_string()),
        })?;

        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(DiaclassError::ScoringFailed(format!(
                "scorer returned {} which is not a probability",
                probability
            )));
        }

        let prediction = RiskClass::from_probability(probability, bundle.threshold());
        debug!(
            probability = probability,
            threshold = bundle.threshold(),
            prediction = %prediction,
            "Prediction computed"
        );

        Ok(Decision {
            prediction,
            probability,
            threshold_used: bundle.threshold(),
            model_name: bundle.model_name().to_string(),
            version: bundle.version().to_string(),
        })
    }

    /// Descriptive fields of the bundle; never runs the scorer
    pub async fn metadata(&self) -> DiaclassResult<ModelMetadata> {
        let bundle = self.store.get().await?;
        Ok(bundle.metadata())
    }

    /// Liveness probe: true iff the bundle can be obtained
    pub async fn is_healthy(&self) -> bool {
        self.store.get().await.is_ok()
    }
}

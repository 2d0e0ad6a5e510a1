//! Serialized scorer descriptions and their construction

use diaclass_core::DiaclassResult;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::calibration::{Calibrated, Calibration};
use crate::linear::{LogisticScorer, LogisticSpec};
use crate::traits::Scorer;
use crate::trees::{BoostedTreesScorer, BoostedTreesSpec};

/// Scorer section of a bundle artifact, selected by `kind`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScorerSpec {
    Logistic(LogisticSpec),
    BoostedTrees(BoostedTreesSpec),
}

impl ScorerSpec {
    fn calibration(&self) -> Option<&Calibration> {
        match self {
            ScorerSpec::Logistic(spec) => spec.calibration.as_ref(),
            ScorerSpec::BoostedTrees(spec) => spec.calibration.as_ref(),
        }
    }

    /// Build the scorer, validating it against the bundle's feature count
    pub fn build(&self, feature_count: usize) -> DiaclassResult<Arc<dyn Scorer>> {
        let scorer: Arc<dyn Scorer> = match (self, self.calibration().cloned()) {
            (ScorerSpec::Logistic(spec), None) => {
                Arc::new(LogisticScorer::from_spec(spec, feature_count)?)
            }
            (ScorerSpec::Logistic(spec), Some(cal)) => Arc::new(Calibrated::new(
                LogisticScorer::from_spec(spec, feature_count)?,
                cal,
            )?),
            (ScorerSpec::BoostedTrees(spec), None) => {
                Arc::new(BoostedTreesScorer::from_spec(spec, feature_count)?)
            }
            (ScorerSpec::BoostedTrees(spec), Some(cal)) => Arc::new(Calibrated::new(
                BoostedTreesScorer::from_spec(spec, feature_count)?,
                cal,
            )?),
        };

        debug!(
            scorer = scorer.name(),
            features = feature_count,
            calibrated = self.calibration().is_some(),
            "Built scorer"
        );

        Ok(scorer)
    }
}

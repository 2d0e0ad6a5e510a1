//! Logistic regression scorer

use diaclass_core::{DiaclassError, DiaclassResult};
use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::traits::{check_dim, sigmoid, Scorer};

/// Serialized logistic model, optionally preceded by standardization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticSpec {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    /// Per-feature mean subtracted before weighting
    #[serde(default)]
    pub mean: Option<Vec<f64>>,
    /// Per-feature scale divided out after centering
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
    #[serde(default)]
    pub calibration: Option<Calibration>,
}

/// Logistic regression over standardized features
#[derive(Debug, Clone)]
pub struct LogisticScorer {
    coefficients: Vec<f64>,
    intercept: f64,
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl LogisticScorer {
    /// Build a scorer from its spec, checking it against `feature_count`
    pub fn from_spec(spec: &LogisticSpec, feature_count: usize) -> DiaclassResult<Self> {
        let n = spec.coefficients.len();
        if n != feature_count {
            return Err(DiaclassError::BundleCorrupt(format!(
                "logistic model has {} coefficients for {} features",
                n, feature_count
            )));
        }

        let mean = spec.mean.clone().unwrap_or_else(|| vec![0.0; n]);
        let scale = spec.scale.clone().unwrap_or_else(|| vec![1.0; n]);
        if mean.len() != n || scale.len() != n {
            return Err(DiaclassError::BundleCorrupt(format!(
                "standardization vectors must have {} entries",
                n
            )));
        }
        if scale.iter().any(|s| *s == 0.0) {
            return Err(DiaclassError::BundleCorrupt(
                "standardization scale contains zero".to_string(),
            ));
        }
        let all_finite = spec
            .coefficients
            .iter()
            .chain(mean.iter())
            .chain(scale.iter())
            .chain(std::iter::once(&spec.intercept))
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(DiaclassError::BundleCorrupt(
                "logistic parameters must be finite".to_string(),
            ));
        }

        Ok(Self {
            coefficients: spec.coefficients.clone(),
            intercept: spec.intercept,
            mean,
            scale,
        })
    }

    /// Linear margin before the logistic link
    pub fn margin(&self, features: &[f64]) -> f64 {
        features
            .iter()
            .zip(&self.coefficients)
            .zip(self.mean.iter().zip(&self.scale))
            .map(|((x, w), (m, s))| w * (x - m) / s)
            .sum::<f64>()
            + self.intercept
    }
}

impl Scorer for LogisticScorer {
    fn score(&self, features: &[f64]) -> DiaclassResult<f64> {
        check_dim(self.coefficients.len(), features)?;
        Ok(sigmoid(self.margin(features)))
    }

    fn input_dim(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn name(&self) -> &'static str {
        "logistic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(coefficients: Vec<f64>, intercept: f64) -> LogisticSpec {
        LogisticSpec {
            coefficients,
            intercept,
            mean: None,
            scale: None,
            calibration: None,
        }
    }

    #[test]
    fn test_logistic_score() {
        let scorer = LogisticScorer::from_spec(&spec(vec![1.0, -0.5], 0.25), 2).unwrap();
        // margin = 2.0 - 1.0 + 0.25
        let p = scorer.score(&[2.0, 2.0]).unwrap();
        assert!((p - sigmoid(1.25)).abs() < 1e-12);
        assert_eq!(scorer.input_dim(), Some(2));
    }

    #[test]
    fn test_logistic_standardization() {
        let mut s = spec(vec![2.0], 0.0);
        s.mean = Some(vec![25.0]);
        s.scale = Some(vec![5.0]);
        let scorer = LogisticScorer::from_spec(&s, 1).unwrap();
        assert_eq!(scorer.margin(&[25.0]), 0.0);
        assert!((scorer.margin(&[30.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_logistic_dimension_mismatch() {
        let err = LogisticScorer::from_spec(&spec(vec![1.0], 0.0), 17).unwrap_err();
        assert!(matches!(err, DiaclassError::BundleCorrupt(_)));

        let scorer = LogisticScorer::from_spec(&spec(vec![1.0, 1.0], 0.0), 2).unwrap();
        assert!(matches!(
            scorer.score(&[1.0]),
            Err(DiaclassError::ScoringFailed(_))
        ));
    }

    #[test]
    fn test_logistic_rejects_zero_scale() {
        let mut s = spec(vec![1.0], 0.0);
        s.scale = Some(vec![0.0]);
        assert!(LogisticScorer::from_spec(&s, 1).is_err());
    }
}

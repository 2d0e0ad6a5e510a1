//! Scorer trait definitions

use diaclass_core::DiaclassResult;

/// A fitted classifier reduced to its scoring function.
///
/// Implementations receive the feature vector already ordered by the bundle's
/// feature list and return the probability of the positive class.
pub trait Scorer: Send + Sync + std::fmt::Debug {
    /// Score one ordered feature vector
    fn score(&self, features: &[f64]) -> DiaclassResult<f64>;

    /// Number of features the scorer was fit on, if it knows
    fn input_dim(&self) -> Option<usize> {
        None
    }

    /// Get the scorer family name
    fn name(&self) -> &'static str;
}

/// Logistic function, stable for large negative margins
pub fn sigmoid(margin: f64) -> f64 {
    if margin >= 0.0 {
        1.0 / (1.0 + (-margin).exp())
    } else {
        let e = margin.exp();
        e / (1.0 + e)
    }
}

pub(crate) fn check_dim(expected: usize, features: &[f64]) -> DiaclassResult<()> {
    if features.len() != expected {
        return Err(diaclass_core::DiaclassError::ScoringFailed(format!(
            "expected {} features, got {}",
            expected,
            features.len()
        )));
    }
    Ok(())
}

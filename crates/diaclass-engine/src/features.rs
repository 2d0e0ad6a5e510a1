//! Feature vector assembly

use diaclass_core::{DiaclassError, DiaclassResult, FeatureLookup};

/// Read `names` from `profile` in order, producing the scorer's input vector.
///
/// Keys of `profile` that are not in `names` never reach the vector.
pub fn build_feature_vector<P>(names: &[String], profile: &P) -> DiaclassResult<Vec<f64>>
where
    P: FeatureLookup + ?Sized,
{
    names
        .iter()
        .map(|name| match profile.feature(name) {
            None => Err(DiaclassError::MissingFeature(name.clone())),
            Some(v) if !v.is_finite() => Err(DiaclassError::InvalidFeature(name.clone())),
            Some(v) => Ok(v),
        })
        .collect()
}

//! Post-hoc probability calibration

use diaclass_core::{DiaclassError, DiaclassResult};
use serde::{Deserialize, Serialize};

use crate::traits::{sigmoid, Scorer};

/// Mapping from a raw probability to a calibrated one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Calibration {
    /// `sigmoid(a * p + b)`
    Platt { a: f64, b: f64 },
    /// Piecewise-linear interpolation through `(x[i], y[i])`, clamped at the ends
    Isotonic { x: Vec<f64>, y: Vec<f64> },
}

impl Calibration {
    /// Check the calibration parameters are usable
    pub fn validate(&self) -> DiaclassResult<()> {
        match self {
            Calibration::Platt { a, b } => {
                if !a.is_finite() || !b.is_finite() {
                    return Err(corrupt("platt parameters must be finite"));
                }
            }
            Calibration::Isotonic { x, y } => {
                if x.len() < 2 || x.len() != y.len() {
                    return Err(corrupt(format!(
                        "isotonic calibration needs matching x/y of at least 2 points, got {} and {}",
                        x.len(),
                        y.len()
                    )));
                }
                if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
                    return Err(corrupt("isotonic calibration points must be finite"));
                }
                if x.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(corrupt("isotonic x must be strictly increasing"));
                }
                if y.windows(2).any(|w| w[0] > w[1]) {
                    return Err(corrupt("isotonic y must be non-decreasing"));
                }
                if y.iter().any(|v| !(0.0..=1.0).contains(v)) {
                    return Err(corrupt("isotonic y must lie in [0, 1]"));
                }
            }
        }
        Ok(())
    }

    /// Map a raw probability through the calibration
    pub fn apply(&self, p: f64) -> f64 {
        match self {
            Calibration::Platt { a, b } => sigmoid(a * p + b),
            Calibration::Isotonic { x, y } => {
                if p.is_nan() {
                    return p;
                }
                let last = x.len() - 1;
                if p <= x[0] {
                    return y[0];
                }
                if p >= x[last] {
                    return y[last];
                }
                // first index with x > p; p lies in [x[i-1], x[i])
                let i = x.partition_point(|&xi| xi <= p);
                let (x0, x1) = (x[i - 1], x[i]);
                let (y0, y1) = (y[i - 1], y[i]);
                y0 + (y1 - y0) * (p - x0) / (x1 - x0)
            }
        }
    }
}

fn corrupt(reason: impl Into<String>) -> DiaclassError {
    DiaclassError::BundleCorrupt(reason.into())
}

/// Scorer whose output is passed through a calibration
#[derive(Debug)]
pub struct Calibrated<S> {
    inner: S,
    calibration: Calibration,
}

impl<S: Scorer> Calibrated<S> {
    pub fn new(inner: S, calibration: Calibration) -> DiaclassResult<Self> {
        calibration.validate()?;
        Ok(Self { inner, calibration })
    }
}

impl<S: Scorer> Scorer for Calibrated<S> {
    fn score(&self, features: &[f64]) -> DiaclassResult<f64> {
        let raw = self.inner.score(features)?;
        if !raw.is_finite() {
            return Err(DiaclassError::ScoringFailed(format!(
                "raw score {} cannot be calibrated",
                raw
            )));
        }
        Ok(self.calibration.apply(raw))
    }

    fn input_dim(&self) -> Option<usize> {
        self.inner.input_dim()
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Fixed(f64);

    impl Scorer for Fixed {
        fn score(&self, _features: &[f64]) -> DiaclassResult<f64> {
            Ok(self.0)
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn isotonic() -> Calibration {
        Calibration::Isotonic {
            x: vec![0.0, 0.5, 1.0],
            y: vec![0.0, 0.2, 1.0],
        }
    }

    #[test]
    fn test_isotonic_interpolation() {
        let cal = isotonic();
        assert_eq!(cal.apply(0.0), 0.0);
        assert!((cal.apply(0.25) - 0.1).abs() < 1e-12);
        assert_eq!(cal.apply(0.5), 0.2);
        assert!((cal.apply(0.75) - 0.6).abs() < 1e-12);
        assert_eq!(cal.apply(1.0), 1.0);
    }

    #[test]
    fn test_isotonic_clamps_outside_range() {
        let cal = Calibration::Isotonic {
            x: vec![0.2, 0.8],
            y: vec![0.1, 0.9],
        };
        assert_eq!(cal.apply(0.05), 0.1);
        assert_eq!(cal.apply(0.95), 0.9);
    }

    #[test]
    fn test_platt() {
        let cal = Calibration::Platt { a: 0.0, b: 0.0 };
        assert_eq!(cal.apply(0.9), 0.5);
    }

    #[test]
    fn test_isotonic_validation() {
        assert!(isotonic().validate().is_ok());

        let unsorted = Calibration::Isotonic {
            x: vec![0.0, 0.6, 0.5],
            y: vec![0.0, 0.5, 0.6],
        };
        assert!(matches!(
            unsorted.validate(),
            Err(DiaclassError::BundleCorrupt(_))
        ));

        let mismatched = Calibration::Isotonic {
            x: vec![0.0, 1.0],
            y: vec![0.0],
        };
        assert!(mismatched.validate().is_err());

        let out_of_range = Calibration::Isotonic {
            x: vec![0.0, 1.0],
            y: vec![0.0, 1.5],
        };
        assert!(out_of_range.validate().is_err());
    }

    #[test]
    fn test_calibrated_scorer() {
        let scorer = Calibrated::new(Fixed(0.25), isotonic()).unwrap();
        let p = scorer.score(&[]).unwrap();
        assert!((p - 0.1).abs() < 1e-12);
        assert_eq!(scorer.name(), "fixed");
    }

    #[test]
    fn test_isotonic_passes_nan_through() {
        assert!(isotonic().apply(f64::NAN).is_nan());
    }

    #[test]
    fn test_calibrated_rejects_non_finite_raw_score() {
        let scorer = Calibrated::new(Fixed(f64::NAN), isotonic()).unwrap();
        assert!(matches!(
            scorer.score(&[]),
            Err(DiaclassError::ScoringFailed(_))
        ));
    }

    #[test]
    fn test_calibration_parse() {
        let cal: Calibration =
            serde_json::from_str(r#"{"method": "platt", "a": -1.5, "b": 0.25}"#).unwrap();
        assert_eq!(cal, Calibration::Platt { a: -1.5, b: 0.25 });
    }
}

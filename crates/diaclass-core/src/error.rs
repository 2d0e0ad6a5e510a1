//! Error types for diaclass

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for diaclass
#[derive(Error, Debug)]
pub enum DiaclassError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No bundle artifact at the configured path or any fallback
    #[error("Model bundle not found at {}", .0.display())]
    BundleNotFound(PathBuf),

    /// Bundle artifact exists but cannot be used
    #[error("Model bundle is corrupt: {0}")]
    BundleCorrupt(String),

    /// Profile lacks a feature the bundle requires
    #[error("Missing feature: {0}")]
    MissingFeature(String),

    /// Profile carries a NaN or infinite value for a required feature
    #[error("Invalid value for feature: {0}")]
    InvalidFeature(String),

    /// Scorer failed or produced a value that is not a probability
    #[error("Scoring failed: {0}")]
    ScoringFailed(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiaclassError {
    /// Whether the error describes the bundle itself rather than a single request
    pub fn is_bundle_error(&self) -> bool {
        matches!(
            self,
            DiaclassError::BundleNotFound(_) | DiaclassError::BundleCorrupt(_)
        )
    }
}

/// Result type for diaclass operations
pub type DiaclassResult<T> = Result<T, DiaclassError>;

impl From<toml::de::Error> for DiaclassError {
    fn from(err: toml::de::Error) -> Self {
        DiaclassError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DiaclassError::Config("invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: invalid config");

        let err = DiaclassError::BundleNotFound(PathBuf::from("/srv/model/bundle.json"));
        assert_eq!(
            err.to_string(),
            "Model bundle not found at /srv/model/bundle.json"
        );

        let err = DiaclassError::MissingFeature("BMI".to_string());
        assert_eq!(err.to_string(), "Missing feature: BMI");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: DiaclassError = io_err.into();
        assert!(matches!(err, DiaclassError::Io(_)));
    }

    #[test]
    fn test_bundle_error_classification() {
        assert!(DiaclassError::BundleCorrupt("bad".into()).is_bundle_error());
        assert!(DiaclassError::BundleNotFound(PathBuf::new()).is_bundle_error());
        assert!(!DiaclassError::ScoringFailed("nan".into()).is_bundle_error());
        assert!(!DiaclassError::MissingFeature("Age".into()).is_bundle_error());
    }
}

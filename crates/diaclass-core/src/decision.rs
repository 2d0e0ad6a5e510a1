//! Decision and metadata types returned by the inference engine

use serde::{Deserialize, Serialize};

/// Discrete outcome of the threshold rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum RiskClass {
    /// Probability below the threshold
    Negative,
    /// Probability at or above the threshold
    Positive,
}

impl RiskClass {
    /// Apply the decision rule. The boundary is inclusive: a probability equal
    /// to the threshold is positive.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability >= threshold {
            RiskClass::Positive
        } else {
            RiskClass::Negative
        }
    }

    pub fn is_positive(self) -> bool {
        matches!(self, RiskClass::Positive)
    }
}

impl From<RiskClass> for u8 {
    fn from(class: RiskClass) -> Self {
        match class {
            RiskClass::Negative => 0,
            RiskClass::Positive => 1,
        }
    }
}

impl TryFrom<u8> for RiskClass {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(RiskClass::Negative),
            1 => Ok(RiskClass::Positive),
            other => Err(format!("invalid risk class: {}", other)),
        }
    }
}

impl std::fmt::Display for RiskClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskClass::Negative => write!(f, "Negative"),
            RiskClass::Positive => write!(f, "Positive"),
        }
    }
}

/// Result of a single prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Predicted class (0 no diabetes, 1 diabetes)
    pub prediction: RiskClass,
    /// Probability of the positive class
    pub probability: f64,
    /// Decision threshold applied to `probability`
    pub threshold_used: f64,
    pub model_name: String,
    pub version: String,
}

/// Descriptive fields of the loaded bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_name: String,
    pub version: String,
    pub threshold: f64,
    /// Required features, in scorer column order
    pub features: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        assert_eq!(RiskClass::from_probability(0.42, 0.42), RiskClass::Positive);
        assert_eq!(
            RiskClass::from_probability(0.419999, 0.42),
            RiskClass::Negative
        );
        assert_eq!(RiskClass::from_probability(0.0, 0.0), RiskClass::Positive);
        assert_eq!(RiskClass::from_probability(0.999, 1.0), RiskClass::Negative);
    }

    #[test]
    fn test_decision_wire_format() {
        let decision = Decision {
            prediction: RiskClass::Positive,
            probability: 0.73,
            threshold_used: 0.5,
            model_name: "xgb".to_string(),
            version: "1.0".to_string(),
        };
        let value = serde_json::to_value(&decision).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "prediction": 1,
                "probability": 0.73,
                "threshold_used": 0.5,
                "model_name": "xgb",
                "version": "1.0"
            })
        );

        let back: Decision = serde_json::from_value(value).unwrap();
        assert_eq!(back, decision);
    }

    #[test]
    fn test_risk_class_rejects_out_of_range() {
        let result: Result<RiskClass, _> = serde_json::from_str("2");
        assert!(result.is_err());
    }
}

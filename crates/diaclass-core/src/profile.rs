//! Patient profile and name-based feature lookup

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// The 17 feature names of the reference deployment
pub const CANONICAL_FEATURES: [&str; 17] = [
    "HighBP",
    "HighChol",
    "DiffWalk",
    "HeartDiseaseorAttack",
    "PhysActivity",
    "HvyAlcoholConsump",
    "CholCheck",
    "Smoker",
    "Stroke",
    "Sex",
    "BMI",
    "Age",
    "Income",
    "GenHlth",
    "MentHlth",
    "PhysHlth",
    "Education",
];

/// Read access to feature values by name.
///
/// The engine pulls values through this trait in the order the bundle
/// dictates, so implementors never need to agree on any ordering of their own.
pub trait FeatureLookup {
    /// Value for `name`, or `None` if the feature is absent
    fn feature(&self, name: &str) -> Option<f64>;
}

impl FeatureLookup for HashMap<String, f64> {
    fn feature(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl FeatureLookup for BTreeMap<String, f64> {
    fn feature(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl<T: FeatureLookup + ?Sized> FeatureLookup for &T {
    fn feature(&self, name: &str) -> Option<f64> {
        (**self).feature(name)
    }
}

/// Patient attributes accepted by the prediction endpoint.
///
/// Binary indicators are carried as 0.0 / 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    /// High blood pressure (0 or 1)
    #[serde(rename = "HighBP")]
    pub high_bp: f64,
    /// High cholesterol (0 or 1)
    #[serde(rename = "HighChol")]
    pub high_chol: f64,
    /// Difficulty walking (0 or 1)
    #[serde(rename = "DiffWalk")]
    pub diff_walk: f64,
    /// Heart disease or attack (0 or 1)
    #[serde(rename = "HeartDiseaseorAttack")]
    pub heart_disease_or_attack: f64,
    /// Physical activity in the past 30 days (0 or 1)
    #[serde(rename = "PhysActivity")]
    pub phys_activity: f64,
    /// Heavy alcohol consumption (0 or 1)
    #[serde(rename = "HvyAlcoholConsump")]
    pub hvy_alcohol_consump: f64,
    /// Cholesterol checked in the last 5 years (0 or 1)
    #[serde(rename = "CholCheck")]
    pub chol_check: f64,
    /// Smoker (0 or 1)
    #[serde(rename = "Smoker")]
    pub smoker: f64,
    /// History of stroke (0 or 1)
    #[serde(rename = "Stroke")]
    pub stroke: f64,
    /// Sex (0 female, 1 male)
    #[serde(rename = "Sex")]
    pub sex: f64,
    /// Body mass index
    #[serde(rename = "BMI")]
    pub bmi: f64,
    /// Age category (1 = 18-24 ... 13 = 80+)
    #[serde(rename = "Age")]
    pub age: f64,
    /// Income category (1-8)
    #[serde(rename = "Income")]
    pub income: f64,
    /// General health rating (1 excellent ... 5 poor)
    #[serde(rename = "GenHlth")]
    pub gen_hlth: f64,
    /// Days of poor mental health in the last 30
    #[serde(rename = "MentHlth")]
    pub ment_hlth: f64,
    /// Days of poor physical health in the last 30
    #[serde(rename = "PhysHlth")]
    pub phys_hlth: f64,
    /// Education level (1-6)
    #[serde(rename = "Education")]
    pub education: f64,
}

impl PatientProfile {
    /// The example profile shown to API users
    pub fn example() -> Self {
        Self {
            high_bp: 0.0,
            high_chol: 0.0,
            diff_walk: 0.0,
            heart_disease_or_attack: 0.0,
            phys_activity: 1.0,
            hvy_alcohol_consump: 0.0,
            chol_check: 1.0,
            smoker: 0.0,
            stroke: 0.0,
            sex: 0.0,
            bmi: 25.0,
            age: 5.0,
            income: 7.0,
            gen_hlth: 2.0,
            ment_hlth: 0.0,
            phys_hlth: 0.0,
            education: 6.0,
        }
    }

    /// Copy the profile into a name-keyed map
    pub fn to_map(&self) -> HashMap<String, f64> {
        CANONICAL_FEATURES
            .iter()
            .filter_map(|name| self.feature(name).map(|v| (name.to_string(), v)))
            .collect()
    }
}

impl FeatureLookup for PatientProfile {
    fn feature(&self, name: &str) -> Option<f64> {
        let value = match name {
            "HighBP" => self.high_bp,
            "HighChol" => self.high_chol,
            "DiffWalk" => self.diff_walk,
            "HeartDiseaseorAttack" => self.heart_disease_or_attack,
            "PhysActivity" => self.phys_activity,
            "HvyAlcoholConsump" => self.hvy_alcohol_consump,
            "CholCheck" => self.chol_check,
            "Smoker" => self.smoker,
            "Stroke" => self.stroke,
            "Sex" => self.sex,
            "BMI" => self.bmi,
            "Age" => self.age,
            "Income" => self.income,
            "GenHlth" => self.gen_hlth,
            "MentHlth" => self.ment_hlth,
            "PhysHlth" => self.phys_hlth,
            "Education" => self.education,
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_covers_canonical_features() {
        let profile = PatientProfile::example();
        for name in CANONICAL_FEATURES {
            assert!(profile.feature(name).is_some(), "{} not resolvable", name);
        }
        assert_eq!(profile.feature("Glucose"), None);
        assert_eq!(profile.feature("bmi"), None);
    }

    #[test]
    fn test_profile_wire_names() {
        let value = serde_json::to_value(PatientProfile::example()).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), CANONICAL_FEATURES.len());
        for name in CANONICAL_FEATURES {
            assert!(object.contains_key(name), "{} missing from JSON", name);
        }
        assert_eq!(object["BMI"], 25.0);
        assert_eq!(object["HeartDiseaseorAttack"], 0.0);
    }

    #[test]
    fn test_profile_rejects_missing_field() {
        let mut value = serde_json::to_value(PatientProfile::example()).unwrap();
        value.as_object_mut().unwrap().remove("Stroke");
        let result: Result<PatientProfile, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_to_map_matches_lookup() {
        let profile = PatientProfile::example();
        let map = profile.to_map();
        assert_eq!(map.len(), 17);
        for name in CANONICAL_FEATURES {
            assert_eq!(map.feature(name), profile.feature(name));
        }
    }
}

//! Configuration types for diaclass

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the bundle artifact, relative to the working directory
pub const DEFAULT_BUNDLE_PATH: &str = "model/diabetes_bundle.json";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// API server configuration
    pub api: ApiConfig,
    /// Bundle artifact configuration
    pub bundle: BundleConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::DiaclassError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::DiaclassError::Config(format!("Failed to read config file: {}", e))
        })?;
        toml::from_str(&content)
            .map_err(|e| crate::DiaclassError::Config(format!("Failed to parse config: {}", e)))
    }
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Address to bind the REST API server
    pub address: String,
    /// Port for the REST API server
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: bool,
    /// Allowed CORS origins
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 8000,
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

/// Bundle artifact configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    /// Primary path of the bundle artifact
    pub path: PathBuf,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_BUNDLE_PATH),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level, or any `EnvFilter` directive string
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_service_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.api.port, 8000);
        assert_eq!(config.bundle.path, PathBuf::from(DEFAULT_BUNDLE_PATH));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_config_parse() {
        let toml_str = r#"
[api]
port = 9000
cors_origins = ["https://diaclassifier.example"]

[bundle]
path = "/opt/diaclass/model/bundle.json"
"#;
        let config: ServiceConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.address, "0.0.0.0");
        assert!(config.api.cors_enabled);
        assert_eq!(config.api.cors_origins, vec!["https://diaclassifier.example"]);
        assert_eq!(
            config.bundle.path,
            PathBuf::from("/opt/diaclass/model/bundle.json")
        );
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_file_missing() {
        let err = ServiceConfig::from_file(std::path::Path::new("/nonexistent/diaclass.toml"))
            .unwrap_err();
        assert!(matches!(err, crate::DiaclassError::Config(_)));
    }
}

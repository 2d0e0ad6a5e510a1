//! Bundle artifact location

use diaclass_core::{DiaclassError, DiaclassResult, DEFAULT_BUNDLE_PATH};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves the bundle artifact path.
///
/// The configured path is tried first. When it is missing, paths under the
/// directory of the running executable are tried, so the service still finds
/// its bundle when started from another working directory.
#[derive(Debug, Clone)]
pub struct BundleLocator {
    /// Configured artifact path
    primary: PathBuf,
    /// Directory the executable was installed to
    install_dir: Option<PathBuf>,
}

impl BundleLocator {
    /// Create a locator for `primary`, falling back to the executable's directory
    pub fn new(primary: impl Into<PathBuf>) -> Self {
        let install_dir = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf));
        Self {
            primary: primary.into(),
            install_dir,
        }
    }

    /// Override the install directory used for fallbacks
    pub fn with_install_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.install_dir = dir;
        self
    }

    /// Paths tried, in order
    pub fn candidates(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.primary.clone()];

        if let Some(dir) = &self.install_dir {
            if self.primary.is_relative() {
                paths.push(dir.join(&self.primary));
            }
            paths.push(dir.join(DEFAULT_BUNDLE_PATH));
        }

        paths.dedup();
        paths
    }

    /// First candidate that exists as a file
    pub async fn resolve(&self) -> DiaclassResult<PathBuf> {
        let candidates = self.candidates();
        for path in &candidates {
            match tokio::fs::metadata(path).await {
                Ok(meta) if meta.is_file() => return Ok(path.clone()),
                _ => debug!(path = %path.display(), "Bundle not at candidate path"),
            }
        }

        let last = candidates
            .last()
            .cloned()
            .unwrap_or_else(|| self.primary.clone());
        Err(DiaclassError::BundleNotFound(last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_relative() {
        let locator = BundleLocator::new("model/custom.json")
            .with_install_dir(Some(PathBuf::from("/opt/diaclass/bin")));
        assert_eq!(
            locator.candidates(),
            vec![
                PathBuf::from("model/custom.json"),
                PathBuf::from("/opt/diaclass/bin/model/custom.json"),
                PathBuf::from("/opt/diaclass/bin/model/diabetes_bundle.json"),
            ]
        );
    }

    #[test]
    fn test_candidates_default_path_not_repeated() {
        let locator = BundleLocator::new(DEFAULT_BUNDLE_PATH)
            .with_install_dir(Some(PathBuf::from("/opt/diaclass/bin")));
        assert_eq!(locator.candidates().len(), 2);
    }

    #[test]
    fn test_candidates_absolute_without_install_dir() {
        let locator = BundleLocator::new("/srv/bundle.json").with_install_dir(None);
        assert_eq!(locator.candidates(), vec![PathBuf::from("/srv/bundle.json")]);
    }

    #[tokio::test]
    async fn test_resolve_falls_back_to_install_dir() {
        let dir = tempfile::tempdir().unwrap();
        let fallback = dir.path().join(DEFAULT_BUNDLE_PATH);
        std::fs::create_dir_all(fallback.parent().unwrap()).unwrap();
        std::fs::write(&fallback, "{}").unwrap();

        let locator = BundleLocator::new(dir.path().join("missing.json"))
            .with_install_dir(Some(dir.path().to_path_buf()));
        assert_eq!(locator.resolve().await.unwrap(), fallback);
    }

    #[tokio::test]
    async fn test_resolve_not_found_names_last_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let locator = BundleLocator::new(dir.path().join("missing.json"))
            .with_install_dir(Some(dir.path().join("bin")));

        match locator.resolve().await {
            Err(DiaclassError::BundleNotFound(path)) => {
                assert_eq!(path, dir.path().join("bin").join(DEFAULT_BUNDLE_PATH));
            }
            other => panic!("expected BundleNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_resolve_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        let locator = BundleLocator::new(dir.path()).with_install_dir(None);
        assert!(locator.resolve().await.is_err());
    }
}

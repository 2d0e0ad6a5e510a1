//! Process-wide bundle cache

use chrono::{DateTime, Utc};
use diaclass_core::{BundleConfig, DiaclassError, DiaclassResult};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

use crate::bundle::ModelBundle;
use crate::locate::BundleLocator;

/// A bundle together with where and when it was loaded
#[derive(Debug)]
struct LoadedBundle {
    bundle: Arc<ModelBundle>,
    path: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
}

/// Loads the model bundle once and hands the same instance to every caller.
///
/// Concurrent first callers wait on a single in-flight load. A failed load
/// leaves the store empty, so the next call tries again.
#[derive(Debug)]
pub struct BundleStore {
    locator: BundleLocator,
    loaded: OnceCell<LoadedBundle>,
    load_attempts: AtomicUsize,
}

impl BundleStore {
    /// Create an empty store that loads through `locator`
    pub fn new(locator: BundleLocator) -> Self {
        Self {
            locator,
            loaded: OnceCell::new(),
            load_attempts: AtomicUsize::new(0),
        }
    }

    /// Create an empty store for the configured artifact path
    pub fn from_config(config: &BundleConfig) -> Self {
        Self::new(BundleLocator::new(&config.path))
    }

    /// Create a store that already holds `bundle` and never touches the disk
    pub fn with_bundle(bundle: ModelBundle) -> Self {
        let loaded = LoadedBundle {
            bundle: Arc::new(bundle),
            path: None,
            loaded_at: Utc::now(),
        };
        Self {
            locator: BundleLocator::new(diaclass_core::DEFAULT_BUNDLE_PATH),
            loaded: OnceCell::from(loaded),
            load_attempts: AtomicUsize::new(0),
        }
    }

    /// Get the cached bundle, loading it first if absent
    pub async fn get(&self) -> DiaclassResult<Arc<ModelBundle>> {
        let loaded = self.loaded.get_or_try_init(|| self.load()).await?;
        Ok(Arc::clone(&loaded.bundle))
    }

    async fn load(&self) -> DiaclassResult<LoadedBundle> {
        self.load_attempts.fetch_add(1, Ordering::SeqCst);

        let path = self.locator.resolve().await?;
        info!(path = %path.display(), "Loading model bundle");

        let bytes = read_artifact(&path).await?;
        let bundle = ModelBundle::from_json(&bytes)?;

        info!(
            model_name = %bundle.model_name(),
            version = %bundle.version(),
            threshold = bundle.threshold(),
            features = bundle.features().len(),
            scorer = bundle.scorer().name(),
            "Model bundle loaded"
        );

        Ok(LoadedBundle {
            bundle: Arc::new(bundle),
            path: Some(path),
            loaded_at: Utc::now(),
        })
    }

    /// The cached bundle, without triggering a load
    pub fn cached(&self) -> Option<Arc<ModelBundle>> {
        self.loaded.get().map(|l| Arc::clone(&l.bundle))
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.initialized()
    }

    /// When the cached bundle was loaded
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded.get().map(|l| l.loaded_at)
    }

    /// Path the cached bundle was read from
    pub fn source_path(&self) -> Option<&Path> {
        self.loaded.get().and_then(|l| l.path.as_deref())
    }

    /// Number of load attempts made so far, failed ones included
    pub fn load_attempts(&self) -> usize {
        self.load_attempts.load(Ordering::SeqCst)
    }
}

/// Read the artifact bytes, reporting failures in bundle terms
async fn read_artifact(path: &Path) -> DiaclassResult<Vec<u8>> {
    tokio::fs::read(path).await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DiaclassError::BundleNotFound(path.to_path_buf()),
        _ => DiaclassError::BundleCorrupt(format!("cannot read {}: {}", path.display(), e)),
    })
}

//! diaclass-store: Model bundle storage
//!
//! This crate provides the bundle store:
//! - Artifact location with install-directory fallback
//! - Artifact parsing and validation
//! - Exactly-once, retry-on-failure caching

pub mod bundle;
pub mod cache;
pub mod locate;

pub use bundle::{BundleArtifact, ModelBundle};
pub use cache::BundleStore;
pub use locate::BundleLocator;

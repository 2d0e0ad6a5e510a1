//! diaclass-engine: Inference engine for diaclass
//!
//! This crate turns validated patient profiles into decisions:
//! - Feature vector assembly in the bundle's column order
//! - Scoring and probability checks
//! - The inclusive threshold rule
//! - Metadata and liveness reads

pub mod engine;
pub mod features;

pub use engine::InferenceEngine;
pub use features::build_feature_vector;

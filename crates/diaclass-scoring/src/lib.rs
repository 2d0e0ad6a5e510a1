//! diaclass-scoring: Scorer abstraction layer
//!
//! This crate provides the scoring functions a model bundle can carry:
//! - Logistic regression with optional standardization
//! - Gradient-boosted regression trees
//! - Platt and isotonic calibration on top of either

pub mod calibration;
pub mod linear;
pub mod spec;
pub mod traits;
pub mod trees;

pub use calibration::{Calibrated, Calibration};
pub use linear::{LogisticScorer, LogisticSpec};
pub use spec::ScorerSpec;
pub use traits::{sigmoid, Scorer};
pub use trees::{BoostedTreesScorer, BoostedTreesSpec, Node, Tree};

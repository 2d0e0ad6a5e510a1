//! diaclass-core: Core types for the diabetes risk classifier
//!
//! This crate provides the fundamental types used throughout diaclass:
//! - Patient profile and name-based feature lookup
//! - Decision and model metadata
//! - Configuration types
//! - Error handling

pub mod config;
pub mod decision;
pub mod error;
pub mod profile;

pub use config::*;
pub use decision::*;
pub use error::*;
pub use profile::*;

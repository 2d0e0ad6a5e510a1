//! diaclass-api: REST API server for diaclass
//!
//! This crate provides the HTTP surface of the classifier:
//! - Prediction
//! - Model metadata
//! - Health probe

pub mod rest;

pub use rest::{create_router, AppState};

//! Volconfig: Volume Configuration Management
//!
//! Merges per-volume option overrides into tenant defaults, validates the
//! result and persists it under a pool/volume namespace in a hierarchical
//! key-value store.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod merge;
pub mod namespace;
pub mod repository;
pub mod store;
pub mod tenant;
pub mod volume;

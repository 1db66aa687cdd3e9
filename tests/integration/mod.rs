//! Integration tests for volume configuration management

mod config_loading;
mod repository_lifecycle;
mod sled_repository;

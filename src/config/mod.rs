//! Configuration module for dashboard capture runs
//!
//! This module provides the `CaptureConfig` struct, its type-safe builder and
//! the environment loader used by the binary.

// Sub-modules
pub mod builder;
pub mod env;
pub mod error;
pub mod getters;
pub mod types;

// Re-exports for public API
pub use builder::{CaptureConfigBuilder, Complete, WithStorage};
pub use error::ConfigError;
pub use types::{CaptureConfig, WaitTimings};

//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the provider,
//! correction preferences and display, `AppPaths` for cross-platform
//! directories, and TOML persistence via `AppConfig::load` /
//! `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, CorrectionConfig, DisplayConfig, DomainMode, LlmConfig, StyleMode, API_KEY_ENV,
};

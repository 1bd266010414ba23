//! Configuration module for voxnorm
//!
//! Handles loading settings from a TOML file plus environment overrides.

mod settings;

pub use settings::{GeneralSettings, LlmSettings, Settings};

//! voxnorm - Turns noisy spoken transcripts into canonical voice-agent commands
//!
//! Filler-laden speech goes in, one of `search ...`, `calculate ...`,
//! `add a note ...`, `list notes`, or a short direct answer comes out.

pub mod cli;
pub mod config;
pub mod llm;
pub mod normalizer;

pub use normalizer::{normalize, Intent, Normalizer, NormalizerResult};

use thiserror::Error;

/// Reasons a classification call produced nothing usable.
///
/// These never reach callers of [`normalize`]; they only label the degrade
/// path in logs and tests.
#[derive(Error, Debug)]
pub enum ClassifyError {
    #[error("Classification request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Classification service returned status {0}")]
    Status(u16),

    #[error("Classification service returned no text")]
    EmptyResponse,

    #[error("Malformed classification response: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, ClassifyError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "voxnorm";

//! Transcript normalization
//!
//! Turns a raw utterance into a canonical command by asking the
//! classification service, and falls back to echoing the trimmed utterance
//! whenever anything along the way is missing or malformed.

mod intent;

pub use intent::{Intent, NormalizerResult, MAX_ANSWER_CHARS};

use std::sync::{Arc, OnceLock};

use crate::config::Settings;
use crate::llm::{build_provider, ClassificationProvider, ClassificationRequest, SYSTEM_PROMPT};

/// Maps transcripts to canonical commands.
///
/// Holds no mutable state, so one instance can serve concurrent callers.
pub struct Normalizer {
    provider: Option<Arc<dyn ClassificationProvider>>,
    max_tokens: u32,
    temperature: f32,
}

impl Normalizer {
    /// Create a normalizer around an optional provider with default sampling.
    pub fn new(provider: Option<Arc<dyn ClassificationProvider>>) -> Self {
        let defaults = Settings::default();
        Self {
            provider,
            max_tokens: defaults.llm.max_tokens,
            temperature: defaults.llm.temperature,
        }
    }

    /// Create a normalizer from runtime settings.
    ///
    /// A provider that cannot be built leaves the normalizer in passthrough mode.
    pub fn from_settings(settings: &Settings) -> Self {
        let provider = build_provider(settings).unwrap_or_else(|e| {
            tracing::warn!("Classification disabled: {:#}", e);
            None
        });

        Self {
            provider,
            max_tokens: settings.llm.max_tokens,
            temperature: settings.llm.temperature,
        }
    }

    /// Process-wide normalizer, built from the loaded settings on first use.
    pub fn shared() -> &'static Normalizer {
        static SHARED: OnceLock<Normalizer> = OnceLock::new();
        SHARED.get_or_init(|| {
            let settings = Settings::load().unwrap_or_else(|e| {
                tracing::warn!("Failed to load settings, using defaults: {:#}", e);
                Settings::from_env()
            });
            Self::from_settings(&settings)
        })
    }

    /// Whether a classification service is configured.
    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    /// Normalize one transcript. Never fails; degrades to passthrough.
    pub async fn normalize(&self, transcript: &str) -> NormalizerResult {
        let raw = transcript.trim();

        let provider = match &self.provider {
            Some(provider) if !raw.is_empty() => provider,
            _ => {
                tracing::debug!(
                    empty = raw.is_empty(),
                    available = self.is_available(),
                    "Skipping classification"
                );
                return NormalizerResult::passthrough(raw);
            }
        };

        let request = ClassificationRequest {
            instruction: SYSTEM_PROMPT,
            transcript: raw,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let text = match provider.classify(request).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Classification failed, passing transcript through: {}", e);
                return NormalizerResult::passthrough(raw);
            }
        };

        match Intent::parse_response(&text, raw) {
            Ok(intent) => {
                tracing::debug!(intent = intent.kind(), "Classified transcript");
                intent.into_result(raw)
            }
            Err(e) => {
                tracing::debug!(response = %text, "{}", e);
                NormalizerResult::passthrough(raw)
            }
        }
    }
}

/// Normalize with the process-wide [`Normalizer::shared`] instance.
pub async fn normalize(transcript: &str) -> NormalizerResult {
    Normalizer::shared().normalize(transcript).await
}

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Settings;
use crate::llm::openrouter::OpenRouterClient;

/// Classification request payload.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationRequest<'a> {
    pub instruction: &'a str,
    pub transcript: &'a str,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// External service that returns raw, untrusted classification text.
#[async_trait]
pub trait ClassificationProvider: Send + Sync {
    async fn classify(&self, request: ClassificationRequest<'_>) -> crate::Result<String>;
}

/// Build a classification provider from runtime settings.
///
/// Returns `Ok(None)` when no credential is configured.
pub fn build_provider(
    settings: &Settings,
) -> anyhow::Result<Option<Arc<dyn ClassificationProvider>>> {
    if !settings.llm.has_api_key() {
        return Ok(None);
    }

    match settings.llm.provider.trim().to_lowercase().as_str() {
        "openrouter" => Ok(Some(Arc::new(OpenRouterClient::from_settings(settings)?))),
        other => anyhow::bail!(
            "Unsupported llm.provider '{}'. Supported providers: openrouter",
            other
        ),
    }
}

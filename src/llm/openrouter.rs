use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::llm::client::{ClassificationProvider, ClassificationRequest};
use crate::ClassifyError;

const DEFAULT_OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1";
const DEFAULT_OPENROUTER_MODEL: &str = "meta-llama/llama-3.3-70b-instruct:free";

pub struct OpenRouterClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
    site_url: Option<String>,
    site_title: Option<String>,
}

impl OpenRouterClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.llm.api_key.trim().to_string();
        if api_key.is_empty() {
            anyhow::bail!(
                "OpenRouter API key is missing. Set llm.api_key in config or OPENROUTER_API_KEY."
            );
        }

        let model = if settings.llm.model.trim().is_empty() {
            DEFAULT_OPENROUTER_MODEL.to_string()
        } else {
            settings.llm.model.trim().to_string()
        };

        let endpoint = if settings.llm.endpoint.trim().is_empty() {
            DEFAULT_OPENROUTER_ENDPOINT.to_string()
        } else {
            settings
                .llm
                .endpoint
                .trim()
                .trim_end_matches('/')
                .to_string()
        };

        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(settings.llm.timeout_secs))
                .build()
                .context("Failed to build OpenRouter HTTP client")?,
            api_key,
            model,
            endpoint,
            site_url: non_empty(&settings.llm.site_url),
            site_title: non_empty(&settings.llm.site_title),
        })
    }

    fn request_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[async_trait]
impl ClassificationProvider for OpenRouterClient {
    async fn classify(&self, request: ClassificationRequest<'_>) -> crate::Result<String> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.instruction,
                },
                ChatMessage {
                    role: "user",
                    content: request.transcript,
                },
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let mut builder = self
            .http
            .post(self.request_url())
            .bearer_auth(&self.api_key)
            .json(&body);
        if let Some(referer) = &self.site_url {
            builder = builder.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.site_title {
            builder = builder.header("X-Title", title);
        }

        let response = builder.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifyError::Status(status.as_u16()));
        }

        let payload: ChatCompletionResponse = response.json().await?;

        // Only the first choice counts
        payload
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or(ClassifyError::EmptyResponse)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn settings_for(endpoint: &str) -> Settings {
        let mut settings = Settings::default();
        settings.llm.api_key = "sk-test".to_string();
        settings.llm.endpoint = format!("{endpoint}/");
        settings
    }

    fn request<'a>(transcript: &'a str) -> ClassificationRequest<'a> {
        ClassificationRequest {
            instruction: "classify",
            transcript,
            max_tokens: 200,
            temperature: 0.1,
        }
    }

    #[test]
    fn from_settings_requires_api_key() {
        let err = match OpenRouterClient::from_settings(&Settings::default()) {
            Ok(_) => panic!("expected client creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("OpenRouter API key is missing"));
    }

    #[test]
    fn endpoint_trailing_slash_is_trimmed() {
        let client = OpenRouterClient::from_settings(&settings_for("http://localhost:1")).unwrap();
        assert_eq!(client.request_url(), "http://localhost:1/chat/completions");
        assert!(client.site_url.is_none());
        assert!(client.site_title.is_none());
    }

    #[tokio::test]
    async fn sends_chat_request_and_returns_first_text() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_header("http-referer", Matcher::Missing)
            .match_header("x-title", Matcher::Missing)
            .match_body(Matcher::PartialJson(json!({
                "model": "meta-llama/llama-3.3-70b-instruct:free",
                "max_tokens": 200,
                "messages": [
                    {"role": "system", "content": "classify"},
                    {"role": "user", "content": "uh search ada lovelace"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"{\"action\":\"search\",\"content\":\"Ada Lovelace\"}"}}]}"#,
            )
            .create_async()
            .await;

        let client = OpenRouterClient::from_settings(&settings_for(&server.url())).unwrap();
        let text = client.classify(request("uh search ada lovelace")).await.unwrap();

        assert_eq!(text, r#"{"action":"search","content":"Ada Lovelace"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn attribution_headers_sent_when_configured() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("http-referer", "https://example.com")
            .match_header("x-title", "Voice Agent")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"ok"}}]}"#)
            .create_async()
            .await;

        let mut settings = settings_for(&server.url());
        settings.llm.site_url = "https://example.com".to_string();
        settings.llm.site_title = "Voice Agent".to_string();
        let client = OpenRouterClient::from_settings(&settings).unwrap();

        assert_eq!(client.classify(request("hi")).await.unwrap(), "ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(r#"{"error":"rate limited"}"#)
            .create_async()
            .await;

        let client = OpenRouterClient::from_settings(&settings_for(&server.url())).unwrap();
        let err = client.classify(request("hi")).await.unwrap_err();
        assert!(matches!(err, ClassifyError::Status(429)));
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let client = OpenRouterClient::from_settings(&settings_for(&server.url())).unwrap();
        let err = client.classify(request("hi")).await.unwrap_err();
        assert!(matches!(err, ClassifyError::EmptyResponse));
    }

    #[tokio::test]
    async fn blank_first_choice_is_an_error_even_with_later_choices() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(
                r#"{"choices":[{"message":{"content":"  "}},{"message":{"content":"{\"action\":\"list_notes\",\"content\":\"\"}"}}]}"#,
            )
            .create_async()
            .await;

        let client = OpenRouterClient::from_settings(&settings_for(&server.url())).unwrap();
        let err = client.classify(request("what is on my list")).await.unwrap_err();
        assert!(matches!(err, ClassifyError::EmptyResponse));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        let client = OpenRouterClient::from_settings(&settings_for("http://127.0.0.1:9")).unwrap();
        let err = client.classify(request("hi")).await.unwrap_err();
        assert!(matches!(err, ClassifyError::Transport(_)));
    }
}

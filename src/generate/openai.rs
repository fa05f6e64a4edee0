//! Azure OpenAI chat-completions client.
use super::{ChatMessage, TextGenerator};
use crate::error::{Error, Result};
use serde::Deserialize;

pub const DEFAULT_API_VERSION: &str = "2024-02-15-preview";
pub const DEFAULT_DEPLOYMENT: &str = "gpt-4o-mini";

/// Endpoint, key and deployment for one Azure OpenAI resource.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Resource endpoint, e.g. `https://example.openai.azure.com/`.
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
}

impl OpenAiConfig {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            deployment: deployment.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Read `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_API_KEY` and
    /// `DEPLOYMENT_NAME` from the environment; only the key is mandatory.
    pub fn from_env() -> Result<Self> {
        let endpoint = std::env::var("AZURE_OPENAI_ENDPOINT")
            .map_err(|_| Error::Config("AZURE_OPENAI_ENDPOINT is not set".into()))?;
        let api_key = std::env::var("AZURE_OPENAI_API_KEY")
            .map_err(|_| Error::Config("AZURE_OPENAI_API_KEY is not set".into()))?;
        let deployment =
            std::env::var("DEPLOYMENT_NAME").unwrap_or_else(|_| DEFAULT_DEPLOYMENT.to_string());
        Ok(Self::new(endpoint, api_key, deployment))
    }

    fn chat_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

/// Blocking chat-completions client.
pub struct OpenAiClient {
    config: OpenAiConfig,
    http: reqwest::blocking::Client,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            config,
            http: reqwest::blocking::Client::new(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(OpenAiConfig::from_env()?))
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl TextGenerator for OpenAiClient {
    fn complete(&self, messages: &[ChatMessage], max_tokens: u32) -> Result<Option<String>> {
        let body = serde_json::json!({
            "messages": messages,
            "max_tokens": max_tokens,
        });

        let response = self
            .http
            .post(self.config.chat_url())
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()
            .map_err(|e| Error::Generator(format!("chat completions request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(Error::Generator(format!(
                "chat completions returned {status}: {detail}"
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| Error::Generator(format!("chat completions body: {e}")))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_url_normalizes_trailing_slash() {
        let config = OpenAiConfig::new("https://r.openai.azure.com/", "k", "gpt-4o-mini");
        assert_eq!(
            config.chat_url(),
            "https://r.openai.azure.com/openai/deployments/gpt-4o-mini/chat/completions\
?api-version=2024-02-15-preview"
        );
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"  hola  "}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        let content = parsed.choices[0].message.content.as_deref();
        assert_eq!(content, Some("  hola  "));
    }

    #[test]
    fn test_empty_choices_is_none() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(parsed.choices.is_empty());
    }
}

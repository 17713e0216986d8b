//! Ollama model provider.
//!
//! Connects to an Ollama instance for running models like Llama or Mistral.
//!
//! # Example
//!
//! ```ignore
//! use sleuth_models::providers::{OllamaProvider, OllamaProviderConfig};
//!
//! let provider = OllamaProvider::from_config(&OllamaProviderConfig {
//!     base_url: "http://192.168.1.100:11434".to_string(),
//!     ..Default::default()
//! })?;
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Default Ollama API base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

// ────────────────────────────────────────────────────────────────────────────
// Ollama API Types
// ────────────────────────────────────────────────────────────────────────────

/// Request body for Ollama's `/api/generate` endpoint.
#[derive(Debug, Serialize)]
pub struct OllamaGenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

/// Response from Ollama's `/api/generate` endpoint.
#[derive(Debug, Deserialize)]
pub struct OllamaGenerateResponse {
    pub model: String,
    pub response: String,
    pub done: bool,
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    #[serde(default)]
    pub eval_count: Option<u64>,
}

impl From<OllamaGenerateResponse> for super::GenerateResponse {
    fn from(response: OllamaGenerateResponse) -> Self {
        Self {
            usage: super::Usage::new(
                response.prompt_eval_count.unwrap_or(0),
                response.eval_count.unwrap_or(0),
            ),
            text: response.response,
        }
    }
}

/// Request body for Ollama's `/api/pull` endpoint.
#[derive(Debug, Serialize)]
pub struct OllamaPullRequest {
    pub model: String,
    pub stream: bool,
}

/// Final status from Ollama's `/api/pull` endpoint.
#[derive(Debug, Deserialize)]
pub struct OllamaPullResponse {
    pub status: String,
}

// ────────────────────────────────────────────────────────────────────────────
// OllamaProvider
// ────────────────────────────────────────────────────────────────────────────

/// Connection settings for [`OllamaProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaProviderConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for OllamaProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Ollama model provider.
pub struct OllamaProvider {
    base_url: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    /// Create a provider from connection settings, applying the timeout
    /// to every request.
    pub fn from_config(config: &OllamaProviderConfig) -> crate::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| crate::Error::Request(e.to_string()))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Get the base URL for this provider.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Generate a completion for one prompt.
    pub async fn generate(
        &self,
        request: super::GenerateRequest,
    ) -> crate::Result<super::GenerateResponse> {
        let url = format!("{}/api/generate", self.base_url);

        let body = OllamaGenerateRequest {
            model: request.model,
            prompt: request.prompt,
            stream: false,
        };
        debug!(model = %body.model, prompt_len = body.prompt.len(), "sending generate request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| crate::Error::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(crate::Error::ProviderApi(format!(
                "Ollama API returned {}: {}",
                status, body
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| crate::Error::Request(e.to_string()))?;
        let generated: OllamaGenerateResponse = serde_json::from_str(&text)?;
        Ok(generated.into())
    }

    /// Download `model` if the server does not have it yet.
    pub async fn pull(&self, model: &str) -> crate::Result<()> {
        let url = format!("{}/api/pull", self.base_url);
        info!(model, "pulling model");

        let response = self
            .client
            .post(&url)
            .json(&OllamaPullRequest {
                model: model.to_string(),
                stream: false,
            })
            .send()
            .await
            .map_err(|e| crate::Error::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(crate::Error::ProviderApi(format!(
                "Ollama pull returned {}: {}",
                status, body
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| crate::Error::Request(e.to_string()))?;
        let pulled: OllamaPullResponse = serde_json::from_str(&text)?;
        if pulled.status != "success" {
            return Err(crate::Error::ProviderApi(format!(
                "Ollama pull of '{}' ended with status '{}'",
                model, pulled.status
            )));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl super::ModelProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(
        &self,
        request: super::GenerateRequest,
    ) -> crate::Result<super::GenerateResponse> {
        OllamaProvider::generate(self, request).await
    }

    async fn prepare(&self, model: &str) -> crate::Result<()> {
        self.pull(model).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{GenerateRequest, GenerateResponse, ModelProvider};

    #[test]
    fn default_config_targets_localhost() {
        let provider = OllamaProvider::from_config(&OllamaProviderConfig::default()).unwrap();
        assert_eq!(provider.base_url(), "http://localhost:11434");
    }

    #[test]
    fn from_config_trims_trailing_slash() {
        let config = OllamaProviderConfig {
            base_url: "http://192.168.1.100:11434/".to_string(),
            ..Default::default()
        };
        let provider = OllamaProvider::from_config(&config).unwrap();
        assert_eq!(provider.base_url(), "http://192.168.1.100:11434");
    }

    #[test]
    fn from_config_uses_configured_url() {
        let config = OllamaProviderConfig {
            base_url: "http://gpu-box:11434".to_string(),
            timeout: Duration::from_secs(5),
        };
        let provider = OllamaProvider::from_config(&config).unwrap();
        assert_eq!(provider.base_url(), "http://gpu-box:11434");
        assert_eq!(ModelProvider::name(&provider), "ollama");
    }

    // ────────────────────────────────────────────────────────────────────────────
    // Wire Format Tests
    // ────────────────────────────────────────────────────────────────────────────

    #[test]
    fn generate_request_disables_streaming() {
        let body = OllamaGenerateRequest {
            model: "llama3.2".to_string(),
            prompt: "hi".to_string(),
            stream: false,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"model":"llama3.2","prompt":"hi","stream":false}"#);
    }

    #[test]
    fn parse_generate_response_extracts_text_and_usage() {
        let json = r#"{
            "model": "llama3.2",
            "created_at": "2024-01-15T10:00:00Z",
            "response": "Session: 1\nRank:\nPlayer_B\nPlayer_Q",
            "done": true,
            "context": [1, 2, 3],
            "total_duration": 1234567890,
            "prompt_eval_count": 120,
            "eval_count": 15
        }"#;

        let parsed: OllamaGenerateResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.done);

        let response: GenerateResponse = parsed.into();
        assert_eq!(response.text, "Session: 1\nRank:\nPlayer_B\nPlayer_Q");
        assert_eq!(response.usage.input_tokens, 120);
        assert_eq!(response.usage.output_tokens, 15);
    }

    #[test]
    fn missing_eval_counts_default_to_zero() {
        let json = r#"{"model": "m", "response": "ok", "done": true}"#;
        let response: GenerateResponse = serde_json::from_str::<OllamaGenerateResponse>(json)
            .unwrap()
            .into();
        assert_eq!(response.usage.total_tokens, 0);
    }

    #[test]
    fn parse_pull_response() {
        let parsed: OllamaPullResponse = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert_eq!(parsed.status, "success");
    }

    // ────────────────────────────────────────────────────────────────────────────
    // Integration Tests (require Ollama running)
    // ────────────────────────────────────────────────────────────────────────────

    #[tokio::test]
    #[ignore = "requires Ollama running locally with a model installed"]
    async fn integration_generate_sends_request_to_ollama() {
        let base_url =
            std::env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string());

        let provider = OllamaProvider::from_config(&OllamaProviderConfig {
            base_url,
            ..Default::default()
        })
        .expect("provider should build");
        let request = GenerateRequest::new(&model, "Say 'hello' and nothing else.");

        let response = provider
            .generate(request)
            .await
            .expect("generate should succeed");
        println!("Response: {}", response.text);
        assert!(!response.text.is_empty());
    }
}

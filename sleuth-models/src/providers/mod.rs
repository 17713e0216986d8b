//! Model provider trait and implementations.
//!
//! The [`ModelProvider`] trait is the whole surface the ranking pipeline
//! needs from a model: generate text for a prompt, and optionally make
//! sure a model is available first.
//!
//! # Example
//!
//! ```ignore
//! use sleuth_models::providers::{GenerateRequest, ModelProvider, OllamaProvider};
//!
//! async fn ask(provider: &dyn ModelProvider) -> sleuth_models::Result<String> {
//!     let response = provider
//!         .generate(GenerateRequest::new("llama3.2", "Who is the mafia?"))
//!         .await?;
//!     Ok(response.text)
//! }
//! ```

mod ollama;
mod types;

use async_trait::async_trait;

pub use ollama::{OllamaProvider, OllamaProviderConfig};
pub use types::*;

use crate::Result;

/// Trait for model providers.
///
/// # Required Methods
///
/// - [`name`](ModelProvider::name) - Provider identifier (e.g., "ollama")
/// - [`generate`](ModelProvider::generate) - Non-streaming completion for one prompt
///
/// # Optional Methods
///
/// - [`prepare`](ModelProvider::prepare) - Make a model available before a batch
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Returns the provider name.
    fn name(&self) -> &str;

    /// Generate a completion for a single prompt.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Make `model` available (e.g. download it).
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    async fn prepare(&self, _model: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A mock provider for testing the trait.
    struct EchoProvider;

    #[async_trait]
    impl ModelProvider for EchoProvider {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
            Ok(GenerateResponse {
                text: format!("Echo: {}", request.prompt),
                usage: Usage::new(10, 5),
            })
        }
    }

    #[tokio::test]
    async fn mock_provider_generate_returns_response() {
        let provider = EchoProvider;
        let response = provider
            .generate(GenerateRequest::new("m", "Hello"))
            .await
            .unwrap();

        assert_eq!(response.text, "Echo: Hello");
        assert_eq!(response.usage.total_tokens, 15);
    }

    #[tokio::test]
    async fn default_prepare_succeeds() {
        let provider = EchoProvider;
        assert!(provider.prepare("anything").await.is_ok());
    }

    #[test]
    fn provider_is_object_safe() {
        let provider: Box<dyn ModelProvider> = Box::new(EchoProvider);
        assert_eq!(provider.name(), "echo");
    }
}

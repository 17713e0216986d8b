//! Request and response types for model providers.

use serde::{Deserialize, Serialize};

/// Token usage statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Number of input/prompt tokens.
    pub input_tokens: u64,
    /// Number of output/completion tokens.
    pub output_tokens: u64,
    /// Total tokens (input + output).
    pub total_tokens: u64,
}

impl Usage {
    /// Create new usage statistics.
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

/// Request for a single-prompt completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model name to use.
    pub model: String,
    /// The full prompt text.
    pub prompt: String,
}

impl GenerateRequest {
    /// Create a new generate request.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
        }
    }
}

/// Response from a completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated text.
    pub text: String,
    /// Token usage statistics.
    pub usage: Usage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_new_sets_model_and_prompt() {
        let req = GenerateRequest::new("llama3.2", "Rank the players");

        assert_eq!(req.model, "llama3.2");
        assert_eq!(req.prompt, "Rank the players");
    }

    #[test]
    fn usage_calculates_total() {
        let usage = Usage::new(100, 50);
        assert_eq!(usage.input_tokens, 100);
        assert_eq!(usage.output_tokens, 50);
        assert_eq!(usage.total_tokens, 150);
    }

    #[test]
    fn request_serializes_model_and_prompt_only() {
        let json = serde_json::to_string(&GenerateRequest::new("m", "p")).unwrap();
        assert_eq!(json, r#"{"model":"m","prompt":"p"}"#);
    }
}

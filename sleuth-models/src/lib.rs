//! Model access for sleuth.
//!
//! The ranking pipeline talks to language models through the
//! [`ModelProvider`](providers::ModelProvider) trait: a prompt goes in, the
//! model's text comes back. [`OllamaProvider`](providers::OllamaProvider)
//! implements it against a local or remote Ollama server.
//!
//! Providers are plain values built from configuration and handed to the
//! code that needs them; nothing here holds process-wide state.

mod error;

pub mod providers;

pub use error::{Error, Result};

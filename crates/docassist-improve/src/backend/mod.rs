//! Model backends
//!
//! A backend turns text into improved text. Remote chat backends may also
//! return their own suggestions; local seq2seq backends never do, and the
//! orchestrator derives suggestions from a diff instead.

mod ollama;
mod seq2seq;

pub use ollama::OllamaChatBackend;
pub use seq2seq::LocalSeq2SeqBackend;

use std::time::Duration;

use async_trait::async_trait;
use docassist_config::{BackendConfig, BackendKind};

use crate::error::Result;
use crate::suggestion::Suggestion;

/// Static description of a configured backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendDescriptor {
    pub kind: BackendKind,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl BackendDescriptor {
    pub fn from_config(config: &BackendConfig) -> Self {
        Self {
            kind: config.kind,
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// `kind:model`, used in logs and errors
    pub fn label(&self) -> String {
        format!("{}:{}", self.kind, self.model)
    }
}

/// What a backend produced for one request
#[derive(Debug, Clone, PartialEq)]
pub struct BackendOutput {
    pub improved_text: String,
    /// Suggestions supplied by the model itself, if any
    pub suggestions: Option<Vec<Suggestion>>,
}

impl BackendOutput {
    pub fn text(improved_text: impl Into<String>) -> Self {
        Self {
            improved_text: improved_text.into(),
            suggestions: None,
        }
    }
}

#[async_trait]
pub trait ImproveBackend: Send + Sync {
    fn descriptor(&self) -> &BackendDescriptor;

    /// Improve `text`. Implementations may ignore `want_suggestions`.
    async fn improve(&self, text: &str, want_suggestions: bool) -> Result<BackendOutput>;
}

/// Build the backend for `config` and check that it is reachable
pub async fn connect_backend(config: &BackendConfig) -> Result<Box<dyn ImproveBackend>> {
    let descriptor = BackendDescriptor::from_config(config);
    match config.kind {
        BackendKind::RemoteChat => Ok(Box::new(OllamaChatBackend::connect(descriptor).await?)),
        BackendKind::LocalSeq2seq => Ok(Box::new(LocalSeq2SeqBackend::connect(descriptor).await?)),
    }
}

pub(crate) fn http_client(descriptor: &BackendDescriptor) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(descriptor.timeout)
        .connect_timeout(descriptor.timeout.min(Duration::from_secs(10)))
        .build()
        .map_err(|e| crate::error::ImproveError::request(descriptor.label(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_from_config() {
        let config = BackendConfig::remote_chat("llama3.1:latest", "http://localhost:11434/")
            .with_timeout(5);
        let descriptor = BackendDescriptor::from_config(&config);
        assert_eq!(descriptor.endpoint, "http://localhost:11434");
        assert_eq!(descriptor.timeout, Duration::from_secs(5));
        assert_eq!(descriptor.label(), "remote-chat:llama3.1:latest");
    }

    #[tokio::test]
    async fn test_connect_unreachable_backend_fails() {
        let config = BackendConfig::local_seq2seq("t5-small", "http://127.0.0.1:1").with_timeout(2);
        assert!(connect_backend(&config).await.is_err());
    }
}

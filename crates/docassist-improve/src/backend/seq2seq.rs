//! Local text2text backend behind an OpenAI-compatible HTTP server
//!
//! The model is prompted with `paraphrase: <text>` and its whole output is
//! taken as the improved text. It never produces suggestions.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::{http_client, BackendDescriptor, BackendOutput, ImproveBackend};
use crate::error::{ImproveError, Result};

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: String,
}

pub struct LocalSeq2SeqBackend {
    descriptor: BackendDescriptor,
    client: reqwest::Client,
}

impl LocalSeq2SeqBackend {
    pub fn new(descriptor: BackendDescriptor) -> Result<Self> {
        let client = http_client(&descriptor)?;
        Ok(Self { descriptor, client })
    }

    /// Create the backend and confirm the model server answers
    pub async fn connect(descriptor: BackendDescriptor) -> Result<Self> {
        let backend = Self::new(descriptor)?;
        let label = backend.descriptor.label();
        let url = format!("{}/v1/models", backend.descriptor.endpoint);

        let response = backend
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ImproveError::unavailable(&label, e))?;
        if !response.status().is_success() {
            return Err(ImproveError::unavailable(
                label,
                format!("model listing returned {}", response.status()),
            ));
        }

        info!(backend = %label, "Connected to seq2seq backend");
        Ok(backend)
    }
}

#[async_trait]
impl ImproveBackend for LocalSeq2SeqBackend {
    fn descriptor(&self) -> &BackendDescriptor {
        &self.descriptor
    }

    async fn improve(&self, text: &str, _want_suggestions: bool) -> Result<BackendOutput> {
        let label = self.descriptor.label();
        let url = format!("{}/v1/chat/completions", self.descriptor.endpoint);
        let body = serde_json::json!({
            "model": self.descriptor.model,
            "messages": [{ "role": "user", "content": format!("paraphrase: {}", text) }],
        });

        debug!(backend = %label, chars = text.len(), "Sending paraphrase request");
        let response = self
            .client
            .post(&url)
            .header("Authorization", "Bearer EMPTY")
            .json(&body)
            .send()
            .await
            .map_err(|e| ImproveError::request(&label, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ImproveError::unavailable(
                label,
                format!("completion returned {}: {}", status, error_text.trim()),
            ));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ImproveError::malformed(&label, e))?;
        let improved = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
            .unwrap_or_default();

        if improved.is_empty() {
            return Err(ImproveError::malformed(label, "model returned no text"));
        }
        Ok(BackendOutput::text(improved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        routing::{get, post},
        Json, Router,
    };
    use docassist_config::BackendConfig;
    use serde_json::{json, Value};

    async fn spawn_server(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn fake_server(reply: &'static str) -> Router {
        Router::new()
            .route(
                "/v1/models",
                get(|| async { Json(json!({ "data": [{ "id": "t5-small" }] })) }),
            )
            .route(
                "/v1/chat/completions",
                post(move |Json(body): Json<Value>| async move {
                    let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
                    assert!(prompt.starts_with("paraphrase: "));
                    Json(json!({ "choices": [{ "message": { "role": "assistant", "content": reply } }] }))
                }),
            )
    }

    fn descriptor(endpoint: &str) -> BackendDescriptor {
        BackendDescriptor::from_config(&BackendConfig::local_seq2seq("t5-small", endpoint))
    }

    #[tokio::test]
    async fn test_paraphrase_is_trimmed() {
        let endpoint = spawn_server(fake_server("  This is the document. \n")).await;
        let backend = LocalSeq2SeqBackend::connect(descriptor(&endpoint)).await.unwrap();

        let output = backend.improve("This is teh document.", true).await.unwrap();
        assert_eq!(output.improved_text, "This is the document.");
        assert!(output.suggestions.is_none());
    }

    #[tokio::test]
    async fn test_empty_output_is_malformed() {
        let endpoint = spawn_server(fake_server("   ")).await;
        let backend = LocalSeq2SeqBackend::connect(descriptor(&endpoint)).await.unwrap();

        let err = backend.improve("text", false).await.unwrap_err();
        assert!(matches!(err, ImproveError::MalformedResponse { .. }));
    }
}

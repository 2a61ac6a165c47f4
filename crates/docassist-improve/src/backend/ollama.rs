//! Remote chat backend speaking the Ollama HTTP API

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{http_client, BackendDescriptor, BackendOutput, ImproveBackend};
use crate::error::{ImproveError, Result};
use crate::suggestion::{renumber, Suggestion, SuggestionStatus};

const DEFAULT_REASON: &str = "general improvement";

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    format: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ChatReplyMessage {
    content: String,
}

/// The JSON object the model is asked to produce
#[derive(Debug, Deserialize)]
struct ImprovementReply {
    improved_text: Option<String>,
    suggestions: Option<Vec<RawSuggestion>>,
}

/// Suggestion as written by a model; every field may be missing or off
#[derive(Debug, Deserialize)]
struct RawSuggestion {
    start: Option<usize>,
    end: Option<usize>,
    original_text: Option<String>,
    improved_text: Option<String>,
    reason: Option<String>,
}

pub struct OllamaChatBackend {
    descriptor: BackendDescriptor,
    client: reqwest::Client,
}

impl OllamaChatBackend {
    /// Create the backend without contacting the server
    pub fn new(descriptor: BackendDescriptor) -> Result<Self> {
        let client = http_client(&descriptor)?;
        Ok(Self { descriptor, client })
    }

    /// Create the backend and confirm the server knows the model
    pub async fn connect(descriptor: BackendDescriptor) -> Result<Self> {
        let backend = Self::new(descriptor)?;
        backend.check_model().await?;
        info!(backend = %backend.descriptor.label(), "Connected to chat backend");
        Ok(backend)
    }

    async fn check_model(&self) -> Result<()> {
        let label = self.descriptor.label();
        let url = format!("{}/api/show", self.descriptor.endpoint);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "model": self.descriptor.model }))
            .send()
            .await
            .map_err(|e| ImproveError::unavailable(&label, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ImproveError::unavailable(
                label,
                format!("model check returned {}: {}", status, body.trim()),
            ));
        }
        Ok(())
    }

    fn prompt(text: &str, want_suggestions: bool) -> String {
        let mut prompt =
            String::from("Improve the following text for clarity, grammar, and style.");
        if want_suggestions {
            prompt.push_str(" Provide a list of suggestions with reasons.");
        }
        prompt.push_str("\nText: ");
        prompt.push_str(text);
        prompt.push_str(
            "\nFormat the response as JSON with 'improved_text' and 'suggestions' fields.\n\
             Suggestions should include 'id', 'start', 'end', 'original_text', \
             'improved_text', 'reason', and 'status'.",
        );
        prompt
    }
}

#[async_trait]
impl ImproveBackend for OllamaChatBackend {
    fn descriptor(&self) -> &BackendDescriptor {
        &self.descriptor
    }

    async fn improve(&self, text: &str, want_suggestions: bool) -> Result<BackendOutput> {
        let label = self.descriptor.label();
        let prompt = Self::prompt(text, want_suggestions);
        let request = ChatRequest {
            model: &self.descriptor.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            stream: false,
            format: "json",
        };

        let url = format!("{}/api/chat", self.descriptor.endpoint);
        debug!(backend = %label, chars = text.len(), "Sending chat request");
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ImproveError::request(&label, e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ImproveError::unavailable(
                label,
                format!("chat returned {}: {}", status, body.trim()),
            ));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ImproveError::malformed(&label, e))?;
        parse_reply(&label, text, &chat.message.content)
    }
}

/// Strip a surrounding ```json fence, if the model added one
fn strip_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn parse_reply(label: &str, original: &str, content: &str) -> Result<BackendOutput> {
    let reply: ImprovementReply = serde_json::from_str(strip_fence(content))
        .map_err(|e| ImproveError::malformed(label, format!("reply is not JSON: {}", e)))?;

    let improved_text = reply
        .improved_text
        .ok_or_else(|| ImproveError::malformed(label, "reply has no improved_text"))?;

    let suggestions = reply
        .suggestions
        .map(|raw| normalize_suggestions(original, raw));

    Ok(BackendOutput {
        improved_text,
        suggestions,
    })
}

/// Fill in missing fields, clamp offsets to the original, order by position
/// and renumber.
fn normalize_suggestions(original: &str, raw: Vec<RawSuggestion>) -> Vec<Suggestion> {
    let len = original.chars().count();
    let mut suggestions: Vec<Suggestion> = raw
        .into_iter()
        .filter_map(|raw| {
            let original_text = raw.original_text.unwrap_or_default();
            let improved_text = raw.improved_text.unwrap_or_default();
            if original_text.is_empty() && improved_text.is_empty() {
                return None;
            }

            let (start, end) = match (raw.start, raw.end) {
                (Some(start), Some(end)) if start <= end && end <= len => (start, end),
                _ => locate(original, &original_text)?,
            };

            Some(Suggestion {
                id: 0,
                start,
                end,
                original_text,
                improved_text,
                reason: raw
                    .reason
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_REASON.to_string()),
                status: SuggestionStatus::Pending,
            })
        })
        .collect();

    suggestions.sort_by_key(|s| (s.start, s.end));
    renumber(&mut suggestions);
    suggestions
}

/// Char span of the first occurrence of `needle` in `haystack`
fn locate(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    if needle.is_empty() {
        return None;
    }
    let byte_start = haystack.find(needle)?;
    let start = haystack[..byte_start].chars().count();
    Some((start, start + needle.chars().count()))
}

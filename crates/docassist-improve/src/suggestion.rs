//! Suggestion and result types

use serde::{Deserialize, Serialize};

/// Review state of a suggestion; only the consumer changes it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

/// One discrete edit between the original and the improved text.
///
/// `start` and `end` are char offsets into the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub id: u32,
    pub start: usize,
    pub end: usize,
    pub original_text: String,
    pub improved_text: String,
    pub reason: String,
    #[serde(default)]
    pub status: SuggestionStatus,
}

/// Outcome of one improvement request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementResult {
    pub improved_text: String,
    pub suggestions: Vec<Suggestion>,
    /// `kind:name` of the backend that produced the result
    #[serde(skip)]
    pub served_by: Option<String>,
}

impl ImprovementResult {
    /// Result that leaves the text untouched
    pub fn unchanged(text: impl Into<String>) -> Self {
        Self {
            improved_text: text.into(),
            suggestions: Vec::new(),
            served_by: None,
        }
    }
}

/// Renumber suggestions 1..n in their current order and reset them to pending
pub(crate) fn renumber(suggestions: &mut [Suggestion]) {
    for (index, suggestion) in suggestions.iter_mut().enumerate() {
        suggestion.id = index as u32 + 1;
        suggestion.status = SuggestionStatus::Pending;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        let s = Suggestion {
            id: 1,
            start: 8,
            end: 11,
            original_text: "teh".to_string(),
            improved_text: "the".to_string(),
            reason: "corrected potential typo or improved word choice".to_string(),
            status: SuggestionStatus::Pending,
        };
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["original_text"], "teh");
    }

    #[test]
    fn test_served_by_is_not_serialized() {
        let mut result = ImprovementResult::unchanged("text");
        result.served_by = Some("remote-chat:llama3.1".to_string());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("served_by").is_none());
    }
}

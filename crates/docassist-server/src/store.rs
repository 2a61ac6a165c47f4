//! Per-user document storage

use dashmap::DashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Inserted,
    Updated,
}

/// Latest improved content per `(user id, filename)`
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<(u64, String), String>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&self, user_id: u64, filename: &str, content: String) -> SaveOutcome {
        match self.documents.insert((user_id, filename.to_string()), content) {
            Some(_) => SaveOutcome::Updated,
            None => SaveOutcome::Inserted,
        }
    }

    pub fn get(&self, user_id: u64, filename: &str) -> Option<String> {
        self.documents
            .get(&(user_id, filename.to_string()))
            .map(|content| content.value().clone())
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }
}

use std::sync::Arc;

use chrono::Duration;
use docassist_config::DocAssistConfig;
use docassist_extract::{ExtractorConfig, TextExtractor};
use docassist_improve::Orchestrator;

use crate::auth::{SessionStore, UserStore};
use crate::store::DocumentStore;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<DocAssistConfig>,
    pub extractor: Arc<TextExtractor>,
    pub orchestrator: Arc<Orchestrator>,
    pub users: Arc<UserStore>,
    pub sessions: Arc<SessionStore>,
    pub documents: Arc<DocumentStore>,
}

impl AppState {
    pub fn new(config: DocAssistConfig, orchestrator: Orchestrator) -> Self {
        let ttl = Duration::minutes(config.server.session_ttl_minutes);
        let extractor = TextExtractor::new(
            ExtractorConfig::default().with_max_entry_bytes(config.server.max_file_size as u64),
        );
        Self {
            config: Arc::new(config),
            extractor: Arc::new(extractor),
            orchestrator: Arc::new(orchestrator),
            users: Arc::new(UserStore::new()),
            sessions: Arc::new(SessionStore::new(ttl)),
            documents: Arc::new(DocumentStore::new()),
        }
    }
}

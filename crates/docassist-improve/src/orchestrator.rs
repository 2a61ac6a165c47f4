//! Ordered fallback across improvement backends

use std::sync::Arc;

use docassist_config::BackendConfig;
use tracing::{info, warn};

use crate::backend::{connect_backend, BackendDescriptor, ImproveBackend};
use crate::diff::suggestions_from_diff;
use crate::error::{ImproveError, Result};
use crate::suggestion::ImprovementResult;

/// Tries each backend in order until one produces an improvement.
///
/// The backend list is fixed at construction and never empty.
pub struct Orchestrator {
    backends: Vec<Arc<dyn ImproveBackend>>,
    suggestions_enabled: bool,
}

impl Orchestrator {
    pub fn new(backends: Vec<Arc<dyn ImproveBackend>>) -> Result<Self> {
        if backends.is_empty() {
            return Err(ImproveError::NoBackends);
        }
        Ok(Self {
            backends,
            suggestions_enabled: true,
        })
    }

    /// Global suggestion switch; ANDed with each caller's request
    pub fn with_suggestions(mut self, enabled: bool) -> Self {
        self.suggestions_enabled = enabled;
        self
    }

    /// Connect every configured backend, keeping those that come up.
    ///
    /// Order is preserved. Fails only when none of them connect.
    pub async fn from_config(configs: &[BackendConfig], suggestions_enabled: bool) -> Result<Self> {
        let mut backends: Vec<Arc<dyn ImproveBackend>> = Vec::with_capacity(configs.len());
        for config in configs {
            match connect_backend(config).await {
                Ok(backend) => backends.push(Arc::from(backend)),
                Err(e) => warn!(
                    kind = %config.kind,
                    model = %config.model,
                    error = %e,
                    "Failed to initialize backend, skipping"
                ),
            }
        }

        info!(
            configured = configs.len(),
            available = backends.len(),
            "Initialized improvement backends"
        );
        Ok(Self::new(backends)?.with_suggestions(suggestions_enabled))
    }

    pub fn descriptors(&self) -> Vec<&BackendDescriptor> {
        self.backends.iter().map(|b| b.descriptor()).collect()
    }

    pub fn suggestions_enabled(&self) -> bool {
        self.suggestions_enabled
    }

    /// Improve `text` with the first backend that succeeds.
    ///
    /// Whitespace-only input is returned unchanged without calling any
    /// backend. Each attempt is bounded by its backend's timeout.
    pub async fn improve(&self, text: &str, want_suggestions: bool) -> Result<ImprovementResult> {
        if text.trim().is_empty() {
            return Ok(ImprovementResult::unchanged(text));
        }
        let want = want_suggestions && self.suggestions_enabled;

        let mut last_error = None;
        for backend in &self.backends {
            let descriptor = backend.descriptor();
            let label = descriptor.label();

            let attempt = tokio::time::timeout(descriptor.timeout, backend.improve(text, want)).await;
            let output = match attempt {
                Ok(Ok(output)) => output,
                Ok(Err(e)) => {
                    warn!(backend = %label, error = %e, "Backend failed, trying next");
                    last_error = Some(e);
                    continue;
                }
                Err(_) => {
                    let e = ImproveError::BackendTimeout {
                        backend: label.clone(),
                        seconds: descriptor.timeout.as_secs(),
                    };
                    warn!(backend = %label, error = %e, "Backend timed out, trying next");
                    last_error = Some(e);
                    continue;
                }
            };

            let suggestions = if !want {
                Vec::new()
            } else {
                match output.suggestions {
                    Some(suggestions) => suggestions,
                    None => {
                        let original = text.to_string();
                        let improved = output.improved_text.clone();
                        tokio::task::spawn_blocking(move || {
                            suggestions_from_diff(&original, &improved)
                        })
                        .await
                        .map_err(|e| ImproveError::Task(e.to_string()))?
                    }
                }
            };

            info!(
                backend = %label,
                suggestions = suggestions.len(),
                "Text improved"
            );
            return Ok(ImprovementResult {
                improved_text: output.improved_text,
                suggestions,
                served_by: Some(label),
            });
        }

        let attempts = self.backends.len();
        Err(match last_error {
            Some(last) => ImproveError::AllBackendsFailed {
                attempts,
                last: Box::new(last),
            },
            None => ImproveError::NoBackends,
        })
    }
}

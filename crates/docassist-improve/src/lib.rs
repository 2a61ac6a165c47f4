//! # DocAssist Improve
//!
//! Text improvement with an ordered chain of model backends and edit
//! suggestions derived from a token-level diff.
//!
//! ## Example
//!
//! ```rust,ignore
//! use docassist_config::BackendConfig;
//! use docassist_improve::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let backends = vec![
//!         BackendConfig::remote_chat("llama3.1:latest", "http://localhost:11434"),
//!         BackendConfig::local_seq2seq("t5-small", "http://localhost:8080"),
//!     ];
//!     let orchestrator = Orchestrator::from_config(&backends, true).await?;
//!     let result = orchestrator.improve("This is teh document.", true).await?;
//!     for s in &result.suggestions {
//!         println!("{}..{}: {} -> {} ({})", s.start, s.end, s.original_text, s.improved_text, s.reason);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Suggestions can also be derived without any model:
//!
//! ```rust
//! use docassist_improve::suggestions_from_diff;
//!
//! let suggestions = suggestions_from_diff("This is teh document.", "This is the document.");
//! assert_eq!(suggestions.len(), 1);
//! assert_eq!((suggestions[0].start, suggestions[0].end), (8, 11));
//! ```

pub mod backend;
pub mod diff;
pub mod error;
pub mod orchestrator;
pub mod suggestion;

pub use backend::{BackendDescriptor, BackendOutput, ImproveBackend};
pub use diff::suggestions_from_diff;
pub use error::{ImproveError, Result};
pub use orchestrator::Orchestrator;
pub use suggestion::{ImprovementResult, Suggestion, SuggestionStatus};

//! # DocAssist Server
//!
//! HTTP API over the extraction and improvement pipeline: accounts with
//! bearer sessions, document upload, saving of reviewed documents, and
//! read-only configuration endpoints.

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use routes::router;
pub use state::AppState;

//! Request and response bodies

use docassist_config::{BackendKind, ModelInfo};
use docassist_improve::{BackendDescriptor, Suggestion};
use serde::{Deserialize, Serialize};

use crate::auth::UserResponse;

pub const DEFAULT_FILENAME: &str = "unnamed_document";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub password: String,
}

/// OAuth2-style password form
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: UserResponse,
}

/// A processed document as exchanged with the editor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentResponse {
    pub original_text: String,
    pub improved_text: String,
    pub suggestions: Vec<Suggestion>,
    #[serde(default = "default_filename")]
    pub filename: String,
}

fn default_filename() -> String {
    DEFAULT_FILENAME.to_string()
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct BackendInfo {
    pub kind: BackendKind,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl From<&BackendDescriptor> for BackendInfo {
    fn from(descriptor: &BackendDescriptor) -> Self {
        Self {
            kind: descriptor.kind,
            model: descriptor.model.clone(),
            endpoint: descriptor.endpoint.clone(),
            timeout_secs: descriptor.timeout.as_secs(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SupportedFeatures {
    pub text_improvement: bool,
    pub suggestions: bool,
    pub ocr: bool,
    pub transcription: bool,
}

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    #[serde(flatten)]
    pub info: ModelInfo,
    pub model_type: &'static str,
    pub supported_features: SupportedFeatures,
    pub backends: Vec<BackendInfo>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: String,
    pub backends: Vec<BackendInfo>,
}

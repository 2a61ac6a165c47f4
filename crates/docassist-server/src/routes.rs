//! HTTP routes under `/api`

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use docassist_extract::effective_content_type;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::auth::{CurrentUser, UserResponse};
use crate::error::{ApiError, ApiResult, ProcessingError};
use crate::state::AppState;
use crate::store::SaveOutcome;
use crate::types::{
    BackendInfo, DocumentResponse, HealthResponse, LoginForm, LoginResponse, MessageResponse,
    ModelInfoResponse, RegisterRequest, SupportedFeatures, DEFAULT_FILENAME,
};

/// Room for multipart framing on top of the file itself
const MULTIPART_OVERHEAD: usize = 1024 * 1024;

pub fn router(state: AppState) -> Router {
    let body_limit = state.config.server.max_file_size + MULTIPART_OVERHEAD;
    let cors = cors_layer(&state.config.server.allowed_origins);

    let api = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/validate-token", post(validate_token))
        .route("/upload", post(upload))
        .route("/save", post(save_document))
        .route("/config/file-types", get(file_types))
        .route("/model-info", get(model_info));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "AI Document Assistant API" }))
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: state.config.api_version.clone(),
        backends: backend_infos(&state),
    })
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .users
        .register(&request.email, request.name, &request.password)?;
    Ok(Json(user))
}

async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<LoginResponse>> {
    let user = state
        .users
        .authenticate(&form.username, &form.password)
        .ok_or(ApiError::InvalidCredentials)?;

    let access_token = state.sessions.create(&user.email);
    info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
        user: UserResponse::from(&user),
    }))
}

async fn validate_token(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

struct UploadedFile {
    filename: String,
    content_type: String,
    bytes: Vec<u8>,
}

async fn read_file_field(multipart: &mut Multipart) -> ApiResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_FILENAME)
            .to_string();
        let declared = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;

        return Ok(UploadedFile {
            content_type: effective_content_type(&declared, &filename),
            filename,
            bytes: bytes.to_vec(),
        });
    }
    Err(ApiError::BadRequest("No file uploaded".to_string()))
}

async fn upload(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> ApiResult<Json<DocumentResponse>> {
    let file = read_file_field(&mut multipart).await?;

    if !state.config.is_supported_type(&file.content_type) {
        return Err(ApiError::BadRequest("Unsupported file type".to_string()));
    }
    if file.bytes.len() > state.config.server.max_file_size {
        return Err(ApiError::BadRequest("File too large".to_string()));
    }

    info!(
        user_id = user.id,
        filename = %file.filename,
        content_type = %file.content_type,
        bytes = file.bytes.len(),
        "Processing upload"
    );

    let extractor = state.extractor.clone();
    let UploadedFile {
        filename,
        content_type,
        bytes,
    } = file;
    let (filename, original_text) = tokio::task::spawn_blocking(move || {
        let text = extractor.extract(&bytes, &content_type, &filename);
        (filename, text)
    })
    .await
    .map_err(|e| ProcessingError::Task(e.to_string()))?;
    let original_text = original_text.map_err(ProcessingError::from)?;

    let result = state
        .orchestrator
        .improve(&original_text, true)
        .await
        .map_err(ProcessingError::from)?;

    let outcome = state
        .documents
        .upsert(user.id, &filename, result.improved_text.clone());
    info!(
        user_id = user.id,
        filename = %filename,
        served_by = result.served_by.as_deref().unwrap_or("none"),
        suggestions = result.suggestions.len(),
        updated = outcome == SaveOutcome::Updated,
        "Document improved"
    );

    Ok(Json(DocumentResponse {
        original_text,
        improved_text: result.improved_text,
        suggestions: result.suggestions,
        filename,
    }))
}

async fn save_document(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(document): Json<DocumentResponse>,
) -> Json<MessageResponse> {
    let outcome = state
        .documents
        .upsert(user.id, &document.filename, document.improved_text);
    info!(user_id = user.id, filename = %document.filename, ?outcome, "Document saved");
    Json(MessageResponse {
        message: "Document saved successfully",
    })
}

async fn file_types(State(state): State<AppState>) -> Json<Vec<docassist_config::FileType>> {
    Json(state.config.supported_file_types.clone())
}

async fn model_info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        info: state.config.model_info.clone(),
        model_type: "multi-model",
        supported_features: SupportedFeatures {
            text_improvement: true,
            suggestions: state.orchestrator.suggestions_enabled(),
            ocr: false,
            transcription: false,
        },
        backends: backend_infos(&state),
    })
}

fn backend_infos(state: &AppState) -> Vec<BackendInfo> {
    state
        .orchestrator
        .descriptors()
        .into_iter()
        .map(BackendInfo::from)
        .collect()
}

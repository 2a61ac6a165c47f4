use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable that points at an explicit config file
pub const CONFIG_PATH_ENV: &str = "DOCASSIST_CONFIG";

/// Default per-backend timeout, used when a backend entry omits one
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Unified configuration for the DocAssist service.
///
/// Every section has defaults, so a partial TOML file only needs to
/// name the values it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocAssistConfig {
    pub app_name: String,
    pub api_version: String,
    pub server: ServerConfig,
    pub ai: AiConfig,
    pub supported_file_types: Vec<FileType>,
    pub model_info: ModelInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upload size ceiling in bytes
    pub max_file_size: usize,
    /// Lifetime of a bearer token issued by /login
    pub session_ttl_minutes: i64,
    /// "*" allows any origin
    pub allowed_origins: Vec<String>,
}

/// Which flavour of improvement backend an entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// Conversational model that answers with structured JSON (Ollama)
    RemoteChat,
    /// Local text2text paraphrase model; suggestions come from diffing
    LocalSeq2seq,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::RemoteChat => write!(f, "remote-chat"),
            BackendKind::LocalSeq2seq => write!(f, "local-seq2seq"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub kind: BackendKind,
    /// Model identifier understood by the endpoint
    pub model: String,
    /// Base URL of the serving process
    pub endpoint: String,
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

fn default_backend_timeout() -> u64 {
    DEFAULT_BACKEND_TIMEOUT_SECS
}

impl BackendConfig {
    pub fn remote_chat(model: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            kind: BackendKind::RemoteChat,
            model: model.into(),
            endpoint: endpoint.into(),
            timeout_secs: DEFAULT_BACKEND_TIMEOUT_SECS,
        }
    }

    pub fn local_seq2seq(model: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            kind: BackendKind::LocalSeq2seq,
            model: model.into(),
            endpoint: endpoint.into(),
            timeout_secs: DEFAULT_BACKEND_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Global switch for suggestion generation
    pub suggestions_enabled: bool,
    /// Fallback chain, tried in order
    pub backends: Vec<BackendConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileType {
    pub mime_type: String,
    pub name: String,
    pub icon: String,
}

impl FileType {
    fn new(mime_type: &str, name: &str, icon: &str) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            name: name.to_string(),
            icon: icon.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl Default for DocAssistConfig {
    fn default() -> Self {
        Self {
            app_name: "AI Document Assistant".to_string(),
            api_version: "1.0.0".to_string(),
            server: ServerConfig::default(),
            ai: AiConfig::default(),
            supported_file_types: default_file_types(),
            model_info: ModelInfo::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_file_size: 10 * 1024 * 1024,
            session_ttl_minutes: 30,
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            suggestions_enabled: true,
            backends: vec![
                BackendConfig::remote_chat("llama3.1:latest", "http://localhost:11434"),
                BackendConfig::remote_chat("llama2:latest", "http://localhost:11434"),
                BackendConfig::local_seq2seq("t5-small", "http://localhost:8080"),
            ],
        }
    }
}

impl Default for ModelInfo {
    fn default() -> Self {
        Self {
            name: "Multi-Model Document Enhancer".to_string(),
            version: "1.0.0".to_string(),
            description: "Supports Llama3.1, Llama2 (Ollama), and T5 (local seq2seq) for text improvement."
                .to_string(),
        }
    }
}

fn default_file_types() -> Vec<FileType> {
    vec![
        FileType::new("application/pdf", "PDF", "📄"),
        FileType::new(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "DOCX",
            "📝",
        ),
        FileType::new("text/plain", "TXT", "📝"),
        FileType::new("text/csv", "CSV", "📊"),
        FileType::new("application/vnd.ms-excel", "XLS", "📊"),
        FileType::new(
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "XLSX",
            "📊",
        ),
        FileType::new("application/sql", "SQL", "🗄️"),
        FileType::new("application/zip", "ZIP", "📦"),
        FileType::new("application/x-zip-compressed", "ZIP", "📦"),
        FileType::new("application/x-rar", "RAR", "📦"),
    ]
}

impl DocAssistConfig {
    /// Default on-disk location: `<config dir>/docassist/docassist.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docassist").join("docassist.toml"))
    }

    /// Resolve the config file location.
    ///
    /// Order: explicit path, then `DOCASSIST_CONFIG`, then the default path.
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }
        Self::default_path()
    }

    /// Load the config file, falling back to defaults when none exists.
    ///
    /// An explicitly named file that does not exist is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let Some(path) = Self::resolve_path(explicit) else {
            debug!("No config directory available, using defaults");
            return Ok(Self::default());
        };

        if !path.exists() && explicit.is_none() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let config = Self::from_file(&path)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse and validate a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.ai.backends.is_empty() {
            return Err(ConfigError::Invalid(
                "ai.backends must name at least one backend".to_string(),
            ));
        }
        for backend in &self.ai.backends {
            if backend.model.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "{} backend has an empty model name",
                    backend.kind
                )));
            }
            if !backend.endpoint.starts_with("http://") && !backend.endpoint.starts_with("https://")
            {
                return Err(ConfigError::Invalid(format!(
                    "backend {} endpoint must be an http(s) URL, got {:?}",
                    backend.model, backend.endpoint
                )));
            }
            if backend.timeout_secs == 0 {
                return Err(ConfigError::Invalid(format!(
                    "backend {} timeout must be positive",
                    backend.model
                )));
            }
        }
        if self.server.max_file_size == 0 {
            return Err(ConfigError::Invalid(
                "server.max_file_size must be positive".to_string(),
            ));
        }
        if self.server.session_ttl_minutes <= 0 {
            return Err(ConfigError::Invalid(
                "server.session_ttl_minutes must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether `mime_type` is one of the advertised upload types
    pub fn is_supported_type(&self, mime_type: &str) -> bool {
        self.supported_file_types
            .iter()
            .any(|ft| ft.mime_type.eq_ignore_ascii_case(mime_type))
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DocAssistConfig::default();
        assert_eq!(config.server.max_file_size, 10 * 1024 * 1024);
        assert_eq!(config.ai.backends.len(), 3);
        assert_eq!(config.ai.backends[0].kind, BackendKind::RemoteChat);
        assert_eq!(config.ai.backends[2].kind, BackendKind::LocalSeq2seq);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_supported_type_lookup() {
        let config = DocAssistConfig::default();
        assert!(config.is_supported_type("text/plain"));
        assert!(config.is_supported_type("APPLICATION/PDF"));
        assert!(!config.is_supported_type("image/png"));
        assert!(config.is_supported_type("application/zip"));
        assert!(config.is_supported_type("application/x-zip-compressed"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml = r#"
            [server]
            port = 9100

            [ai]
            suggestions_enabled = false

            [[ai.backends]]
            kind = "local-seq2seq"
            model = "t5-base"
            endpoint = "http://127.0.0.1:8080"
        "#;
        let config: DocAssistConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.session_ttl_minutes, 30);
        assert!(!config.ai.suggestions_enabled);
        assert_eq!(config.ai.backends.len(), 1);
        assert_eq!(config.ai.backends[0].timeout_secs, DEFAULT_BACKEND_TIMEOUT_SECS);
        assert_eq!(config.supported_file_types.len(), 10);
    }

    #[test]
    fn test_validate_rejects_empty_chain() {
        let mut config = DocAssistConfig::default();
        config.ai.backends.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let mut config = DocAssistConfig::default();
        config.ai.backends = vec![BackendConfig::remote_chat("llama3.1", "localhost:11434")];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("docassist.toml");

        let mut config = DocAssistConfig::default();
        config.server.port = 9200;
        config.ai.backends = vec![
            BackendConfig::local_seq2seq("t5-small", "http://localhost:8080").with_timeout(5)
        ];
        config.save(&path).unwrap();

        let loaded = DocAssistConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded.server.port, 9200);
        assert_eq!(loaded.ai.backends, config.ai.backends);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(matches!(
            DocAssistConfig::load(Some(&path)),
            Err(ConfigError::Io { .. })
        ));
    }
}

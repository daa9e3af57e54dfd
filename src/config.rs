use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::time::Duration;

use crate::error::{LogoError, Result};

pub const HUGGING_FACE_ROUTER: &str = "https://router.huggingface.co/hf-inference/models";
pub const HUGGING_FACE_CREDENTIAL: &str = "huggingface";
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const FIRESTORE_API_BASE: &str = "https://firestore.googleapis.com/v1";

/// How the refined prompt travels in a backend request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFormat {
    /// The prompt text itself is the body.
    #[default]
    Raw,
    /// `{"inputs": "<prompt>"}`
    Inputs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub name: String,
    pub endpoint: String,
    pub timeout_ms: u64,
    #[serde(default)]
    pub body: BodyFormat,
    /// Key into [`Config::credentials`] holding the bearer token.
    #[serde(default)]
    pub credential: Option<String>,
}

impl BackendConfig {
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>, timeout_ms: u64) -> Self {
        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            timeout_ms,
            body: BodyFormat::Raw,
            credential: None,
        }
    }

    pub fn huggingface(model: &str, body: BodyFormat, timeout_ms: u64) -> Self {
        Self {
            name: model.to_string(),
            endpoint: format!("{}/{}", HUGGING_FACE_ROUTER, model),
            timeout_ms,
            body,
            credential: Some(HUGGING_FACE_CREDENTIAL.to_string()),
        }
    }

    pub fn with_body(mut self, body: BodyFormat) -> Self {
        self.body = body;
        self
    }

    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

pub fn default_backends() -> Vec<BackendConfig> {
    vec![
        BackendConfig::huggingface("black-forest-labs/FLUX.1-dev", BodyFormat::Raw, 1_000_000),
        BackendConfig::huggingface(
            "stabilityai/stable-diffusion-xl-base-1.0",
            BodyFormat::Inputs,
            60_000,
        ),
    ]
}

/// Parses the `IMAGE_BACKENDS` JSON array.
pub fn parse_backends(raw: &str) -> Result<Vec<BackendConfig>> {
    let backends: Vec<BackendConfig> = serde_json::from_str(raw)
        .map_err(|e| LogoError::ConfigError(format!("IMAGE_BACKENDS is not valid: {}", e)))?;
    if let Some(bad) = backends.iter().find(|b| b.timeout_ms == 0) {
        return Err(LogoError::ConfigError(format!(
            "backend '{}' has a zero timeout",
            bad.name
        )));
    }
    Ok(backends)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefinerProvider {
    Gemini,
    Bedrock,
}

impl RefinerProvider {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(RefinerProvider::Gemini),
            "bedrock" => Ok(RefinerProvider::Bedrock),
            other => Err(LogoError::ConfigError(format!(
                "unknown REFINER_PROVIDER '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: "gemini-2.0-flash".to_string(),
            base_url: GEMINI_API_BASE.to_string(),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub model_id: String,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        BedrockConfig {
            region: None,
            access_key: None,
            secret_key: None,
            model_id: "anthropic.claude-3-haiku-20240307-v1:0".to_string(),
        }
    }
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Firestore,
}

#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    pub project_id: Option<String>,
    pub api_key: Option<String>,
    pub auth_token: Option<String>,
    pub base_url: String,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        FirestoreConfig {
            project_id: None,
            api_key: None,
            auth_token: None,
            base_url: FIRESTORE_API_BASE.to_string(),
        }
    }
}

impl FirestoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: Option<u16>,
    pub backends: Vec<BackendConfig>,
    pub credentials: HashMap<String, String>,
    pub refiner: RefinerProvider,
    pub gemini: GeminiConfig,
    pub bedrock: BedrockConfig,
    pub store: StoreKind,
    pub firestore: FirestoreConfig,
    pub log_level: Option<String>,
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: None,
            backends: default_backends(),
            credentials: HashMap::new(),
            refiner: RefinerProvider::Gemini,
            gemini: GeminiConfig::default(),
            bedrock: BedrockConfig::default(),
            store: StoreKind::Memory,
            firestore: FirestoreConfig::default(),
            log_level: None,
            log_json: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source; `from_env` passes
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        config.port = match lookup("PORT") {
            Some(port) => Some(
                port.parse()
                    .map_err(|_| LogoError::ConfigError(format!("PORT '{}' is not a port", port)))?,
            ),
            None => None,
        };

        if let Some(raw) = lookup("IMAGE_BACKENDS") {
            config.backends = parse_backends(&raw)?;
        }
        if let Some(key) = lookup("HUGGING_FACE_API_KEY") {
            config
                .credentials
                .insert(HUGGING_FACE_CREDENTIAL.to_string(), key);
        }

        if let Some(provider) = lookup("REFINER_PROVIDER") {
            config.refiner = RefinerProvider::parse(&provider)?;
        }
        config.gemini.api_key = lookup("GEMINI_API_KEY");
        if let Some(model) = lookup("GEMINI_MODEL") {
            config.gemini.model = model;
        }

        config.bedrock.region = lookup("AWS_REGION").or_else(|| lookup("AWS_DEFAULT_REGION"));
        config.bedrock.access_key = lookup("AWS_ACCESS_KEY_ID");
        config.bedrock.secret_key = lookup("AWS_SECRET_ACCESS_KEY");
        if let Some(model_id) = lookup("BEDROCK_MODEL_ID") {
            config.bedrock.model_id = model_id;
        }

        config.store = match lookup("LOGO_STORE").as_deref().map(str::trim) {
            None | Some("") | Some("memory") => StoreKind::Memory,
            Some("firestore") => StoreKind::Firestore,
            Some(other) => {
                return Err(LogoError::ConfigError(format!(
                    "unknown LOGO_STORE '{}'",
                    other
                )))
            }
        };
        config.firestore.project_id = lookup("FIRESTORE_PROJECT_ID");
        config.firestore.api_key = lookup("FIRESTORE_API_KEY");
        config.firestore.auth_token = lookup("FIRESTORE_AUTH_TOKEN");

        config.log_level = lookup("LOG_LEVEL");
        config.log_json = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("text") => false,
            Some("json") => true,
            Some(other) => {
                return Err(LogoError::ConfigError(format!(
                    "unknown LOG_FORMAT '{}'",
                    other
                )))
            }
        };

        Ok(config)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_backends(mut self, backends: Vec<BackendConfig>) -> Self {
        self.backends = backends;
        self
    }

    pub fn with_credential(mut self, name: impl Into<String>, token: impl Into<String>) -> Self {
        self.credentials.insert(name.into(), token.into());
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self.refiner = RefinerProvider::Gemini;
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = config;
        self.refiner = RefinerProvider::Bedrock;
        self
    }

    pub fn with_firestore(mut self, config: FirestoreConfig) -> Self {
        self.firestore = config;
        self.store = StoreKind::Firestore;
        self
    }

    pub fn credential(&self, name: &str) -> Option<&str> {
        self.credentials.get(name).map(String::as_str)
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(8080)
    }
}

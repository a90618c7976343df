pub mod deploy;
pub mod diagram;
pub mod explorer;
pub mod input;
pub mod session;
mod settings;

use serde::{Deserialize, Serialize};

pub use deploy::DeploymentRecord;
pub use input::{FileInput, InputError, InputMode, InputPanel, Preview, UserInput};
pub use session::{Session, SessionSnapshot};
pub use settings::{
    read_settings, read_settings_from, settings_path, write_settings, write_settings_to, Settings,
    SettingsError,
};

// --- Types (wire names match the generation response schema) ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiEndpoint {
    pub path: String,
    pub method: String,
    pub summary: String,
}

/// The five generated artifacts for one data source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactBundle {
    /// SQL `CREATE TABLE` statements.
    pub database_schema: String,
    /// OpenAPI 3.0.x document in YAML.
    pub rest_api: String,
    /// Markdown narrative explaining the schema.
    pub schema_reasoning: String,
    /// Mermaid `erDiagram` source.
    pub erd_diagram: String,
    pub api_endpoints: Vec<ApiEndpoint>,
}

/// Shape of the model's JSON answer before validation. Every key is optional
/// here so a missing one surfaces as `InvalidResponse` rather than a serde
/// message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBundle {
    database_schema: Option<String>,
    rest_api: Option<String>,
    schema_reasoning: Option<String>,
    erd_diagram: Option<String>,
    api_endpoints: Option<Vec<ApiEndpoint>>,
}

impl ArtifactBundle {
    /// Parse the model's answer text into a validated bundle.
    ///
    /// The text must be a single JSON object carrying all five keys. Empty
    /// strings count as missing. Literal `\n` sequences in the text fields are
    /// turned into real line breaks.
    pub fn from_response_text(text: &str) -> Result<Self, GenerateError> {
        let value: serde_json::Value = serde_json::from_str(text.trim())
            .map_err(|e| GenerateError::invalid(format!("not valid JSON: {e}")))?;
        if !value.is_object() {
            return Err(GenerateError::invalid("not a JSON object"));
        }
        let raw = RawBundle::deserialize(value)
            .map_err(|e| GenerateError::invalid(format!("malformed bundle: {e}")))?;

        let api_endpoints = raw
            .api_endpoints
            .ok_or_else(|| GenerateError::invalid("missing required key `apiEndpoints`"))?;

        Ok(Self {
            database_schema: required(raw.database_schema, "databaseSchema")?,
            rest_api: required(raw.rest_api, "restApi")?,
            schema_reasoning: required(raw.schema_reasoning, "schemaReasoning")?,
            erd_diagram: required(raw.erd_diagram, "erdDiagram")?,
            api_endpoints,
        })
    }
}

fn required(value: Option<String>, key: &str) -> Result<String, GenerateError> {
    match value {
        Some(v) if !v.is_empty() => Ok(normalize_escapes(&v)),
        _ => Err(GenerateError::invalid(format!("missing required key `{key}`"))),
    }
}

/// Replace literal two-character `\n` sequences with newlines. The service
/// sometimes double-encodes line breaks inside JSON strings.
pub fn normalize_escapes(s: &str) -> String {
    s.replace("\\n", "\n")
}

// --- Errors ---

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// No credential for the generation service.
    #[error("API key not configured: {0}")]
    Configuration(String),

    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    /// Unparsable or incomplete answer. `reason` is kept for logs only.
    #[error("The AI returned an invalid or unparsable response. Please try again.")]
    InvalidResponse { reason: String },

    #[error("{0}")]
    Transport(String),
}

impl GenerateError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            reason: reason.into(),
        }
    }
}

// --- Generator seam ---

/// One-shot generation of an artifact bundle from a data source.
///
/// The production implementation lives in `blueprint-generate`; tests swap in
/// fakes.
#[async_trait::async_trait]
pub trait ArtifactGenerator: Send + Sync {
    async fn generate(&self, input: &UserInput) -> Result<ArtifactBundle, GenerateError>;
}

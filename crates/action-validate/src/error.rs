use std::sync::Arc;

use action_validate_schema::{CompileError, ValidationError};

/// The schema registry could not supply a schema for an action type.
///
/// Cloneable so that one failed download can be reported to every caller
/// that was waiting on it.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaFetchError {
    /// Transport failure or non-2xx response, as reported by the HTTP client.
    #[error(transparent)]
    Http(Arc<reqwest::Error>),

    /// The registry base URL cannot be joined with a schema path.
    #[error("invalid schema registry url {url}: {message}")]
    InvalidUrl { url: String, message: String },

    /// The schema body exceeded the configured size limit.
    #[error("schema for action.type={action_type} exceeds {limit} bytes")]
    TooLarge { action_type: String, limit: usize },

    /// The schema body is not JSON.
    #[error("schema for action.type={action_type} is not valid JSON: {source}")]
    InvalidJson {
        action_type: String,
        #[source]
        source: Arc<serde_json::Error>,
    },
}

impl SchemaFetchError {
    /// HTTP status returned by the registry, if a response was received.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Http(err) => err.status(),
            _ => None,
        }
    }

    /// True when the registry answered 404 for the requested type.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(reqwest::StatusCode::NOT_FOUND)
    }
}

impl From<reqwest::Error> for SchemaFetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(Arc::new(err))
    }
}

/// Errors returned when validating an action.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ValidateError {
    /// No schema could be fetched for the action type.
    #[error(transparent)]
    SchemaFetch(#[from] SchemaFetchError),

    /// The fetched document is not a usable schema.
    #[error(transparent)]
    SchemaCompile(#[from] CompileError),

    /// The payload does not satisfy the schema.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl ValidateError {
    pub fn is_schema_fetch(&self) -> bool {
        matches!(self, Self::SchemaFetch(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// The validation failure, if this error is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ValidateError>;

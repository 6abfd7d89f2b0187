//! Error types for the Telnyx SDK core.
//!
//! # Design
//! Model errors and service errors are kept apart. `ModelError` is produced by
//! the conversion engine and never depends on HTTP; `ApiError` wraps it at the
//! service boundary next to transport failures and unexpected statuses.
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status."

use thiserror::Error;

use crate::resources::shared::ErrorDetail;

/// Errors raised while constructing, decoding or resolving a model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A required field was absent at construction or decode time.
    #[error("{model}: missing required field `{field}`")]
    MissingRequiredField {
        model: &'static str,
        field: &'static str,
    },

    /// A raw value did not have the shape its declared kind asks for.
    #[error("type mismatch at `{path}`: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: &'static str,
    },

    /// A discriminator-keyed union saw a tag with no registered variant.
    #[error("{union}: unknown `{field}` discriminator `{value}`")]
    UnknownDiscriminator {
        union: &'static str,
        field: &'static str,
        value: String,
    },
}

impl ModelError {
    pub fn mismatch(path: &str, expected: impl Into<String>, found: &serde_json::Value) -> Self {
        ModelError::TypeMismatch {
            path: path.to_string(),
            expected: expected.into(),
            found: json_type_name(found),
        }
    }

    /// Name of the field this error points at, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ModelError::MissingRequiredField { field, .. } => Some(field),
            ModelError::UnknownDiscriminator { field, .. } => Some(field),
            ModelError::TypeMismatch { .. } => None,
        }
    }
}

/// Short JSON type name used in mismatch messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Opaque failure reported by a `Transport`.
#[derive(Debug, Error)]
#[error("transport failure: {source}")]
pub struct TransportError {
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    pub fn new(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Errors returned by service operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404, the requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a status other than the one the operation expects.
    #[error("HTTP {status}: {body}")]
    Status {
        status: u16,
        errors: Vec<ErrorDetail>,
        body: String,
    },

    /// The response body was not JSON.
    #[error("response body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The JSON did not match the expected model.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The transport could not complete the round-trip.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The base URL or an expanded path could not form a valid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}

impl ApiError {
    /// Returns the HTTP status code if the server answered with one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

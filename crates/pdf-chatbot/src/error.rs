//! Error types for the chatbot
//!
//! Each pipeline stage has its own error enum so callers handle every failure
//! kind explicitly. The crate-level [`Error`] wraps them and renders the JSON
//! body the chatbot page expects: `{"error": "<message>"}`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::types::FileType;

/// Result type alias for chatbot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Text extraction failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// No file was attached to the request
    #[error("No se proporcionó ningún archivo.")]
    MissingFile,

    /// Extension is not a PDF or spreadsheet; carries the resolved extension
    #[error("Tipo de archivo no soportado.")]
    UnsupportedType(String),

    /// The document yielded no text
    #[error("No se pudo extraer texto del PDF.")]
    EmptyContent,

    /// The parsing library rejected the document
    #[error("No se pudo leer el archivo ({file_type}): {message}")]
    Parse { file_type: FileType, message: String },
}

impl ExtractionError {
    /// Create a parse error
    pub fn parse(file_type: FileType, message: impl Into<String>) -> Self {
        Self::Parse {
            file_type,
            message: message.into(),
        }
    }
}

/// LLM completion failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompletionError {
    /// Provider answered with a non-200 status
    #[error("Error {status}: {body}")]
    ProviderError { status: u16, body: String },

    /// The call did not finish within the configured timeout
    #[error("Tiempo de espera agotado al consultar el modelo.")]
    Timeout,

    /// 200 response without `choices[0].message.content`
    #[error("Respuesta inválida del modelo: {0}")]
    InvalidResponse(String),

    /// Request never reached the provider
    #[error("No se pudo contactar al modelo: {0}")]
    Transport(String),
}

/// Identity provider failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Provider refused the credentials or the sign-up
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Provider answered with a body we could not read
    #[error("Respuesta inválida del proveedor de identidad: {0}")]
    InvalidResponse(String),

    /// Request never reached the provider
    #[error("No se pudo contactar al proveedor de identidad: {0}")]
    Transport(String),
}

/// Chatbot errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Text extraction error
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// LLM completion error
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// Identity provider error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Chatbot form without a file or a question
    #[error("Archivo o consulta faltante.")]
    MissingInput,

    /// Malformed multipart request
    #[error("Formulario inválido: {0}")]
    Multipart(String),

    /// Page rendering error
    #[error("Template error: {0}")]
    Template(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Extraction(_)
            | Error::Completion(_)
            | Error::MissingInput
            | Error::Multipart(_) => StatusCode::BAD_REQUEST,
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::Config(_) | Error::Template(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<minijinja::Error> for Error {
    fn from(err: minijinja::Error) -> Self {
        Error::Template(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            Error::Extraction(ExtractionError::UnsupportedType(ext)) => {
                tracing::info!(extension = %ext, "Rejected unsupported file type");
            }
            Error::Extraction(err) => tracing::info!("Extraction failed: {}", err),
            Error::Completion(err) => tracing::warn!("Completion failed: {}", err),
            Error::MissingInput => tracing::info!("Chatbot request without file or query"),
            Error::Multipart(msg) => tracing::info!("Bad multipart request: {}", msg),
            Error::Auth(err) => tracing::warn!("Identity provider error: {}", err),
            Error::Config(_) | Error::Template(_) | Error::Internal(_) => {
                tracing::error!("{}", self)
            }
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Invalid request data (missing fields, undecodable payload)
    #[error("{message}")]
    BadRequest { message: String },

    /// Request payload exceeds the configured size limit
    #[error("{message}")]
    PayloadTooLarge { message: String },

    /// Provider API key was not configured at startup
    #[error("Missing provider API key")]
    MissingCredential,

    /// The file upload endpoint returned a non-success status
    #[error("Upload failed: {body}")]
    UploadFailed { status: StatusCode, body: String },

    /// The generation endpoint returned a non-success status
    #[error("{body}")]
    GenerationFailed { status: StatusCode, body: String },

    /// Upload succeeded but the response carried no file reference.
    /// A protocol violation by the provider, not a transient condition.
    #[error("File upload failed, no URI returned")]
    MissingFileUri,

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::MissingCredential => StatusCode::INTERNAL_SERVER_ERROR,
            // Mirror whatever the upstream service said
            Error::UploadFailed { status, .. } => *status,
            Error::GenerationFailed { status, .. } => *status,
            Error::MissingFileUri => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the message serialized into the `{error}` response body.
    pub fn user_message(&self) -> String {
        match self {
            Error::Other(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details - different log levels based on severity
        match &self {
            Error::MissingCredential | Error::MissingFileUri | Error::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::UploadFailed { status, .. } | Error::GenerationFailed { status, .. } => {
                tracing::warn!(status = %status, "Upstream error: {}", self);
            }
            Error::BadRequest { .. } | Error::PayloadTooLarge { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        let body = json!({ "error": self.user_message() });
        (status, axum::response::Json(body)).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

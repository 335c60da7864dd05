//! Error types for Kudos

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found. Run 'kudos init' first.")]
    ConfigNotFound,

    #[error("SESSION_SECRET must be set")]
    MissingSessionSecret,

    #[error("User already exists with that email")]
    DuplicateUser,

    #[error("Something went wrong trying to create a new user.")]
    UserCreation { email: String },

    #[error("Incorrect login")]
    InvalidCredentials,

    #[error("Invalid session cookie")]
    InvalidSession,

    #[error("Password hash error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Storage unavailable: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<tokio_postgres::Error> for Error {
    fn from(err: tokio_postgres::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// JSON body returned for failed requests
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<ErrorFields>,
}

/// Submitted fields echoed back on a failed registration.
/// Deliberately excludes the password.
#[derive(Debug, Serialize)]
pub struct ErrorFields {
    pub email: String,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::DuplicateUser | Error::UserCreation { .. } | Error::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            Error::InvalidSession => StatusCode::UNAUTHORIZED,
            Error::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        let fields = match self {
            Error::UserCreation { email } => Some(ErrorFields {
                email: email.clone(),
            }),
            _ => None,
        };
        let error = match self {
            // Storage and internal failures get a generic message; the
            // underlying cause is logged, not sent to the client.
            Error::Storage(_) => "Service temporarily unavailable".to_string(),
            Error::PasswordHash(_) | Error::Io(_) | Error::Json(_) | Error::Other(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        ErrorBody { error, fields }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        (status, Json(self.body())).into_response()
    }
}

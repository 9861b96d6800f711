use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Clone, Debug, Serialize, strum_macros::AsRefStr)]
#[serde(tag = "type", content = "data")]
pub enum Error {
    LoginFail,

    // -- Auth errors.
    AuthFailNoAuthToken,
    AuthFailTokenWrongFormat,
    AuthFailCtxNotInRequestExt,
    InvalidToken,
    TokenCreationError,
    Forbidden { reason: String },
    RateLimited,

    // -- Validation errors.
    Validation { messages: Vec<String> },
    InvalidInput { reason: String },
    UserAlreadyExists { field: String },

    // -- Not found.
    UserNotFound { id: String },
    SongNotFound { id: String },
    ArtistRequestNotFound { id: String },
    PlaylistNotFound { id: String },
    AlbumNotFound { id: String },

    // -- Artist request lifecycle.
    PendingArtistRequestExists,
    EmailMismatch,
    ArtistRequestNotEditable { status: String },
    InvalidStatusTransition { from: String, to: String },

    // -- Upload gate.
    UploadFailed(String),

    // -- Internal.
    DbError(String),
    EnvVarError(String),
    PasswordHashError(String),
    IoError(String),
}

impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::result::Result<(), core::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, client_error) = self.client_status_and_error();

        if status_code.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let response_body = serde_json::json!({
            "success": false,
            "message": self.client_message(),
            "error": client_error.as_ref(),
        });

        (status_code, Json(response_body)).into_response()
    }
}

impl Error {
    pub fn client_status_and_error(&self) -> (StatusCode, ClientError) {
        match self {
            Self::LoginFail => (StatusCode::UNAUTHORIZED, ClientError::LOGIN_FAIL),

            Self::AuthFailNoAuthToken
            | Self::AuthFailTokenWrongFormat
            | Self::AuthFailCtxNotInRequestExt
            | Self::InvalidToken => (StatusCode::UNAUTHORIZED, ClientError::NO_AUTH),

            Self::Forbidden { .. } => (StatusCode::FORBIDDEN, ClientError::FORBIDDEN),

            Self::RateLimited => (StatusCode::TOO_MANY_REQUESTS, ClientError::RATE_LIMITED),

            Self::Validation { .. }
            | Self::InvalidInput { .. }
            | Self::UserAlreadyExists { .. }
            | Self::PendingArtistRequestExists
            | Self::EmailMismatch
            | Self::ArtistRequestNotEditable { .. }
            | Self::InvalidStatusTransition { .. } => {
                (StatusCode::BAD_REQUEST, ClientError::INVALID_PARAMS)
            }

            Self::UploadFailed(_) => (StatusCode::BAD_REQUEST, ClientError::UPLOAD_FAILED),

            Self::UserNotFound { .. }
            | Self::SongNotFound { .. }
            | Self::ArtistRequestNotFound { .. }
            | Self::PlaylistNotFound { .. }
            | Self::AlbumNotFound { .. } => {
                (StatusCode::NOT_FOUND, ClientError::RESOURCE_NOT_FOUND)
            }

            Self::TokenCreationError
            | Self::DbError(_)
            | Self::EnvVarError(_)
            | Self::PasswordHashError(_)
            | Self::IoError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ClientError::SERVICE_ERROR,
            ),
        }
    }

    /// Message rendered in the response envelope. Internal failures stay generic.
    pub fn client_message(&self) -> String {
        match self {
            Self::LoginFail => "Invalid credentials".to_string(),
            Self::AuthFailNoAuthToken => "Authentication required".to_string(),
            Self::AuthFailTokenWrongFormat | Self::InvalidToken => {
                "Invalid or expired token".to_string()
            }
            Self::AuthFailCtxNotInRequestExt => "Authentication required".to_string(),
            Self::Forbidden { reason } => reason.clone(),
            Self::RateLimited => "Too many requests, slow down".to_string(),
            Self::Validation { messages } => messages.join(", "),
            Self::InvalidInput { reason } => reason.clone(),
            Self::UserAlreadyExists { field } => format!("A user with this {field} already exists"),
            Self::UserNotFound { .. } => "User not found".to_string(),
            Self::SongNotFound { .. } => "Song not found".to_string(),
            Self::ArtistRequestNotFound { .. } => "Artist request not found".to_string(),
            Self::PlaylistNotFound { .. } => "Playlist not found".to_string(),
            Self::AlbumNotFound { .. } => "Album not found".to_string(),
            Self::PendingArtistRequestExists => {
                "You already have a pending artist request".to_string()
            }
            Self::EmailMismatch => "Email must match your account email".to_string(),
            Self::ArtistRequestNotEditable { status } => {
                format!("An artist request with status '{status}' cannot be edited")
            }
            Self::InvalidStatusTransition { from, to } => {
                format!("Cannot change artist request status from '{from}' to '{to}'")
            }
            Self::UploadFailed(reason) => format!("File upload failed: {reason}"),
            Self::TokenCreationError
            | Self::DbError(_)
            | Self::EnvVarError(_)
            | Self::PasswordHashError(_)
            | Self::IoError(_) => "Internal server error".to_string(),
        }
    }
}

#[derive(Debug, strum_macros::AsRefStr)]
#[allow(non_camel_case_types)]
pub enum ClientError {
    LOGIN_FAIL,
    NO_AUTH,
    FORBIDDEN,
    RATE_LIMITED,
    INVALID_PARAMS,
    UPLOAD_FAILED,
    SERVICE_ERROR,
    RESOURCE_NOT_FOUND,
}

impl From<surrealdb::Error> for Error {
    fn from(err: surrealdb::Error) -> Self {
        Error::DbError(err.to_string())
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::EnvVarError(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(_: jsonwebtoken::errors::Error) -> Self {
        Error::InvalidToken
    }
}

impl From<bcrypt::BcryptError> for Error {
    fn from(err: bcrypt::BcryptError) -> Self {
        Error::PasswordHashError(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for Error {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        Error::InvalidInput {
            reason: format!("Malformed multipart body: {}", err.body_text()),
        }
    }
}

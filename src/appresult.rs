use axum::{http::StatusCode, response::{IntoResponse, Response}};
use thiserror::Error;
use tracing::error;

pub type ChatResult<T> = Result<T, ChatError>;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("username '{0}' is already taken")]
    UsernameTaken(String),

    #[error("invalid username or password")]
    BadCredentials,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("stored value under '{key}' is not valid json")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    #[error("password hashing error: {0}")]
    Password(String),
}

impl ChatError {
    fn status(&self) -> StatusCode {
        use ChatError::*;
        match self {
            UsernameTaken(_) => StatusCode::CONFLICT,
            BadCredentials => StatusCode::UNAUTHORIZED,
            NotFound(_) => StatusCode::NOT_FOUND,
            Invalid(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.0
            .downcast_ref::<ChatError>()
            .map(ChatError::status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(error = ?self.0, "request failed");
            return (
                status,
                format!("{}\n\n{}", self.0, self.0.backtrace()),
            )
                .into_response();
        }

        (status, self.0.to_string()).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// 401. The session has already been cleared when this reaches the caller.
    #[error("unauthorized")]
    Unauthorized(Option<String>),
    #[error("forbidden")]
    Forbidden(Option<String>),
    #[error("not found")]
    NotFound(Option<String>),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid response: {0}")]
    Decode(reqwest::Error),
    #[error("invalid base_url: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    pub(crate) fn from_status(status: StatusCode, message: Option<String>) -> Self {
        match status.as_u16() {
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message.unwrap_or_else(|| "conflict".to_string())),
            400 | 422 => Self::Validation(message.unwrap_or_else(|| "invalid request".to_string())),
            _ => Self::Server {
                status,
                message: message.unwrap_or_else(|| "unknown error".to_string()),
            },
        }
    }

    /// Message sent by the service in the error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Unauthorized(message) | Self::Forbidden(message) | Self::NotFound(message) => {
                message.as_deref()
            }
            Self::Conflict(message) | Self::Validation(message) => Some(message),
            Self::Server { message, .. } => Some(message),
            Self::Transport(_) | Self::Decode(_) | Self::InvalidUrl(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

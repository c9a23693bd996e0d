use client::ClientError;
use engine::DraftError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("client error: {0}")]
    Client(#[from] ClientError),
    #[error("Validation error: {0}")]
    Draft(#[from] DraftError),
    /// A request failed; `message` is what the user sees.
    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: ClientError,
    },
    #[error("Please log in first")]
    NotLoggedIn,
}

impl AppError {
    /// Wraps a client error with the message shown to the user.
    pub fn failed(message: impl Into<String>) -> impl FnOnce(ClientError) -> AppError {
        let message = message.into();
        move |source| AppError::Failed { message, source }
    }

    /// Extra line for the notification, if there is anything to add.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Failed { message, source } => {
                let detail = source
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| source.to_string());
                (!message.contains(&detail)).then_some(detail)
            }
            _ => None,
        }
    }
}

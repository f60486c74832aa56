use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),

    #[error("Malformed game {id}: {reason}")]
    MalformedGame { id: String, reason: String },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

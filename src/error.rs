use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("not found")]
    NotFound,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("validation failed: {0}")]
    Validation(String),

    /// Returned by `Notifier` implementations that fail to deliver an alert.
    #[error("notification failed: {0}")]
    Notify(String),
}

pub type Result<T> = std::result::Result<T, Error>;

//! Error types for the Discord reader

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    #[error("Failed to fetch messages for channel {channel}: {message}")]
    Fetch { channel: String, message: String },

    #[error("Discord API error: {0}")]
    Api(String),

    #[error("Invalid input file: {0}")]
    InvalidInput(String),

    #[error("Fetch is already running in another process")]
    FetchLocked,

    #[error("Failed to acquire fetch lock: {0}")]
    LockError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Wrap a cause as a channel-scoped fetch failure.
    pub fn fetch(channel: impl Into<String>, message: impl ToString) -> Self {
        Error::Fetch {
            channel: channel.into(),
            message: message.to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(err.to_string())
    }
}

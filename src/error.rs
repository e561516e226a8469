//! Error taxonomy for spotstatus.
//!
//! The core knows three failure kinds:
//!
//! * [`Error::Transport`] - an HTTP call never produced a response
//! * [`Error::Auth`] - minting or refreshing a token failed, or the API
//!   rejected a freshly refreshed token
//! * [`Error::Decode`] - a response body was malformed or incomplete
//!
//! The config stores add [`Error::Config`] for missing settings and
//! [`Error::Storage`] for failures of the backing file or cloud object.
//! All of them abort an invocation before the config is persisted.

use thiserror::Error;

/// Standard result type for spotstatus operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Network or connection failure on an HTTP call.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Minting or refreshing a token failed, or a refreshed token was rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A response body was malformed or incomplete.
    #[error("cannot decode response: {0}")]
    Decode(String),

    /// A required setting is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The backing file or cloud object could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),
}

impl Error {
    pub fn auth(msg: impl Into<String>) -> Self {
        Error::Auth(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Error::Decode(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Error::Storage(msg.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Storage(format!("invalid config: {err}"))
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Storage(format!("cannot serialize config: {err}"))
    }
}

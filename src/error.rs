// src/error.rs
use thiserror::Error;

/// Boxed failure coming out of a transport implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Network, HTTP status or body decoding failure while loading `url`.
    #[error("Cannot load page: {url}")]
    Transport {
        url: String,
        #[source]
        source: BoxError,
    },

    /// An operation that needs a session was called while logged out.
    #[error("Login is needed.")]
    AuthRequired,

    #[error("Login failed: {0}")]
    LoginFailed(String),

    /// A page loaded fine but did not have the shape we read.
    #[error("Cannot parse page: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Local I/O (writing output, log files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn transport(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::Transport { url: url.into(), source: source.into() }
    }

    pub(crate) fn parse(msg: impl Into<String>) -> Self {
        Error::Parse(msg.into())
    }
}

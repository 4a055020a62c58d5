use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong during a run, bucketed by which step failed.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file is missing, unreadable, or malformed.
    #[error("config error: {0}")]
    Config(String),

    /// The public IP address could not be determined.
    #[error("network error: {0}")]
    Network(String),

    /// Hetzner DNS rejected a lookup or an update.
    #[error("API error: {0}")]
    Api(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }
}

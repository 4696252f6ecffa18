use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("tool error: {0}")]
    Tool(String),

    #[error("Bitbucket returned HTTP {status}")]
    Upstream { status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Processing(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Error::Upstream {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            Error::Processing(err.to_string())
        } else {
            // Timeouts, refused connections, DNS failures — anything that
            // failed before a status line arrived.
            Error::Transport(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

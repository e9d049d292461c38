#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid graph: {message}")]
    InvalidGraph { message: String },

    #[error("invalid layout configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl Error {
    pub(crate) fn graph(message: impl Into<String>) -> Self {
        Self::InvalidGraph {
            message: message.into(),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

use derive_more::{Display, Error, From};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, From)]
pub enum Error {
    #[display("I/O error: {_0}")]
    Io(std::io::Error),

    #[display("HTTP error: {_0}")]
    Http(reqwest::Error),

    #[display("JSON error: {_0}")]
    Json(serde_json::Error),

    #[display("Archive error: {_0}")]
    Zip(zip::result::ZipError),

    /// Failure reported by the presentation backend itself.
    #[display("Backend error: {message}")]
    #[from(ignore)]
    Backend {
        #[error(not(source))]
        message: String,
    },

    #[display("{message}")]
    #[from(ignore)]
    Custom {
        #[error(not(source))]
        message: String,
    },
}

impl Error {
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

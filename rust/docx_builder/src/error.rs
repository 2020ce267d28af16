//! Error type for the fallible edges of the builder.
//!
//! The conversion core never fails; only configuration, outline parsing and
//! package writing return [`Error`].

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration file could not be read or understood.
    #[error("config error: {message}")]
    Config { message: String },

    /// Outline JSON was missing or malformed.
    #[error("outline error: {message}")]
    Outline { message: String },

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Writing the .docx container failed.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("empty input")]
    EmptyInput,
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn outline(msg: impl Into<String>) -> Self {
        Self::Outline {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

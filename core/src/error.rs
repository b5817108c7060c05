//! Error type for resource and configuration loading.
//!
//! Text-processing entry points never fail; only loading external data does.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("failed to write '{path}': {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid TOML in '{path}': {source}")]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),

    #[error("invalid index '{path}': {message}")]
    Index { path: PathBuf, message: String },
}

impl Error {
    pub fn index<P: Into<PathBuf>, M: std::fmt::Display>(path: P, message: M) -> Self {
        Error::Index {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn read_to_string(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

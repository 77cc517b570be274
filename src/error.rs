use std::path::PathBuf;

use thiserror::Error;

use crate::texts::Difficulty;

#[derive(Debug, Error)]
pub enum Error {
    #[error("sample pool file not found: {0}")]
    PoolMissing(String),

    #[error("sample pool {file} is not valid utf-8")]
    PoolEncoding { file: String },

    #[error("unable to parse sample pool {file}: {source}")]
    PoolParse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("sample pool for {0} difficulty has no sentences")]
    PoolEmpty(Difficulty),

    #[error("unable to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

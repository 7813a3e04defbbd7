use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unknown digest algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("could not read config file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("syntax error in config file {path} line {line}")]
    ConfigSyntax { path: PathBuf, line: usize },

    #[error("bad value for {key}: {value:?}")]
    ConfigValue { key: String, value: String },

    #[error("no {0} supplied, please set it in your config file")]
    MissingKey(&'static str),

    #[error("search phase out of order: cannot {requested} while {current}")]
    PhaseOrder { current: &'static str, requested: &'static str },
}

pub type SearchResult<T> = Result<T, SearchError>;

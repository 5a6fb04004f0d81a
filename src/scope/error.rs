use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScopeError {
    #[error("required scope file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read scope file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse scope file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("environment separator must not be empty")]
    EmptyEnvSeparator,

    #[error("invalid qualified variable name: '{0}'")]
    InvalidQualifiedName(String),
}

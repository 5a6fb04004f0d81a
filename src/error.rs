use crate::params::ParamsError;
use crate::scope::ScopeError;
use thiserror::Error;

/// Top-level error type for the module-params library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Params(#[from] ParamsError),

    #[error("scope error: {0}")]
    Scope(#[from] ScopeError),

    #[error("merged parameters cannot be encoded: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("merged parameters do not match the expected shape: {0}")]
    Decode(#[from] toml::de::Error),

    #[error("evaluation context requires a lookup service")]
    MissingLookup,

    #[error("unknown function '{0}'")]
    UnknownFunction(String),
}

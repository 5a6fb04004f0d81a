use thiserror::Error;

/// Fatal failures raised by `params()`.
///
/// None of these are recoverable inside the merger; the caller is expected to
/// halt whatever evaluation step invoked it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParamsError {
    #[error("params() requires two or three arguments, got {given}")]
    Arity { given: usize },

    #[error("params() argument {position} must be a string, got {kind}")]
    ArgumentNotString { position: usize, kind: &'static str },

    #[error("passed options is not a mapping (got {kind})")]
    OverridesNotMapping { kind: &'static str },

    #[error("default parameters do not exist for module '{module}'")]
    DefaultsMissing { module: String },

    #[error("defaults from module '{module}' is not a mapping (got {kind})")]
    DefaultsNotMapping { module: String, kind: &'static str },
}

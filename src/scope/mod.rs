//! Layered variable scope that serves module defaults to `params()`.

mod builder;
mod env;
mod error;

pub use builder::{Scope, ScopeBuilder};
pub use error::ScopeError;

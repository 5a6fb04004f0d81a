pub mod context;
pub mod name;
pub mod params;
pub mod scope;
pub mod value;
mod error;

pub use context::EvalContext;
pub use error::Error;
pub use name::QualifiedName;
pub use params::{merge, merge_with, DefaultsLookup, ParamsError};
pub use scope::{Scope, ScopeError};
pub use value::{Mapping, Scalar, Value};

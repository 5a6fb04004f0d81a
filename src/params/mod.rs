//! The `params()` function: merge caller options over a module's defaults.
//!
//! ```
//! use module_params::params::merge;
//! use module_params::{Mapping, Value};
//!
//! let lookup = |name: &str| -> Option<Value> {
//!     (name == "ntp::params::defaults").then(|| {
//!         let mut defaults = Mapping::new();
//!         defaults.insert("servers".into(), "pool.ntp.org".into());
//!         defaults.insert("iburst".into(), true.into());
//!         Value::Mapping(defaults)
//!     })
//! };
//!
//! let mut options = Mapping::new();
//! options.insert("iburst".into(), false.into());
//!
//! let merged = merge(&Value::Mapping(options), "ntp", &lookup)?;
//! assert_eq!(merged["servers"].as_str(), Some("pool.ntp.org"));
//! assert_eq!(merged["iburst"], Value::from(false));
//! # Ok::<(), module_params::ParamsError>(())
//! ```

mod error;

pub use error::ParamsError;

use crate::name::{QualifiedName, DEFAULTS_VARIABLE};
use crate::value::{Mapping, Value};

/// Resolves a qualified variable name to its current value.
///
/// This is the only collaborator the merger talks to. Implementations must be
/// read-only; the merger may be called from several threads at once.
pub trait DefaultsLookup: Send + Sync {
    /// Returns the value bound to `name`, or `None` if nothing is declared.
    fn lookup_var(&self, name: &str) -> Option<Value>;
}

impl<F> DefaultsLookup for F
where
    F: Fn(&str) -> Option<Value> + Send + Sync,
{
    fn lookup_var(&self, name: &str) -> Option<Value> {
        self(name)
    }
}

/// Merges `overrides` over `<module>::params::defaults`.
pub fn merge<L>(overrides: &Value, module: &str, lookup: &L) -> Result<Mapping, ParamsError>
where
    L: DefaultsLookup + ?Sized,
{
    merge_with(overrides, module, DEFAULTS_VARIABLE, lookup)
}

/// Merges `overrides` over `<module>::params::<variable>`.
///
/// The merge is shallow: a key present in `overrides` replaces the default
/// value for that key wholesale, nested mappings included. Keys only present
/// in `overrides` are added. Neither input is modified.
pub fn merge_with<L>(
    overrides: &Value,
    module: &str,
    variable: &str,
    lookup: &L,
) -> Result<Mapping, ParamsError>
where
    L: DefaultsLookup + ?Sized,
{
    let Value::Mapping(overrides) = overrides else {
        return Err(ParamsError::OverridesNotMapping {
            kind: overrides.kind(),
        });
    };

    let name = QualifiedName::defaults_for(module, variable);
    let mut merged = match lookup.lookup_var(&name.to_string()) {
        None | Some(Value::Null) => {
            return Err(ParamsError::DefaultsMissing {
                module: module.to_string(),
            })
        }
        Some(Value::Mapping(defaults)) => defaults,
        Some(other) => {
            return Err(ParamsError::DefaultsNotMapping {
                module: module.to_string(),
                kind: other.kind(),
            })
        }
    };

    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    Ok(merged)
}

/// Entry point with the template calling convention:
/// `params(options, module [, variable])`.
pub fn params<L>(args: &[Value], lookup: &L) -> Result<Mapping, ParamsError>
where
    L: DefaultsLookup + ?Sized,
{
    let (overrides, module, variable) = match args {
        [overrides, module] => (overrides, module, None),
        [overrides, module, variable] => (overrides, module, Some(variable)),
        _ => return Err(ParamsError::Arity { given: args.len() }),
    };

    // A bad options value wins over a bad module name.
    if !matches!(overrides, Value::Mapping(_)) {
        return Err(ParamsError::OverridesNotMapping {
            kind: overrides.kind(),
        });
    }

    let module = string_argument(module, 2)?;
    let variable = match variable {
        Some(variable) => string_argument(variable, 3)?,
        None => DEFAULTS_VARIABLE,
    };

    merge_with(overrides, module, variable, lookup)
}

fn string_argument(value: &Value, position: usize) -> Result<&str, ParamsError> {
    value.as_str().ok_or(ParamsError::ArgumentNotString {
        position,
        kind: value.kind(),
    })
}

//! Evaluation context exposing `params()` as a callable template function.

use serde::de::DeserializeOwned;

use crate::params::{self, DefaultsLookup};
use crate::value::{from_mapping, Value};
use crate::Error;

/// Name under which the merger is registered.
pub const PARAMS_FUNCTION: &str = "params";

/// Context that template function calls are evaluated against.
///
/// Generic over the lookup service `L` that variables are resolved from,
/// typically a [`Scope`](crate::Scope).
///
/// ## Example
///
/// ```no_run
/// use module_params::{EvalContext, Mapping, Scope, Value};
///
/// let ctx = EvalContext::builder()
///     .with_lookup(Scope::builder().with_file("modules/ntp.toml", true).build()?)
///     .build()?;
///
/// let merged = ctx.call("params", &[Value::Mapping(Mapping::new()), "ntp".into()])?;
/// # Ok::<(), module_params::Error>(())
/// ```
#[derive(Debug)]
pub struct EvalContext<L> {
    lookup: L,
}

impl<L: DefaultsLookup> EvalContext<L> {
    /// Returns the lookup service backing this context.
    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    /// Invokes a template function by name.
    pub fn call(&self, function: &str, args: &[Value]) -> Result<Value, Error> {
        match function {
            PARAMS_FUNCTION => self.params(args),
            _ => Err(Error::UnknownFunction(function.to_string())),
        }
    }

    /// `params(options, module [, variable])`.
    pub fn params(&self, args: &[Value]) -> Result<Value, Error> {
        Ok(Value::Mapping(params::params(args, &self.lookup)?))
    }

    /// Like [`params`](Self::params), decoding the merged mapping into `T`.
    pub fn params_as<T: DeserializeOwned>(&self, args: &[Value]) -> Result<T, Error> {
        let merged = params::params(args, &self.lookup)?;
        from_mapping(&merged)
    }
}

impl EvalContext<()> {
    /// Creates a new builder for constructing an `EvalContext`.
    pub fn builder() -> EvalContextBuilder<()> {
        EvalContextBuilder { lookup: None }
    }
}

/// Builder for constructing an [`EvalContext`].
///
/// Starts without a lookup (`EvalContextBuilder<()>`) and transitions to
/// `EvalContextBuilder<L>` when [`with_lookup`](Self::with_lookup) is called.
#[derive(Debug)]
#[must_use = "builders do nothing until .build() is called"]
pub struct EvalContextBuilder<L> {
    lookup: Option<L>,
}

impl EvalContextBuilder<()> {
    /// Attaches the service variables are resolved from.
    pub fn with_lookup<L: DefaultsLookup>(self, lookup: L) -> EvalContextBuilder<L> {
        EvalContextBuilder {
            lookup: Some(lookup),
        }
    }
}

impl<L> EvalContextBuilder<L> {
    /// Builds the `EvalContext`.
    ///
    /// Returns an error if no lookup was provided.
    pub fn build(self) -> Result<EvalContext<L>, Error> {
        Ok(EvalContext {
            lookup: self.lookup.ok_or(Error::MissingLookup)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Mapping, ParamsError, Scope};
    use serde::Deserialize;

    fn ntp_scope() -> Scope {
        let mut scope = Scope::default();
        scope
            .declare("ntp::params::defaults::servers", "pool.ntp.org".into())
            .unwrap();
        scope
            .declare("ntp::params::defaults::iburst", true.into())
            .unwrap();
        scope
    }

    fn context() -> EvalContext<Scope> {
        EvalContext::builder().with_lookup(ntp_scope()).build().unwrap()
    }

    #[test]
    fn test_builder_requires_lookup() {
        let result = EvalContext::builder().build();
        assert!(matches!(result, Err(Error::MissingLookup)));
    }

    #[test]
    fn test_call_params_by_name() {
        let mut options = Mapping::new();
        options.insert("iburst".into(), false.into());

        let merged = context()
            .call(PARAMS_FUNCTION, &[Value::Mapping(options), "ntp".into()])
            .unwrap();
        let merged = merged.as_mapping().unwrap();
        assert_eq!(merged["servers"].as_str(), Some("pool.ntp.org"));
        assert_eq!(merged["iburst"], Value::from(false));
    }

    #[test]
    fn test_unknown_function() {
        let err = context().call("hiera", &[]).unwrap_err();
        assert!(matches!(err, Error::UnknownFunction(ref name) if name == "hiera"));
    }

    #[test]
    fn test_params_errors_are_wrapped() {
        let err = context().params(&[Value::Mapping(Mapping::new())]).unwrap_err();
        assert!(matches!(err, Error::Params(ParamsError::Arity { given: 1 })));
    }

    #[test]
    fn test_params_as_typed() {
        #[derive(Debug, Deserialize)]
        struct Ntp {
            servers: String,
            iburst: bool,
        }

        let ntp: Ntp = context()
            .params_as(&[Value::Mapping(Mapping::new()), "ntp".into()])
            .unwrap();
        assert_eq!(ntp.servers, "pool.ntp.org");
        assert!(ntp.iburst);
    }

    #[test]
    fn test_closure_lookup() {
        let ctx = EvalContext::builder()
            .with_lookup(|_: &str| Some(Value::Mapping(Mapping::new())))
            .build()
            .unwrap();
        let merged = ctx
            .params(&[Value::Mapping(Mapping::new()), "anything".into()])
            .unwrap();
        assert_eq!(merged, Value::Mapping(Mapping::new()));
    }

    #[test]
    fn test_lookup_is_exposed() {
        let ctx = context();
        assert!(ctx.lookup().contains("ntp::params::defaults::servers"));
        assert_eq!(
            ctx.lookup().lookup_var("ntp::params::defaults::iburst"),
            Some(Value::from(true))
        );
    }
}

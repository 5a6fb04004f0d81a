//! Qualified variable names such as `ntp::params::defaults`.

use std::fmt;

pub const SEPARATOR: &str = "::";

/// Namespace inside a module that holds its parameter defaults.
pub const PARAMS_NAMESPACE: &str = "params";

/// Variable read by `params()` when no alternate name is given.
pub const DEFAULTS_VARIABLE: &str = "defaults";

/// A `::`-separated path naming a variable in a module namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    segments: Vec<String>,
}

impl QualifiedName {
    /// Parses `a::b::c`. A single leading `::` (top scope) is accepted.
    ///
    /// Returns `None` for an empty name or one with an empty segment.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.strip_prefix(SEPARATOR).unwrap_or(name);
        let segments: Vec<String> = name.split(SEPARATOR).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return None;
        }
        Some(Self { segments })
    }

    /// Name of `variable` in the params namespace of `module`.
    ///
    /// `module` is not validated here; a malformed module name simply
    /// resolves to nothing.
    pub fn defaults_for(module: &str, variable: &str) -> Self {
        let module = module.strip_prefix(SEPARATOR).unwrap_or(module);
        let mut segments: Vec<String> = module.split(SEPARATOR).map(str::to_string).collect();
        segments.push(PARAMS_NAMESPACE.to_string());
        segments.push(variable.to_string());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(SEPARATOR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_module() {
        let name = QualifiedName::defaults_for("ntp", DEFAULTS_VARIABLE);
        assert_eq!(name.to_string(), "ntp::params::defaults");
    }

    #[test]
    fn test_defaults_for_nested_module() {
        let name = QualifiedName::defaults_for("::apache::mod", "nodefault");
        assert_eq!(name.to_string(), "apache::mod::params::nodefault");
        assert_eq!(name.segments().len(), 4);
    }

    #[test]
    fn test_parse_top_scope() {
        let name = QualifiedName::parse("::ntp::params::defaults").unwrap();
        assert_eq!(name.segments(), ["ntp", "params", "defaults"]);
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        assert!(QualifiedName::parse("").is_none());
        assert!(QualifiedName::parse("ntp::::defaults").is_none());
        assert!(QualifiedName::parse("ntp::").is_none());
        assert!(QualifiedName::parse("::params::defaults").is_some());
    }
}

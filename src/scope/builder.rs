use std::path::{Path, PathBuf};

use super::env::load_env_vars;
use super::ScopeError;
use crate::name::QualifiedName;
use crate::params::DefaultsLookup;
use crate::value::{mapping_from_table, Mapping, Value};

/// A layer in the scope loading pipeline.
#[derive(Debug)]
enum ScopeSource {
    File { path: PathBuf, required: bool },
    Env { prefix: String, separator: String },
    Declaration { name: String, value: toml::Value },
}

/// Builder for a [`Scope`] assembled from TOML files, environment variables
/// and inline declarations.
///
/// Layers are applied in registration order, later ones overriding earlier
/// ones. Nested tables are merged recursively; other values (including
/// arrays) are replaced entirely.
///
/// Tables nest into namespaces, so this file declares
/// `ntp::params::defaults`:
///
/// ```toml
/// [ntp.params.defaults]
/// servers = ["0.pool.ntp.org", "1.pool.ntp.org"]
/// iburst = true
/// ```
///
/// ## Example
///
/// ```no_run
/// use module_params::Scope;
///
/// let scope = Scope::builder()
///     .with_file("modules/ntp.toml", true)
///     .with_file("site/local.toml", false)
///     .with_env("SITE", "__")
///     .build()?;
///
/// assert!(scope.contains("ntp::params::defaults"));
/// # Ok::<(), module_params::ScopeError>(())
/// ```
#[derive(Debug, Default)]
#[must_use = "builders do nothing until .build() is called"]
pub struct ScopeBuilder {
    sources: Vec<ScopeSource>,
}

impl ScopeBuilder {
    /// Adds a TOML file to be loaded.
    ///
    /// If `required` is `true`, the build will fail if the file doesn't exist.
    /// Optional files that are missing are skipped.
    pub fn with_file(mut self, path: impl AsRef<Path>, required: bool) -> Self {
        self.sources.push(ScopeSource::File {
            path: path.as_ref().to_path_buf(),
            required,
        });
        self
    }

    /// Overrides variables from environment variables with the given prefix.
    ///
    /// `<PREFIX><SEP>NTP<SEP>PARAMS<SEP>DEFAULTS<SEP>SERVERS` sets key
    /// `servers` of `ntp::params::defaults`. Path segments are lowercased and
    /// values coerced to integer, float, boolean, or string (fallback).
    pub fn with_env(mut self, prefix: impl Into<String>, separator: impl Into<String>) -> Self {
        self.sources.push(ScopeSource::Env {
            prefix: prefix.into(),
            separator: separator.into(),
        });
        self
    }

    /// Declares a single variable, e.g. `ntp::params::defaults`.
    pub fn with_declaration(mut self, name: impl Into<String>, value: toml::Value) -> Self {
        self.sources.push(ScopeSource::Declaration {
            name: name.into(),
            value,
        });
        self
    }

    /// Loads and merges every layer in registration order.
    pub fn build(self) -> Result<Scope, ScopeError> {
        let mut merged = toml::Table::new();

        for source in self.sources {
            match source {
                ScopeSource::File { path, required } => {
                    if let Some(table) = load_scope_file(&path, required)? {
                        tracing::debug!(path = %path.display(), "loaded scope file");
                        deep_merge(&mut merged, table);
                    }
                }
                ScopeSource::Env { prefix, separator } => {
                    let applied = load_env_vars(&mut merged, &prefix, &separator)?;
                    tracing::debug!(%prefix, applied, "applied environment overrides");
                }
                ScopeSource::Declaration { name, value } => {
                    let qualified = QualifiedName::parse(&name)
                        .ok_or(ScopeError::InvalidQualifiedName(name))?;
                    deep_merge(&mut merged, nest(qualified.segments(), value));
                }
            }
        }

        Ok(Scope {
            root: mapping_from_table(merged),
        })
    }
}

/// Read-only table of variables keyed by qualified name.
///
/// This is the lookup service `params()` reads module defaults from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    root: Mapping,
}

impl Scope {
    /// Creates a new scope builder.
    pub fn builder() -> ScopeBuilder {
        ScopeBuilder::default()
    }

    /// Returns the variable bound to `name`, walking `::` segments through
    /// nested mappings.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let qualified = QualifiedName::parse(name)?;
        let (first, rest) = qualified.segments().split_first()?;
        let mut current = self.root.get(first)?;
        for segment in rest {
            current = current.as_mapping()?.get(segment)?;
        }
        Some(current)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Binds `value` to `name`, replacing whatever was there.
    ///
    /// Intermediate namespaces are created as needed; a non-mapping in the
    /// way is replaced by an empty mapping.
    pub fn declare(&mut self, name: &str, value: Value) -> Result<(), ScopeError> {
        let qualified = QualifiedName::parse(name)
            .ok_or_else(|| ScopeError::InvalidQualifiedName(name.to_string()))?;
        let (last, parents) = qualified
            .segments()
            .split_last()
            .ok_or_else(|| ScopeError::InvalidQualifiedName(name.to_string()))?;

        let mut current = &mut self.root;
        for segment in parents {
            let slot = current
                .entry(segment.clone())
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            if !matches!(slot, Value::Mapping(_)) {
                *slot = Value::Mapping(Mapping::new());
            }
            current = match slot {
                Value::Mapping(next) => next,
                _ => return Err(ScopeError::InvalidQualifiedName(name.to_string())),
            };
        }
        current.insert(last.clone(), value);
        Ok(())
    }
}

impl DefaultsLookup for Scope {
    fn lookup_var(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }
}

/// Loads and parses a TOML scope file.
///
/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
fn load_scope_file(path: &Path, required: bool) -> Result<Option<toml::Table>, ScopeError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            let table = toml::from_str(&contents).map_err(|e| ScopeError::ParseError {
                path: path.to_path_buf(),
                source: e,
            })?;
            Ok(Some(table))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            if required {
                Err(ScopeError::FileNotFound(path.to_path_buf()))
            } else {
                tracing::debug!(path = %path.display(), "optional scope file missing, skipping");
                Ok(None)
            }
        }
        Err(e) => Err(ScopeError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Wraps `value` in one table per segment: `[a, b]` gives `{a = {b = value}}`.
fn nest(segments: &[String], value: toml::Value) -> toml::Table {
    let mut value = value;
    for segment in segments.iter().rev() {
        let mut wrapper = toml::Table::new();
        wrapper.insert(segment.clone(), value);
        value = toml::Value::Table(wrapper);
    }
    match value {
        toml::Value::Table(table) => table,
        _ => toml::Table::new(),
    }
}

fn deep_merge(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_table)), toml::Value::Table(overlay_table)) => {
                deep_merge(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

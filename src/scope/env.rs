//! Environment variable overrides for scope variables.
//!
//! `SITE__NTP__PARAMS__DEFAULTS__SERVERS=pool.example.com` with prefix `SITE`
//! and separator `__` sets `ntp::params::defaults` key `servers`.

use toml::{Table, Value};

use super::ScopeError;

/// Applies every matching variable from the process environment.
pub fn load_env_vars(table: &mut Table, prefix: &str, separator: &str) -> Result<usize, ScopeError> {
    apply_env_vars(table, prefix, separator, std::env::vars())
}

/// Applies the matching `(name, value)` pairs, returning how many were used.
pub fn apply_env_vars<I>(
    table: &mut Table,
    prefix: &str,
    separator: &str,
    vars: I,
) -> Result<usize, ScopeError>
where
    I: IntoIterator<Item = (String, String)>,
{
    if separator.is_empty() {
        return Err(ScopeError::EmptyEnvSeparator);
    }

    let prefix_with_sep = format!("{prefix}{separator}");
    let mut applied = 0;

    for (key, value) in vars {
        let Some(path) = key.strip_prefix(&prefix_with_sep) else {
            continue;
        };
        let path: Vec<String> = path.split(separator).map(str::to_lowercase).collect();
        if path.iter().any(String::is_empty) {
            tracing::debug!(%key, "ignoring environment variable with empty path segment");
            continue;
        }

        tracing::trace!(%key, "applying environment override");
        set_at_path(table, &path, coerce_value(&value));
        applied += 1;
    }

    Ok(applied)
}

/// Sets `value` at `path`, replacing any non-table that sits in the way.
fn set_at_path(table: &mut Table, path: &[String], value: Value) {
    let Some((first, rest)) = path.split_first() else {
        return;
    };

    if rest.is_empty() {
        table.insert(first.clone(), value);
        return;
    }

    if !matches!(table.get(first), Some(Value::Table(_))) {
        table.insert(first.clone(), Value::Table(Table::new()));
    }
    if let Some(Value::Table(nested)) = table.get_mut(first) {
        set_at_path(nested, rest, value);
    }
}

fn coerce_value(s: &str) -> Value {
    if s.eq_ignore_ascii_case("true") {
        return Value::Boolean(true);
    }
    if s.eq_ignore_ascii_case("false") {
        return Value::Boolean(false);
    }

    if looks_like_integer(s) {
        if let Ok(i) = s.parse::<i64>() {
            return Value::Integer(i);
        }
    }

    if s.contains('.') {
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
    }

    Value::String(s.to_string())
}

fn looks_like_integer(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_nested_override() {
        let mut table: Table = toml::from_str(
            r#"
            [ntp.params.defaults]
            servers = "pool.ntp.org"
            iburst = true
            "#,
        )
        .unwrap();

        let applied = apply_env_vars(
            &mut table,
            "SITE",
            "__",
            vars(&[
                ("SITE__NTP__PARAMS__DEFAULTS__SERVERS", "time.example.com"),
                ("OTHER__NTP__PARAMS__DEFAULTS__IBURST", "false"),
            ]),
        )
        .unwrap();

        assert_eq!(applied, 1);
        let defaults = &table["ntp"]["params"]["defaults"];
        assert_eq!(defaults["servers"].as_str(), Some("time.example.com"));
        assert_eq!(defaults["iburst"].as_bool(), Some(true));
    }

    #[test]
    fn test_creates_missing_tables() {
        let mut table = Table::new();
        apply_env_vars(
            &mut table,
            "SITE",
            "__",
            vars(&[("SITE__APACHE__PARAMS__PORT", "8080")]),
        )
        .unwrap();
        assert_eq!(table["apache"]["params"]["port"].as_integer(), Some(8080));
    }

    #[test]
    fn test_skips_empty_segments() {
        let mut table = Table::new();
        let applied = apply_env_vars(
            &mut table,
            "SITE",
            "__",
            vars(&[("SITE__", "x"), ("SITE__NTP____X", "y")]),
        )
        .unwrap();
        assert_eq!(applied, 0);
        assert!(table.is_empty());
    }

    #[test]
    fn test_empty_separator_rejected() {
        let mut table = Table::new();
        let result = apply_env_vars(&mut table, "SITE", "", vars(&[]));
        assert!(matches!(result, Err(ScopeError::EmptyEnvSeparator)));
    }

    #[test]
    fn test_coerce_value() {
        assert_eq!(coerce_value("TRUE"), Value::Boolean(true));
        assert_eq!(coerce_value("-42"), Value::Integer(-42));
        assert_eq!(coerce_value("1.5"), Value::Float(1.5));
        assert_eq!(coerce_value("1e5"), Value::String("1e5".into()));
        assert_eq!(coerce_value("-"), Value::String("-".into()));
        assert_eq!(coerce_value("pool.ntp.org"), Value::String("pool.ntp.org".into()));
    }
}

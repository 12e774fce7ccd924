//! Environment-backed configuration helpers
//!
//! Values are read through a lookup function so the same parsing runs against
//! the process environment in binaries and against fixed maps in tests.

use std::str::FromStr;

use crate::errors::{SharedError, SharedResult};

/// Load a `.env` file from the current directory or its parents, if present.
///
/// Variables already set in the process environment win over file values.
pub fn load_env_file() {
    let _ = dotenvy::dotenv();
}

/// Lookup backed by the process environment
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Read a required, non-blank value
pub fn required_var<F>(lookup: &F, key: &str) -> SharedResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(SharedError::MissingConfig { field: key.to_string() }),
    }
}

/// Read an optional string value with a default
pub fn var_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Parse an optional value, falling back to `default` when unset
pub fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> SharedResult<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).map(|value| value.trim().to_string()) {
        Some(value) if !value.is_empty() => value.parse::<T>().map_err(|_| SharedError::InvalidConfig {
            field: key.to_string(),
            value,
        }),
        _ => Ok(default),
    }
}

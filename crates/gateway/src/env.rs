//! Environment variable readers shared by the storefront and admin configs.
//!
//! Every reader names the variable in its error, so a bad deployment fails
//! at start-up with the offending key.

use std::collections::HashMap;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Fragments that mark a value copied from a sample `.env` (case-insensitive).
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

impl ConfigError {
    fn invalid(key: &str, reason: impl ToString) -> Self {
        Self::InvalidEnvVar(key.to_owned(), reason.to_string())
    }
}

/// A variable that may be absent. Blank values count as absent.
#[must_use]
pub fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// A variable that must be set.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` when unset or blank.
pub fn required(key: &str) -> Result<String, ConfigError> {
    optional(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_owned()))
}

/// A variable with a fallback.
#[must_use]
pub fn or_default(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_owned())
}

/// Parse a variable, falling back to `default` when unset.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` when the value does not parse.
pub fn parsed<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional(key).map_or(Ok(default), |raw| {
        raw.trim().parse().map_err(|e| ConfigError::invalid(key, e))
    })
}

/// A required secret, kept out of `Debug` output.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` when unset.
pub fn secret(key: &str) -> Result<SecretString, ConfigError> {
    required(key).map(SecretString::from)
}

/// Connection string from `primary_key`, or the generic `DATABASE_URL` that
/// `fly postgres attach` sets.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` naming `primary_key` when neither is
/// set.
pub fn database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    optional(primary_key)
        .or_else(|| optional("DATABASE_URL"))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_owned()))
}

/// On/off switch; unset means `false`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything but the usual spellings
/// of true and false.
pub fn flag(key: &str) -> Result<bool, ConfigError> {
    let Some(raw) = optional(key) else {
        return Ok(false);
    };
    parse_flag(&raw)
        .ok_or_else(|| ConfigError::invalid(key, format!("expected true/false, got {raw}")))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Sentry sample rate in `[0, 1]`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` when unparsable or out of range.
pub fn sample_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let rate = parsed(key, default)?;
    if (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(ConfigError::invalid(
            key,
            format!("must be between 0 and 1 (got {rate})"),
        ))
    }
}

/// Session secret: long enough, random-looking and not a sample value.
///
/// # Errors
///
/// Returns `ConfigError::InsecureSecret` when the value fails any check.
pub fn session_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = secret(key)?;
    check_secret(value.expose_secret(), key)?;
    Ok(value)
}

fn check_secret(value: &str, key: &str) -> Result<(), ConfigError> {
    let insecure = |reason: String| -> Result<(), ConfigError> {
        Err(ConfigError::InsecureSecret(key.to_owned(), reason))
    };

    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return insecure(format!(
            "must be at least {MIN_SESSION_SECRET_LENGTH} characters (got {})",
            value.len()
        ));
    }

    let lower = value.to_lowercase();
    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(**p)) {
        return insecure(format!("appears to be a placeholder (contains '{pattern}')"));
    }

    let entropy = shannon_entropy(value);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return insecure(format!(
            "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
        ));
    }

    Ok(())
}

/// Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    let mut counts: HashMap<char, u32> = HashMap::new();
    for c in s.chars() {
        *counts.entry(c).or_default() += 1;
    }
    let total: u32 = counts.values().sum();
    if total == 0 {
        return 0.0;
    }

    let total = f64::from(total);
    counts
        .values()
        .map(|&n| {
            let p = f64::from(n) / total;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy() {
        assert!(shannon_entropy("").abs() < f64::EPSILON);
        assert!(shannon_entropy("aaaa").abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_secret_too_short() {
        assert!(matches!(
            check_secret("short", "KEY"),
            Err(ConfigError::InsecureSecret(_, _))
        ));
    }

    #[test]
    fn test_secret_placeholder() {
        let err = check_secret("changeme-changeme-changeme-changeme", "KEY").unwrap_err();
        assert!(err.to_string().contains("placeholder"));
    }

    #[test]
    fn test_secret_low_entropy() {
        assert!(check_secret(&"ab".repeat(20), "KEY").is_err());
    }

    #[test]
    fn test_secret_random() {
        assert!(check_secret("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6%", "KEY").is_ok());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 1 "), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}

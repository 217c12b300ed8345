//! Customer email address.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// Nothing left after trimming.
    #[error("email cannot be empty")]
    Empty,
    /// Longer than the SMTP path limit.
    #[error("email must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Contains spaces or control characters.
    #[error("email cannot contain whitespace")]
    Whitespace,
    /// Not exactly one `@`, or nothing on one side of it.
    #[error("email must look like name@domain")]
    Malformed,
}

/// A customer email address as typed into a booking, checkout or contact form.
///
/// Surrounding whitespace is trimmed. Validation mirrors what a browser
/// `type="email"` input accepts: a single `@` with something on both sides
/// and no blanks anywhere.
///
/// ```
/// use portell_core::Email;
///
/// assert!(Email::parse(" jan@portell.wine ").is_ok());
/// assert!(Email::parse("jan@").is_err());
/// assert!(Email::parse("jan kowalski@portell.wine").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from user input.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first problem found.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(EmailError::Whitespace);
        }

        let mut parts = s.split('@');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => {
                Ok(Self(s.to_owned()))
            }
            _ => Err(EmailError::Malformed),
        }
    }

    /// The address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part after the `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.rsplit('@').next().unwrap_or_default()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_common_addresses() {
        assert!(Email::parse("anna@portell.wine").is_ok());
        assert!(Email::parse("anna.nowak+wino@example.co.uk").is_ok());
        assert!(Email::parse("a@b").is_ok());
    }

    #[test]
    fn test_trims_input() {
        let email = Email::parse("  anna@portell.wine\n").unwrap();
        assert_eq!(email.as_str(), "anna@portell.wine");
    }

    #[test]
    fn test_rejects_empty() {
        assert_eq!(Email::parse("   "), Err(EmailError::Empty));
    }

    #[test]
    fn test_rejects_too_long() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(matches!(
            Email::parse(&long),
            Err(EmailError::TooLong { .. })
        ));
    }

    #[test]
    fn test_rejects_inner_whitespace() {
        assert_eq!(
            Email::parse("anna nowak@portell.wine"),
            Err(EmailError::Whitespace)
        );
    }

    #[test]
    fn test_rejects_malformed() {
        assert_eq!(Email::parse("portell.wine"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("@portell.wine"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("anna@"), Err(EmailError::Malformed));
        assert_eq!(Email::parse("a@b@c"), Err(EmailError::Malformed));
    }

    #[test]
    fn test_domain() {
        let email = Email::parse("anna@portell.wine").unwrap();
        assert_eq!(email.domain(), "portell.wine");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Email = serde_json::from_str("\"anna@portell.wine\"").unwrap();
        assert_eq!(ok.to_string(), "anna@portell.wine");
        assert!(serde_json::from_str::<Email>("\"nope\"").is_err());
    }
}

//! Postal addresses for shipping and billing.

use serde::{Deserialize, Serialize};

/// Country prefilled in checkout.
pub const DEFAULT_COUNTRY: &str = "Polska";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_owned()
}

impl Default for Address {
    fn default() -> Self {
        Self {
            street: String::new(),
            city: String::new(),
            postal_code: String::new(),
            country: default_country(),
        }
    }
}

impl Address {
    /// Street, city and postal code are all filled in.
    ///
    /// Country is never checked since the form always carries one.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.street, &self.city, &self.postal_code]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    /// Single-line rendering used in emails and the review step.
    #[must_use]
    pub fn one_line(&self) -> String {
        format!(
            "{}, {} {}, {}",
            self.street.trim(),
            self.postal_code.trim(),
            self.city.trim(),
            self.country.trim()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_country() {
        assert_eq!(Address::default().country, "Polska");
    }

    #[test]
    fn test_is_complete() {
        let mut address = Address {
            street: "ul. Winna 1".to_owned(),
            city: "Zielona Góra".to_owned(),
            postal_code: "65-001".to_owned(),
            ..Address::default()
        };
        assert!(address.is_complete());
        address.city = "  ".to_owned();
        assert!(!address.is_complete());
    }

    #[test]
    fn test_one_line() {
        let address = Address {
            street: "ul. Winna 1".to_owned(),
            city: "Zielona Góra".to_owned(),
            postal_code: "65-001".to_owned(),
            ..Address::default()
        };
        assert_eq!(address.one_line(), "ul. Winna 1, 65-001 Zielona Góra, Polska");
    }
}

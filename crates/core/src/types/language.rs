//! Display language of the storefront.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The two languages the site is published in. Polish is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Pl,
    En,
}

impl Language {
    /// Two-letter code, also used as the `lang` attribute in HTML.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Pl => "pl",
            Self::En => "en",
        }
    }

    /// The language the toggle switches to.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Pl => Self::En,
            Self::En => Self::Pl,
        }
    }

    /// Pick between a Polish and English string, falling back to Polish
    /// when the English variant is blank.
    #[must_use]
    pub fn pick<'a>(self, pl: &'a str, en: &'a str) -> &'a str {
        match self {
            Self::En if !en.trim().is_empty() => en,
            _ => pl,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pl" => Ok(Self::Pl),
            "en" => Ok(Self::En),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_polish() {
        assert_eq!(Language::default(), Language::Pl);
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert_eq!("pl".parse::<Language>().unwrap(), Language::Pl);
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_pick_falls_back_to_polish() {
        assert_eq!(Language::En.pick("Degustacja", "Tasting"), "Tasting");
        assert_eq!(Language::En.pick("Degustacja", " "), "Degustacja");
        assert_eq!(Language::Pl.pick("Degustacja", "Tasting"), "Degustacja");
    }
}

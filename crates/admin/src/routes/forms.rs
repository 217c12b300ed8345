//! Parsing helpers shared by the product and event editors.
//!
//! Editor forms post every field as text so a rejected submission can be
//! shown back exactly as typed.

use rust_decimal::Decimal;

/// A field the editor has to correct. The message is shown above the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError(pub String);

impl FieldError {
    fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trimmed, non-empty text.
pub fn required(value: &str, label: &str) -> Result<String, FieldError> {
    let value = value.trim();
    if value.is_empty() {
        Err(FieldError::new(format!("{label} is required")))
    } else {
        Ok(value.to_owned())
    }
}

/// Non-negative amount. Accepts a decimal comma.
pub fn price(value: &str, label: &str) -> Result<Decimal, FieldError> {
    let raw = value.trim().replace(',', ".");
    let amount: Decimal = raw
        .parse()
        .map_err(|_| FieldError::new(format!("{label} must be a number")))?;
    if amount.is_sign_negative() {
        return Err(FieldError::new(format!("{label} cannot be negative")));
    }
    Ok(amount.round_dp(2))
}

/// Non-negative whole number; blank means `default`.
pub fn count<T>(value: &str, label: &str, default: T) -> Result<T, FieldError>
where
    T: std::str::FromStr,
{
    let value = value.trim();
    if value.is_empty() {
        return Ok(default);
    }
    value
        .parse()
        .map_err(|_| FieldError::new(format!("{label} must be a whole number, 0 or more")))
}

/// HTML checkboxes are absent when unticked.
pub const fn checkbox(value: Option<&String>) -> bool {
    value.is_some()
}

/// URL slug from a title: lowercase ASCII, Polish letters transliterated,
/// everything else collapsed to single hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars().flat_map(char::to_lowercase) {
        let mapped = match c {
            'ą' => 'a',
            'ć' => 'c',
            'ę' => 'e',
            'ł' => 'l',
            'ń' => 'n',
            'ó' => 'o',
            'ś' => 's',
            'ź' | 'ż' => 'z',
            c if c.is_ascii_alphanumeric() => c,
            _ => '-',
        };
        if mapped == '-' && (slug.is_empty() || slug.ends_with('-')) {
            continue;
        }
        slug.push(mapped);
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// The typed slug, or one derived from `title` when left blank.
pub fn slug_or_derived(slug: &str, title: &str) -> String {
    let slug = slugify(slug);
    if slug.is_empty() { slugify(title) } else { slug }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_transliterates_polish() {
        assert_eq!(slugify("Wieczór z winem: Żółć & Róż"), "wieczor-z-winem-zolc-roz");
        assert_eq!(slugify("  --Regent 2021--  "), "regent-2021");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slug_falls_back_to_title() {
        assert_eq!(slug_or_derived("", "Degustacja win"), "degustacja-win");
        assert_eq!(slug_or_derived("Moja Nazwa", "Degustacja"), "moja-nazwa");
    }

    #[test]
    fn test_price_parsing() {
        assert_eq!(price("59,90", "Price").unwrap(), Decimal::new(5990, 2));
        assert_eq!(price(" 150 ", "Price").unwrap(), Decimal::new(150, 0));
        assert_eq!(
            price("-1", "Price").unwrap_err().0,
            "Price cannot be negative"
        );
        assert!(price("abc", "Price").is_err());
    }

    #[test]
    fn test_count_parsing() {
        assert_eq!(count::<u32>("", "Stock", 0).unwrap(), 0);
        assert_eq!(count::<u32>("12", "Stock", 0).unwrap(), 12);
        assert!(count::<u32>("-3", "Stock", 0).is_err());
        assert!(count::<u32>("1.5", "Stock", 0).is_err());
    }

    #[test]
    fn test_required_trims() {
        assert_eq!(required("  Regent ", "Name").unwrap(), "Regent");
        assert_eq!(required("   ", "Name").unwrap_err().0, "Name is required");
    }
}

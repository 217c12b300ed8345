//! Wine and bundle products.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Language, ProductCategory};

/// A product in the shop.
///
/// Free-text fields come in a Polish and an English variant; the English one
/// may be left blank by the admin, in which case the Polish text is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_en: String,
    pub price: Decimal,
    pub category: ProductCategory,
    /// Style within the category, e.g. "dry" or "semi-sweet".
    #[serde(default)]
    pub wine_type: String,
    #[serde(default)]
    pub vintage: Option<i32>,
    #[serde(default)]
    pub grape_variety: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default)]
    pub featured: bool,
}

const fn default_true() -> bool {
    true
}

impl Product {
    #[must_use]
    pub fn localized_name(&self, lang: Language) -> &str {
        lang.pick(&self.name, &self.name_en)
    }

    #[must_use]
    pub fn localized_description(&self, lang: Language) -> &str {
        lang.pick(&self.description, &self.description_en)
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_record() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "name": "Solaris 2022",
            "price": 89,
            "category": "white"
        }))
        .unwrap();

        assert!(product.active);
        assert!(!product.featured);
        assert_eq!(product.price, Decimal::new(89, 0));
        assert_eq!(product.localized_name(Language::En), "Solaris 2022");
    }
}

//! Filtering, searching and sorting of products and events for listing pages.
//!
//! Everything here works on slices already fetched from the gateway. The
//! functions are generic over `AsRef<Product>` / `AsRef<Event>` so they can
//! run on bare models as well as on stored records that carry ids.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Event, Product};
use crate::types::{EventType, ProductCategory};

/// Value of a select box that disables its filter.
pub const ALL: &str = "all";

/// Interpret a raw filter value: absent, blank and `"all"` mean "no filter".
#[must_use]
pub fn selected(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty() && !value.eq_ignore_ascii_case(ALL))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProductSort {
    #[default]
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "price-desc")]
    PriceDesc,
}

impl ProductSort {
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("price-asc") => Self::PriceAsc,
            Some("price-desc") => Self::PriceDesc,
            _ => Self::Name,
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EventSort {
    #[default]
    #[serde(rename = "date")]
    Date,
    #[serde(rename = "price-asc")]
    PriceAsc,
    #[serde(rename = "price-desc")]
    PriceDesc,
}

impl EventSort {
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("price-asc") => Self::PriceAsc,
            Some("price-desc") => Self::PriceDesc,
            _ => Self::Date,
        }
    }

    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
        }
    }
}

/// Product filters. `None` disables a predicate; the rest are AND-combined.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub category: Option<ProductCategory>,
    pub wine_type: Option<String>,
    pub vintage: Option<i32>,
    pub grape_variety: Option<String>,
    /// Inclusive lower bound.
    pub price_min: Option<Decimal>,
    /// Inclusive upper bound.
    pub price_max: Option<Decimal>,
    pub sort: ProductSort,
}

impl ProductQuery {
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(term) = self.search.as_deref() {
            if !text_matches(
                term,
                &[
                    &product.name,
                    &product.name_en,
                    &product.description,
                    &product.description_en,
                ],
            ) {
                return false;
            }
        }
        if self.category.is_some_and(|c| c != product.category) {
            return false;
        }
        if self
            .wine_type
            .as_deref()
            .is_some_and(|t| t != product.wine_type)
        {
            return false;
        }
        if self.vintage.is_some_and(|v| product.vintage != Some(v)) {
            return false;
        }
        if self
            .grape_variety
            .as_deref()
            .is_some_and(|g| g != product.grape_variety)
        {
            return false;
        }
        if self.price_min.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.price_max.is_some_and(|max| product.price > max) {
            return false;
        }
        true
    }

    /// Filter and sort products. Sorting is stable, so equal keys keep the
    /// order the gateway returned them in.
    #[must_use]
    pub fn apply<P: AsRef<Product>>(&self, products: Vec<P>) -> Vec<P> {
        let mut out: Vec<P> = products
            .into_iter()
            .filter(|p| self.matches(p.as_ref()))
            .collect();
        out.sort_by(|a, b| compare_products(self.sort, a.as_ref(), b.as_ref()));
        out
    }

    /// At least one filter besides sorting is set.
    #[must_use]
    pub const fn is_filtered(&self) -> bool {
        self.search.is_some()
            || self.category.is_some()
            || self.wine_type.is_some()
            || self.vintage.is_some()
            || self.grape_variety.is_some()
            || self.price_min.is_some()
            || self.price_max.is_some()
    }
}

fn compare_products(sort: ProductSort, a: &Product, b: &Product) -> Ordering {
    match sort {
        ProductSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        ProductSort::PriceAsc => a.price.cmp(&b.price),
        ProductSort::PriceDesc => b.price.cmp(&a.price),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub search: Option<String>,
    pub event_type: Option<EventType>,
    pub sort: EventSort,
}

impl EventQuery {
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(term) = self.search.as_deref() {
            if !text_matches(
                term,
                &[
                    &event.title,
                    &event.title_en,
                    &event.description,
                    &event.description_en,
                ],
            ) {
                return false;
            }
        }
        self.event_type.is_none_or(|t| t == event.event_type)
    }

    #[must_use]
    pub fn apply<E: AsRef<Event>>(&self, events: Vec<E>) -> Vec<E> {
        let mut out: Vec<E> = events
            .into_iter()
            .filter(|e| self.matches(e.as_ref()))
            .collect();
        out.sort_by(|a, b| compare_events(self.sort, a.as_ref(), b.as_ref()));
        out
    }
}

fn compare_events(sort: EventSort, a: &Event, b: &Event) -> Ordering {
    match sort {
        EventSort::Date => a.starts_at().cmp(&b.starts_at()),
        EventSort::PriceAsc => a.price.cmp(&b.price),
        EventSort::PriceDesc => b.price.cmp(&a.price),
    }
}

fn text_matches(term: &str, fields: &[&str]) -> bool {
    let needle = term.trim().to_lowercase();
    needle.is_empty()
        || fields
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
}

/// Distinct values offered in the search page's select boxes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    /// Newest first.
    pub vintages: Vec<i32>,
    /// Alphabetical.
    pub grape_varieties: Vec<String>,
    /// Alphabetical.
    pub wine_types: Vec<String>,
}

impl Facets {
    #[must_use]
    pub fn collect<'a, P, I>(products: I) -> Self
    where
        P: AsRef<Product> + 'a,
        I: IntoIterator<Item = &'a P>,
    {
        let mut facets = Self::default();
        for product in products {
            let product = product.as_ref();
            if let Some(vintage) = product.vintage {
                facets.vintages.push(vintage);
            }
            if !product.grape_variety.trim().is_empty() {
                facets.grape_varieties.push(product.grape_variety.clone());
            }
            if !product.wine_type.trim().is_empty() {
                facets.wine_types.push(product.wine_type.clone());
            }
        }
        facets.vintages.sort_unstable_by(|a, b| b.cmp(a));
        facets.vintages.dedup();
        facets.grape_varieties.sort();
        facets.grape_varieties.dedup();
        facets.wine_types.sort();
        facets.wine_types.dedup();
        facets
    }
}

impl AsRef<Self> for Product {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl AsRef<Self> for Event {
    fn as_ref(&self) -> &Self {
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::event::tests::tasting;
    use chrono::NaiveDate;

    fn wine(name: &str, category: ProductCategory, price: i64, vintage: Option<i32>, grape: &str) -> Product {
        Product {
            name: name.to_owned(),
            name_en: String::new(),
            slug: String::new(),
            description: String::new(),
            description_en: String::new(),
            price: Decimal::new(price, 0),
            category,
            wine_type: "dry".to_owned(),
            vintage,
            grape_variety: grape.to_owned(),
            image_url: String::new(),
            stock: 10,
            active: true,
            featured: false,
        }
    }

    fn cellar() -> Vec<Product> {
        vec![
            wine("Solaris", ProductCategory::White, 55, Some(2022), "Solaris"),
            wine("regent", ProductCategory::Red, 70, Some(2020), "Regent"),
            wine("Bąbelki", ProductCategory::Sparkling, 90, None, ""),
            wine("Zestaw prezentowy", ProductCategory::Bundle, 200, None, ""),
            wine("Rondo", ProductCategory::Red, 65, Some(2022), "Rondo"),
        ]
    }

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_selected_treats_all_as_absent() {
        assert_eq!(selected(Some("all")), None);
        assert_eq!(selected(Some(" ")), None);
        assert_eq!(selected(None), None);
        assert_eq!(selected(Some("red")), Some("red"));
    }

    #[test]
    fn test_default_sort_is_case_insensitive_name() {
        let out = ProductQuery::default().apply(cellar());
        assert_eq!(
            names(&out),
            ["Bąbelki", "regent", "Rondo", "Solaris", "Zestaw prezentowy"]
        );
    }

    #[test]
    fn test_category_and_price_sort() {
        let query = ProductQuery {
            category: Some(ProductCategory::Red),
            sort: ProductSort::PriceDesc,
            ..ProductQuery::default()
        };
        assert_eq!(names(&query.apply(cellar())), ["regent", "Rondo"]);
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let query = ProductQuery {
            price_min: Some(Decimal::new(55, 0)),
            price_max: Some(Decimal::new(70, 0)),
            sort: ProductSort::PriceAsc,
            ..ProductQuery::default()
        };
        assert_eq!(names(&query.apply(cellar())), ["Solaris", "Rondo", "regent"]);
    }

    #[test]
    fn test_search_hits_english_description() {
        let mut products = cellar();
        products[3].description_en = "A gift box with three bottles".to_owned();
        let query = ProductQuery {
            search: Some("GIFT".to_owned()),
            ..ProductQuery::default()
        };
        assert_eq!(names(&query.apply(products)), ["Zestaw prezentowy"]);
    }

    #[test]
    fn test_predicates_are_and_combined() {
        let query = ProductQuery {
            vintage: Some(2022),
            grape_variety: Some("Rondo".to_owned()),
            ..ProductQuery::default()
        };
        assert_eq!(names(&query.apply(cellar())), ["Rondo"]);
        assert!(query.is_filtered());
    }

    #[test]
    fn test_facets() {
        let facets = Facets::collect(&cellar());
        assert_eq!(facets.vintages, [2022, 2020]);
        assert_eq!(facets.grape_varieties, ["Regent", "Rondo", "Solaris"]);
        assert_eq!(facets.wine_types, ["dry"]);
    }

    #[test]
    fn test_events_by_type_and_date() {
        let mut dinner = tasting(20, 0);
        dinner.event_type = EventType::Dinner;
        let mut early = tasting(20, 0);
        early.title = "Wczesna degustacja".to_owned();
        early.date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let late = tasting(20, 0);

        let query = EventQuery {
            event_type: Some(EventType::Tasting),
            ..EventQuery::default()
        };
        let out = query.apply(vec![late, dinner, early]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, "Wczesna degustacja");
    }

    #[test]
    fn test_sort_parse_falls_back() {
        assert_eq!(ProductSort::parse(Some("bogus")), ProductSort::Name);
        assert_eq!(EventSort::parse(Some("price-desc")), EventSort::PriceDesc);
        assert_eq!(EventSort::parse(None), EventSort::Date);
    }
}

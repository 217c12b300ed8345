//! Seed the catalog from a YAML file.
//!
//! ```yaml
//! products:
//!   - name: Regent 2021
//!     price: "89.00"
//!     category: red
//! events:
//!   - title: Degustacja win
//!     date: 2026-06-12
//!     time: "18:00"
//!     price: "120.00"
//!     capacity: 20
//!     event_type: tasting
//! ```
//!
//! Records go through the gateway, so they get ids and timestamps exactly
//! like records created from the admin panel. Missing slugs are derived from
//! the Polish name or title, and events without `booked_count` start at zero.

use std::path::Path;

use portell_core::models::{Event, Product};
use portell_admin::routes::forms::slug_or_derived;
use portell_gateway::{Gateway, GatewayError, create_pool};
use serde::Deserialize;
use tracing::info;

use super::database_url;

/// Contents of a seed file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedFile {
    pub products: Vec<Product>,
    pub events: Vec<Event>,
}

/// How many records a seed run inserted.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedResult {
    pub products: usize,
    pub events: usize,
}

/// Seed products and events from `file_path`.
///
/// # Errors
///
/// Returns an error if the file is missing or malformed, `DATABASE_URL` is
/// not set, or an insert fails.
pub async fn catalog(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading seed data from file");

    // Parse before connecting so a typo fails fast
    let content = tokio::fs::read_to_string(path).await?;
    let seed: SeedFile = serde_yaml::from_str(&content)?;
    info!(
        products = seed.products.len(),
        events = seed.events.len(),
        "Parsed seed file"
    );

    let pool = create_pool(&database_url()?).await?;
    info!("Connected to database");

    let result = insert(&Gateway::postgres(pool), &seed).await?;

    info!("Seeding complete!");
    info!("  Products inserted: {}", result.products);
    info!("  Events inserted: {}", result.events);
    Ok(())
}

/// Insert every record of `seed` through `gateway`.
///
/// # Errors
///
/// Returns the first gateway error; records inserted before it stay.
pub async fn insert(gateway: &Gateway, seed: &SeedFile) -> Result<SeedResult, GatewayError> {
    let mut result = SeedResult::default();
    for product in &seed.products {
        let product = Product {
            slug: slug_or_derived(&product.slug, &product.name),
            ..product.clone()
        };
        let record = gateway.products.create(&product).await?;
        tracing::debug!(id = %record.id, name = %product.name, "Product seeded");
        result.products += 1;
    }
    for event in &seed.events {
        let event = Event {
            slug: slug_or_derived(&event.slug, &event.title),
            ..event.clone()
        };
        let record = gateway.events.create(&event).await?;
        tracing::debug!(id = %record.id, title = %event.title, "Event seeded");
        result.events += 1;
    }
    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use portell_core::{EventType, ProductCategory};
    use portell_gateway::SortSpec;

    use super::*;

    const SEED: &str = r#"
products:
  - name: Regent 2021
    price: "89.00"
    category: red
    vintage: 2021
    stock: 12
  - name: Zestaw degustacyjny
    price: "199.00"
    category: bundle
    active: false
events:
  - title: Degustacja win
    date: 2026-06-12
    time: "18:00"
    price: "120.00"
    capacity: 20
    event_type: tasting
"#;

    #[test]
    fn test_parses_seed_file_with_defaults() {
        let seed: SeedFile = serde_yaml::from_str(SEED).unwrap();
        assert_eq!(seed.products.len(), 2);
        assert_eq!(seed.products[0].category, ProductCategory::Red);
        assert_eq!(seed.products[0].vintage, Some(2021));
        assert!(seed.products[0].active);
        assert!(!seed.products[1].active);
        assert_eq!(seed.events[0].event_type, EventType::Tasting);
        assert_eq!(seed.events[0].booked_count, 0);
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let seed: SeedFile = serde_yaml::from_str("products: []\n").unwrap();
        assert!(seed.products.is_empty());
        assert!(seed.events.is_empty());
    }

    #[tokio::test]
    async fn test_insert_goes_through_gateway() {
        let (gateway, _store) = Gateway::in_memory();
        let seed: SeedFile = serde_yaml::from_str(SEED).unwrap();

        let result = insert(&gateway, &seed).await.unwrap();
        assert_eq!(
            result,
            SeedResult {
                products: 2,
                events: 1
            }
        );

        let events = gateway.events.list(&SortSpec::default(), None).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Degustacja win");
        assert_eq!(events[0].capacity, 20);
        assert_eq!(events[0].slug, "degustacja-win");
    }
}

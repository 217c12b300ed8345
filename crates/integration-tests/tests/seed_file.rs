//! The sample seed file stays loadable.

use portell_core::models::{Event, Product};
use serde::Deserialize;

#[derive(Deserialize)]
struct SeedFile {
    products: Vec<Product>,
    events: Vec<Event>,
}

#[test]
fn test_sample_seed_file_parses() {
    let raw = include_str!("../../../data/seed.yaml");
    let seed: SeedFile = serde_yaml::from_str(raw).unwrap();

    assert!(!seed.products.is_empty());
    assert!(!seed.events.is_empty());
    assert!(seed.events.iter().all(|event| event.booked_count == 0));
    assert!(seed.events.iter().all(|event| event.capacity > 0));
}

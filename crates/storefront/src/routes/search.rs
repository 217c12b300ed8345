//! Search route handler.
//!
//! One page searches wines and events together. Wine-only filters (category,
//! vintage, grape, price) narrow the wine results; the event type narrows
//! the event results.

use std::fmt::Display;
use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use portell_core::catalog::{self, EventQuery, EventSort, Facets, ProductQuery, ProductSort};
use portell_core::{EventType, ProductCategory};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::i18n::Labels;
use crate::middleware::ClientState;
use crate::routes::events::active_events;
use crate::routes::shop::{active_products, product_sorts};
use crate::state::AppState;
use crate::views::{Chrome, Choice, EventCard, ProductCard};

/// Deserialize empty strings as None for optional parsed fields.
fn empty_string_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Which result kinds to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchScope {
    #[default]
    Everything,
    Wines,
    Events,
}

impl SearchScope {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("wines") => Self::Wines,
            Some("events") => Self::Events,
            _ => Self::Everything,
        }
    }

    const fn code(self) -> &'static str {
        match self {
            Self::Everything => "all",
            Self::Wines => "wines",
            Self::Events => "events",
        }
    }
}

/// Search page query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub scope: Option<String>,
    pub category: Option<String>,
    pub wine_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub vintage: Option<i32>,
    pub grape_variety: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub price_min: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub price_max: Option<Decimal>,
    pub event_type: Option<String>,
    pub sort: Option<String>,
}

/// Search page template.
#[derive(Template, WebTemplate)]
#[template(path = "search/index.html")]
pub struct SearchTemplate {
    pub chrome: Chrome,
    pub q: String,
    pub scopes: Vec<Choice>,
    pub categories: Vec<Choice>,
    pub wine_types: Vec<Choice>,
    pub vintages: Vec<Choice>,
    pub grape_varieties: Vec<Choice>,
    pub event_types: Vec<Choice>,
    pub sorts: Vec<Choice>,
    pub price_min: String,
    pub price_max: String,
    pub products: Vec<ProductCard>,
    pub events: Vec<EventCard>,
    pub show_products: bool,
    pub show_events: bool,
    pub total: usize,
}

/// Display the search page.
#[instrument(skip(state, client))]
pub async fn index(
    State(state): State<AppState>,
    client: ClientState,
    Query(params): Query<SearchQuery>,
) -> Result<SearchTemplate> {
    let lang = client.language();
    let t = Labels::for_lang(lang);
    let scope = SearchScope::parse(params.scope.as_deref());
    let search = Some(params.q.trim().to_owned()).filter(|q| !q.is_empty());

    let product_query = ProductQuery {
        search: search.clone(),
        category: catalog::selected(params.category.as_deref())
            .and_then(|code| code.parse::<ProductCategory>().ok()),
        wine_type: catalog::selected(params.wine_type.as_deref()).map(str::to_owned),
        vintage: params.vintage,
        grape_variety: catalog::selected(params.grape_variety.as_deref()).map(str::to_owned),
        price_min: params.price_min,
        price_max: params.price_max,
        sort: ProductSort::parse(params.sort.as_deref()),
    };
    let event_query = EventQuery {
        search,
        event_type: catalog::selected(params.event_type.as_deref())
            .and_then(|code| code.parse::<EventType>().ok()),
        sort: EventSort::parse(params.sort.as_deref()),
    };

    let all_products = active_products(&state).await?;
    let facets = Facets::collect(&all_products);
    let show_products = scope != SearchScope::Events;
    let show_events = scope != SearchScope::Wines;

    let products: Vec<ProductCard> = if show_products {
        product_query
            .apply(all_products)
            .iter()
            .map(|p| ProductCard::new(p, lang))
            .collect()
    } else {
        Vec::new()
    };
    let events: Vec<EventCard> = if show_events {
        event_query
            .apply(active_events(&state).await?)
            .iter()
            .map(|e| EventCard::new(e, lang))
            .collect()
    } else {
        Vec::new()
    };

    let with_all = |choices: Vec<Choice>, current: &str| {
        let mut out = vec![Choice::new(catalog::ALL, t.all, current)];
        out.extend(choices);
        out
    };
    let current_category = product_query.category.map_or(catalog::ALL, ProductCategory::code);
    let current_wine_type = product_query.wine_type.as_deref().unwrap_or(catalog::ALL);
    let current_vintage = product_query
        .vintage
        .map_or_else(|| catalog::ALL.to_owned(), |v| v.to_string());
    let current_grape = product_query.grape_variety.as_deref().unwrap_or(catalog::ALL);
    let current_event_type = event_query.event_type.map_or(catalog::ALL, EventType::code);

    Ok(SearchTemplate {
        chrome: Chrome::load(&client).await,
        total: products.len() + events.len(),
        scopes: [
            (SearchScope::Everything, t.everything),
            (SearchScope::Wines, t.wines),
            (SearchScope::Events, t.events),
        ]
        .into_iter()
        .map(|(s, label)| Choice::new(s.code(), label, scope.code()))
        .collect(),
        categories: with_all(
            ProductCategory::ALL
                .iter()
                .map(|c| Choice::new(c.code(), c.label(lang), current_category))
                .collect(),
            current_category,
        ),
        wine_types: with_all(
            facets
                .wine_types
                .iter()
                .map(|w| Choice::new(w.as_str(), w.as_str(), current_wine_type))
                .collect(),
            current_wine_type,
        ),
        vintages: with_all(
            facets
                .vintages
                .iter()
                .map(|v| Choice::new(v.to_string(), v.to_string(), current_vintage.as_str()))
                .collect(),
            current_vintage.as_str(),
        ),
        grape_varieties: with_all(
            facets
                .grape_varieties
                .iter()
                .map(|g| Choice::new(g.as_str(), g.as_str(), current_grape))
                .collect(),
            current_grape,
        ),
        event_types: with_all(
            EventType::ALL
                .iter()
                .map(|e| Choice::new(e.code(), e.label(lang), current_event_type))
                .collect(),
            current_event_type,
        ),
        sorts: product_sorts(t, product_query.sort),
        price_min: params.price_min.map(|p| p.to_string()).unwrap_or_default(),
        price_max: params.price_max.map(|p| p.to_string()).unwrap_or_default(),
        q: params.q,
        products,
        events,
        show_products,
        show_events,
    })
}

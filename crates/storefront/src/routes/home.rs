//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use portell_core::catalog::EventQuery;
use portell_gateway::{Criteria, SortSpec};
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::ClientState;
use crate::state::AppState;
use crate::views::{Chrome, EventCard, ProductCard};

const FEATURED_PRODUCTS: usize = 3;
const UPCOMING_EVENTS: usize = 2;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub chrome: Chrome,
    pub featured: Vec<ProductCard>,
    pub events: Vec<EventCard>,
}

/// Display the home page.
#[instrument(skip(state, client))]
pub async fn home(State(state): State<AppState>, client: ClientState) -> Result<HomeTemplate> {
    let lang = client.language();
    let gateway = state.gateway();

    let featured = gateway
        .products
        .filter(
            &Criteria::new().eq("active", true).eq("featured", true),
            &SortSpec::default(),
            Some(FEATURED_PRODUCTS),
        )
        .await?;

    let active_events = gateway
        .events
        .filter(&Criteria::new().eq("active", true), &SortSpec::asc("date"), None)
        .await?;
    let events = EventQuery::default()
        .apply(active_events)
        .iter()
        .take(UPCOMING_EVENTS)
        .map(|record| EventCard::new(record, lang))
        .collect();

    Ok(HomeTemplate {
        chrome: Chrome::load(&client).await,
        featured: featured.iter().map(|p| ProductCard::new(p, lang)).collect(),
        events,
    })
}

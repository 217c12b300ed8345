//! Event listing, detail and booking route handlers.
//!
//! Booking does not write anything: a valid form becomes an
//! [`EventReservation`](portell_core::reservation::EventReservation) in the
//! session and the visitor continues in checkout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use portell_core::catalog::{self, EventQuery};
use portell_core::models::Event;
use portell_core::recommend::{DEFAULT_LIMIT, recommend};
use portell_core::reservation::{BookingForm, reserve};
use portell_core::{EventId, EventType, Language};
use portell_gateway::{Criteria, Record, SortSpec};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::i18n::Labels;
use crate::middleware::ClientState;
use crate::state::AppState;
use crate::views::{Chrome, Choice, EventCard};

/// Event listing query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

/// Event listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "events/index.html")]
pub struct EventsIndexTemplate {
    pub chrome: Chrome,
    pub events: Vec<EventCard>,
    pub tabs: Vec<Choice>,
}

/// Event detail display data.
pub struct EventDetail {
    pub card: EventCard,
    pub duration: String,
    pub full_location: String,
}

/// Event detail page with the booking form.
#[derive(Template, WebTemplate)]
#[template(path = "events/show.html")]
pub struct EventShowTemplate {
    pub chrome: Chrome,
    pub event: EventDetail,
    pub form: BookingForm,
    pub error: Option<&'static str>,
    pub recommendations: Vec<EventCard>,
    pub recommendations_title: &'static str,
}

/// Display the event listing.
#[instrument(skip(state, client))]
pub async fn index(
    State(state): State<AppState>,
    client: ClientState,
    Query(params): Query<EventsQuery>,
) -> Result<EventsIndexTemplate> {
    let lang = client.language();
    let t = Labels::for_lang(lang);

    let query = EventQuery {
        event_type: catalog::selected(params.event_type.as_deref())
            .and_then(|code| code.parse::<EventType>().ok()),
        ..EventQuery::default()
    };
    let events = query.apply(active_events(&state).await?);

    let current = query.event_type.map_or(catalog::ALL, EventType::code);
    let mut tabs = vec![Choice::new(catalog::ALL, t.all, current)];
    tabs.extend(
        EventType::ALL
            .iter()
            .map(|kind| Choice::new(kind.code(), kind.label(lang), current)),
    );

    Ok(EventsIndexTemplate {
        chrome: Chrome::load(&client).await,
        events: events.iter().map(|e| EventCard::new(e, lang)).collect(),
        tabs,
    })
}

/// Display an event and its booking form.
///
/// # Errors
///
/// Returns 404 for unknown or inactive events.
#[instrument(skip(state, client))]
pub async fn show(
    State(state): State<AppState>,
    client: ClientState,
    Path(id): Path<String>,
) -> Result<EventShowTemplate> {
    let (id, record) = find_active(&state, &id).await?;
    let form = BookingForm {
        guests: "1".to_owned(),
        ..BookingForm::default()
    };
    event_page(&state, &client, id, &record, form, None).await
}

/// Validate the booking form and hand the reservation to checkout.
///
/// Invalid input re-renders the event page with the error above the form.
///
/// # Errors
///
/// Returns 404 for unknown or inactive events.
#[instrument(skip(state, client, form), fields(guests = %form.guests))]
pub async fn book(
    State(state): State<AppState>,
    client: ClientState,
    Path(id): Path<String>,
    Form(form): Form<BookingForm>,
) -> Result<Response> {
    let (id, record) = find_active(&state, &id).await?;
    let lang = client.language();

    match reserve(id, &record, &form, lang) {
        Ok(reservation) => {
            let id_str = id.to_string();
            add_breadcrumb(
                "booking",
                "Reservation handed to checkout",
                Some(&[("event_id", id_str.as_str())]),
            );
            client.set_checkout_item(&reservation).await?;
            client.clear_checkout().await?;
            Ok(Redirect::to("/checkout?type=event").into_response())
        }
        Err(err) => {
            tracing::debug!(event_id = %id, error = ?err, "Booking form rejected");
            let page =
                event_page(&state, &client, id, &record, form, Some(err.message(lang))).await?;
            Ok(page.into_response())
        }
    }
}

async fn event_page(
    state: &AppState,
    client: &ClientState,
    id: EventId,
    record: &Record<Event>,
    form: BookingForm,
    error: Option<&'static str>,
) -> Result<EventShowTemplate> {
    let lang = client.language();
    let t = Labels::for_lang(lang);

    let viewed = client.record_view(id).await?;
    let candidates = active_events(state).await?;
    let picked = recommend(
        candidates.iter().map(|e| (e.id, &e.data)),
        Some(id),
        &viewed,
        DEFAULT_LIMIT,
    );
    let recommendations = picked
        .iter()
        .filter_map(|picked_id| candidates.iter().find(|e| e.id == *picked_id))
        .map(|e| EventCard::new(e, lang))
        .collect();
    let recommendations_title = if viewed.ids().len() > 1 {
        t.recommended_for_you
    } else {
        t.similar_events
    };

    Ok(EventShowTemplate {
        chrome: Chrome::load(client).await,
        event: detail(record, lang),
        form,
        error,
        recommendations,
        recommendations_title,
    })
}

async fn find_active(state: &AppState, raw_id: &str) -> Result<(EventId, Record<Event>)> {
    let id: EventId = raw_id.parse().map_err(|_| AppError::not_found("/events"))?;
    let record = state
        .gateway()
        .events
        .find_optional(id)
        .await?
        .filter(|record| record.active)
        .ok_or_else(|| AppError::not_found("/events"))?;
    Ok((id, record))
}

pub(crate) async fn active_events(state: &AppState) -> Result<Vec<Record<Event>>> {
    Ok(state
        .gateway()
        .events
        .filter(&Criteria::new().eq("active", true), &SortSpec::asc("date"), None)
        .await?)
}

fn detail(record: &Record<Event>, lang: Language) -> EventDetail {
    EventDetail {
        card: EventCard::new(record, lang),
        duration: record.duration.clone(),
        full_location: record.full_location(),
    }
}

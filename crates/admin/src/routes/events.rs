//! Event management: list, create, edit, delete.
//!
//! Edits never touch `booked_count`; only checkout moves it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{NaiveDate, NaiveTime};
use portell_core::models::Event;
use portell_core::{EventId, EventType, Language};
use portell_gateway::{Record, SortSpec};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use tracing::instrument;

use super::SelectOption;
use super::dashboard::AdminUserView;
use super::forms::{self, FieldError};
use crate::{
    error::{AppError, Result},
    filters,
    middleware::RequireAdmin,
    state::AppState,
};

const EVENTS_PATH: &str = "/events";
const DEFAULT_CAPACITY: u32 = 20;

/// Event row for the list page.
#[derive(Debug, Clone)]
pub struct EventView {
    pub id: String,
    pub title: String,
    pub event_type: &'static str,
    pub date: NaiveDate,
    pub time: String,
    pub price: Decimal,
    pub booked_count: i64,
    pub capacity: i64,
    pub active: bool,
}

impl From<&Record<Event>> for EventView {
    fn from(event: &Record<Event>) -> Self {
        Self {
            id: event.id.to_string(),
            title: event.title.clone(),
            event_type: event.event_type.label(Language::En),
            date: event.date,
            time: event.time.format("%H:%M").to_string(),
            price: event.price,
            booked_count: event.booked_count,
            capacity: event.capacity,
            active: event.active,
        }
    }
}

/// Events list page template.
#[derive(Template, WebTemplate)]
#[template(path = "events/index.html")]
pub struct EventsIndexTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub events: Vec<EventView>,
}

/// Everything an editor may change on an event. Serialized as the update
/// patch, so `booked_count` is left as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDetails {
    pub title: String,
    pub title_en: String,
    pub slug: String,
    pub description: String,
    pub description_en: String,
    pub date: NaiveDate,
    #[serde(serialize_with = "wall_clock")]
    pub time: NaiveTime,
    pub duration: String,
    pub location: String,
    pub address: String,
    pub price: Decimal,
    pub capacity: i64,
    pub image_url: String,
    pub event_type: EventType,
    pub active: bool,
}

fn wall_clock<S: Serializer>(
    time: &NaiveTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&time.format("%H:%M").to_string())
}

impl EventDetails {
    /// A new event, nothing booked yet.
    #[must_use]
    pub fn into_event(self) -> Event {
        Event {
            title: self.title,
            title_en: self.title_en,
            slug: self.slug,
            description: self.description,
            description_en: self.description_en,
            date: self.date,
            time: self.time,
            duration: self.duration,
            location: self.location,
            address: self.address,
            price: self.price,
            capacity: self.capacity,
            booked_count: 0,
            image_url: self.image_url,
            event_type: self.event_type,
            active: self.active,
        }
    }
}

/// The event editor as posted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EventForm {
    pub title: String,
    pub title_en: String,
    pub slug: String,
    pub description: String,
    pub description_en: String,
    pub date: String,
    pub time: String,
    pub duration: String,
    pub location: String,
    pub address: String,
    pub price: String,
    pub capacity: String,
    pub image_url: String,
    pub event_type: String,
    pub active: Option<String>,
}

impl EventForm {
    /// Defaults for a new event: a tasting for twenty.
    fn blank() -> Self {
        Self {
            price: "0".to_owned(),
            capacity: DEFAULT_CAPACITY.to_string(),
            event_type: EventType::Tasting.code().to_owned(),
            active: Some("on".to_owned()),
            ..Self::default()
        }
    }

    fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            title_en: event.title_en.clone(),
            slug: event.slug.clone(),
            description: event.description.clone(),
            description_en: event.description_en.clone(),
            date: event.date.format("%Y-%m-%d").to_string(),
            time: event.time.format("%H:%M").to_string(),
            duration: event.duration.clone(),
            location: event.location.clone(),
            address: event.address.clone(),
            price: event.price.to_string(),
            capacity: event.capacity.to_string(),
            image_url: event.image_url.clone(),
            event_type: event.event_type.code().to_owned(),
            active: event.active.then(|| "on".to_owned()),
        }
    }

    /// Validate into event details.
    ///
    /// # Errors
    ///
    /// Returns the first field that needs correcting.
    pub fn parse(&self) -> std::result::Result<EventDetails, FieldError> {
        let title = forms::required(&self.title, "Title")?;
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| FieldError("Date must be YYYY-MM-DD".to_owned()))?;
        let time = NaiveTime::parse_from_str(self.time.trim(), "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(self.time.trim(), "%H:%M:%S"))
            .map_err(|_| FieldError("Time must be HH:MM".to_owned()))?;
        let capacity: u32 = forms::count(&self.capacity, "Capacity", DEFAULT_CAPACITY)?;
        if capacity == 0 {
            return Err(FieldError("Capacity must be at least 1".to_owned()));
        }
        let event_type = self
            .event_type
            .parse::<EventType>()
            .map_err(|_| FieldError("Pick an event type".to_owned()))?;

        Ok(EventDetails {
            slug: forms::slug_or_derived(&self.slug, &title),
            title,
            title_en: self.title_en.trim().to_owned(),
            description: self.description.trim().to_owned(),
            description_en: self.description_en.trim().to_owned(),
            date,
            time,
            duration: self.duration.trim().to_owned(),
            location: self.location.trim().to_owned(),
            address: self.address.trim().to_owned(),
            price: forms::price(&self.price, "Price")?,
            capacity: i64::from(capacity),
            image_url: self.image_url.trim().to_owned(),
            event_type,
            active: forms::checkbox(self.active.as_ref()),
        })
    }

    fn type_options(&self) -> Vec<SelectOption> {
        EventType::ALL
            .iter()
            .map(|kind| {
                SelectOption::new(kind.code(), kind.label(Language::En), &self.event_type)
            })
            .collect()
    }
}

/// Event editor template, for both new and existing events.
#[derive(Template, WebTemplate)]
#[template(path = "events/form.html")]
pub struct EventFormTemplate {
    pub admin_user: AdminUserView,
    pub current_path: String,
    pub heading: String,
    pub action: String,
    pub form: EventForm,
    pub event_types: Vec<SelectOption>,
    /// Seats already taken, shown next to capacity when editing.
    pub booked_count: Option<i64>,
    pub error: Option<String>,
}

impl EventFormTemplate {
    fn new(admin_user: AdminUserView, target: Option<(EventId, i64)>, form: EventForm) -> Self {
        let (heading, action) = match target {
            Some((id, _)) => (format!("Edit {}", form.title), format!("{EVENTS_PATH}/{id}")),
            None => ("New event".to_owned(), EVENTS_PATH.to_owned()),
        };
        Self {
            admin_user,
            current_path: EVENTS_PATH.to_string(),
            heading,
            action,
            event_types: form.type_options(),
            form,
            booked_count: target.map(|(_, booked)| booked),
            error: None,
        }
    }

    fn with_error(mut self, error: FieldError) -> Self {
        self.error = Some(error.0);
        self
    }
}

fn parse_id(id: &str) -> Result<EventId> {
    id.parse()
        .map_err(|_| AppError::NotFound(format!("event {id}")))
}

/// Events list page handler, soonest date last.
///
/// # Errors
///
/// Returns error if the gateway cannot be read.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<EventsIndexTemplate> {
    let events = state
        .gateway()
        .events
        .list(&SortSpec::desc("date"), None)
        .await?;

    Ok(EventsIndexTemplate {
        admin_user: AdminUserView::from(&admin),
        current_path: EVENTS_PATH.to_string(),
        events: events.iter().map(EventView::from).collect(),
    })
}

/// Empty editor.
#[instrument(skip(admin))]
pub async fn new_form(RequireAdmin(admin): RequireAdmin) -> EventFormTemplate {
    EventFormTemplate::new(AdminUserView::from(&admin), None, EventForm::blank())
}

/// Create an event with no seats booked.
///
/// # Errors
///
/// Returns error if the gateway write fails.
#[instrument(skip(admin, state, form), fields(title = %form.title))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<EventForm>,
) -> Result<Response> {
    let details = match form.parse() {
        Ok(details) => details,
        Err(error) => {
            let page = EventFormTemplate::new(AdminUserView::from(&admin), None, form);
            return Ok(page.with_error(error).into_response());
        }
    };

    let record = state.gateway().events.create(&details.into_event()).await?;
    tracing::info!(event_id = %record.id, "Event created");
    Ok(Redirect::to(EVENTS_PATH).into_response())
}

/// Editor filled with the stored event.
///
/// # Errors
///
/// Returns 404 for unknown events.
#[instrument(skip(admin, state))]
pub async fn edit_form(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<EventFormTemplate> {
    let id = parse_id(&id)?;
    let record = state.gateway().events.get(id).await?;
    Ok(EventFormTemplate::new(
        AdminUserView::from(&admin),
        Some((id, record.booked_count)),
        EventForm::from_event(&record),
    ))
}

/// Save edits. Capacity may not drop below the seats already booked.
///
/// # Errors
///
/// Returns 404 for unknown events.
#[instrument(skip(admin, state, form))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<EventForm>,
) -> Result<Response> {
    let id = parse_id(&id)?;
    let booked = state.gateway().events.get(id).await?.booked_count;

    let details = form.parse().and_then(|details| {
        if details.capacity < booked {
            Err(FieldError(format!(
                "Capacity cannot be lower than the {booked} seats already booked"
            )))
        } else {
            Ok(details)
        }
    });
    let details = match details {
        Ok(details) => details,
        Err(error) => {
            let page =
                EventFormTemplate::new(AdminUserView::from(&admin), Some((id, booked)), form);
            return Ok(page.with_error(error).into_response());
        }
    };

    state.gateway().events.update(id, &details).await?;
    tracing::info!(event_id = %id, "Event updated");
    Ok(Redirect::to(EVENTS_PATH).into_response())
}

/// Remove an event. Its bookings stay for the record.
///
/// # Errors
///
/// Returns 404 for unknown events.
#[instrument(skip(_admin, state))]
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let id = parse_id(&id)?;
    if !state.gateway().events.delete(id).await? {
        return Err(AppError::NotFound(format!("event {id}")));
    }
    tracing::info!(event_id = %id, "Event deleted");
    Ok(Redirect::to(EVENTS_PATH))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled() -> EventForm {
        EventForm {
            title: "Degustacja win".to_owned(),
            date: "2031-06-01".to_owned(),
            time: "18:00".to_owned(),
            price: "150".to_owned(),
            capacity: "10".to_owned(),
            event_type: "tasting".to_owned(),
            active: Some("on".to_owned()),
            ..EventForm::default()
        }
    }

    #[test]
    fn test_new_event_starts_unbooked() {
        let event = filled().parse().unwrap().into_event();
        assert_eq!(event.booked_count, 0);
        assert_eq!(event.capacity, 10);
        assert_eq!(event.slug, "degustacja-win");
        assert_eq!(event.time, NaiveTime::from_hms_opt(18, 0, 0).unwrap());
    }

    #[test]
    fn test_patch_leaves_booked_count_alone() {
        let patch = serde_json::to_value(filled().parse().unwrap()).unwrap();
        assert!(patch.get("booked_count").is_none());
        assert_eq!(patch["time"], "18:00");
        assert_eq!(patch["date"], "2031-06-01");
    }

    #[test]
    fn test_parse_rejects_bad_fields() {
        let form = EventForm {
            date: "01.06.2031".to_owned(),
            ..filled()
        };
        assert_eq!(form.parse().unwrap_err().0, "Date must be YYYY-MM-DD");

        let form = EventForm {
            capacity: "0".to_owned(),
            ..filled()
        };
        assert!(form.parse().is_err());

        let form = EventForm {
            event_type: "party".to_owned(),
            ..filled()
        };
        assert!(form.parse().is_err());
    }

    #[test]
    fn test_blank_capacity_uses_default() {
        let form = EventForm {
            capacity: String::new(),
            ..filled()
        };
        assert_eq!(form.parse().unwrap().capacity, 20);
    }
}

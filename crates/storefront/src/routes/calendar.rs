//! iCalendar downloads for events and the last booking.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use portell_core::EventId;
use portell_core::calendar::{CalendarEvent, ics_filename};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::ClientState;
use crate::services::ConfirmationKind;
use crate::state::AppState;

const ICS_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Download an `.ics` file for any active event.
///
/// # Errors
///
/// Returns 404 for unknown or inactive events.
#[instrument(skip(state, client))]
pub async fn event_ics(
    State(state): State<AppState>,
    client: ClientState,
    Path(id): Path<String>,
) -> Result<Response> {
    let id: EventId = id.parse().map_err(|_| AppError::not_found("/events"))?;
    let event = state
        .gateway()
        .events
        .find_optional(id)
        .await?
        .filter(|record| record.active)
        .ok_or_else(|| AppError::not_found("/events"))?;

    let calendar = CalendarEvent::from_event(id, &event, client.language());
    ics_attachment(&ics_filename(&event, id), &calendar)
}

/// Download an `.ics` file for the booking just confirmed.
///
/// # Errors
///
/// Returns 404 when the last checkout was not a booking.
#[instrument(skip(client))]
pub async fn confirmation_ics(client: ClientState) -> Result<Response> {
    let confirmation = client
        .last_confirmation()
        .await
        .filter(|c| c.kind == ConfirmationKind::Booking)
        .ok_or_else(|| AppError::not_found("/events"))?;
    let calendar = confirmation
        .calendar
        .as_ref()
        .ok_or_else(|| AppError::not_found("/events"))?;

    ics_attachment(&format!("portell-{}.ics", confirmation.number), calendar)
}

fn ics_attachment(filename: &str, calendar: &CalendarEvent) -> Result<Response> {
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|e| AppError::Internal(format!("invalid calendar filename {filename}: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(ICS_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        calendar.to_ics(Utc::now()),
    )
        .into_response())
}

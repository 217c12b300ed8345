//! "Add to calendar" export for booked events.
//!
//! Events are stored with a local wall-clock date and time and no zone, so
//! `DTSTART`/`DTEND` are written as floating times (no `Z`). Calendar apps
//! place them at that clock time in the reader's zone. `DTSTAMP` is the only
//! UTC value.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::models::Event;
use crate::types::{EventId, Language};

pub const PRODID: &str = "-//Portell Winery//Event Booking//EN";
const UID_DOMAIN: &str = "portell.wine";
const FLOATING: &str = "%Y%m%dT%H%M%S";
const MAX_LINE_OCTETS: usize = 75;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub uid: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl CalendarEvent {
    #[must_use]
    pub fn from_event(id: EventId, event: &Event, lang: Language) -> Self {
        let start = event.starts_at();
        Self {
            uid: format!("{id}@{UID_DOMAIN}"),
            title: event.localized_title(lang).to_owned(),
            description: event.localized_description(lang).to_owned(),
            location: event.full_location(),
            start,
            end: start + event.calendar_duration(),
        }
    }

    /// Render a single-event `VCALENDAR` with CRLF line endings.
    #[must_use]
    pub fn to_ics(&self, now: DateTime<Utc>) -> String {
        let lines = [
            "BEGIN:VCALENDAR".to_owned(),
            "VERSION:2.0".to_owned(),
            format!("PRODID:{PRODID}"),
            "CALSCALE:GREGORIAN".to_owned(),
            "METHOD:PUBLISH".to_owned(),
            "BEGIN:VEVENT".to_owned(),
            format!("UID:{}", escape_text(&self.uid)),
            format!("DTSTAMP:{}", now.format("%Y%m%dT%H%M%SZ")),
            format!("DTSTART:{}", self.start.format(FLOATING)),
            format!("DTEND:{}", self.end.format(FLOATING)),
            format!("SUMMARY:{}", escape_text(&self.title)),
            format!("DESCRIPTION:{}", escape_text(&self.description)),
            format!("LOCATION:{}", escape_text(&self.location)),
            "STATUS:CONFIRMED".to_owned(),
            "END:VEVENT".to_owned(),
            "END:VCALENDAR".to_owned(),
        ];

        let mut out = String::new();
        for line in &lines {
            fold_into(&mut out, line);
        }
        out
    }

    #[must_use]
    pub fn google_url(&self) -> String {
        let dates = format!(
            "{}/{}",
            self.start.format(FLOATING),
            self.end.format(FLOATING)
        );
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("action", "TEMPLATE")
            .append_pair("text", &self.title)
            .append_pair("dates", &dates)
            .append_pair("details", &self.description)
            .append_pair("location", &self.location)
            .finish();
        format!("https://calendar.google.com/calendar/render?{query}")
    }

    #[must_use]
    pub fn outlook_url(&self) -> String {
        let iso = "%Y-%m-%dT%H:%M:%S";
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("path", "/calendar/action/compose")
            .append_pair("rru", "addevent")
            .append_pair("subject", &self.title)
            .append_pair("body", &self.description)
            .append_pair("location", &self.location)
            .append_pair("startdt", &self.start.format(iso).to_string())
            .append_pair("enddt", &self.end.format(iso).to_string())
            .finish();
        format!("https://outlook.live.com/calendar/0/deeplink/compose?{query}")
    }

    #[must_use]
    pub fn yahoo_url(&self) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("v", "60")
            .append_pair("title", &self.title)
            .append_pair("desc", &self.description)
            .append_pair("in_loc", &self.location)
            .append_pair("st", &self.start.format(FLOATING).to_string())
            .append_pair("et", &self.end.format(FLOATING).to_string())
            .finish();
        format!("https://calendar.yahoo.com/?{query}")
    }
}

/// Download name for an event's `.ics` file.
#[must_use]
pub fn ics_filename(event: &Event, id: EventId) -> String {
    let slug = event.slug.trim();
    if slug.is_empty() {
        format!("portell-event-{id}.ics")
    } else {
        format!("portell-event-{slug}.ics")
    }
}

/// RFC 5545 TEXT escaping.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Append `line` followed by CRLF, folding at 75 octets without splitting
/// a UTF-8 sequence.
fn fold_into(out: &mut String, line: &str) {
    let mut used = 0;
    for c in line.chars() {
        let width = c.len_utf8();
        if used + width > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            used = 1;
        }
        out.push(c);
        used += width;
    }
    out.push_str("\r\n");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::event::tests::tasting;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn june_first() -> CalendarEvent {
        let mut event = tasting(20, 0);
        event.address = "ul. Winna 1".to_owned();
        CalendarEvent {
            uid: "fixed@portell.wine".to_owned(),
            ..CalendarEvent::from_event(EventId::new(), &event, Language::Pl)
        }
    }

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 20, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_ics_floating_times_and_default_length() {
        let ics = june_first().to_ics(stamp());
        assert!(ics.contains("DTSTART:20250601T180000\r\n"));
        assert!(ics.contains("DTEND:20250601T200000\r\n"));
        assert!(ics.contains("DTSTAMP:20250520T093000Z\r\n"));
        assert!(ics.contains("PRODID:-//Portell Winery//Event Booking//EN\r\n"));
        assert!(ics.contains("LOCATION:Winnica Portell\\, ul. Winna 1\r\n"));
        assert!(ics.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(ics.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn test_ics_uses_parsed_duration() {
        let mut event = tasting(20, 0);
        event.duration = "3 godziny".to_owned();
        let cal = CalendarEvent::from_event(EventId::new(), &event, Language::Pl);
        assert_eq!(cal.end - cal.start, Duration::hours(3));
        assert!(cal.to_ics(stamp()).contains("DTEND:20250601T210000"));
    }

    #[test]
    fn test_end_rolls_over_midnight() {
        let mut event = tasting(20, 0);
        event.time = chrono::NaiveTime::from_hms_opt(23, 0, 0).unwrap();
        let cal = CalendarEvent::from_event(EventId::new(), &event, Language::Pl);
        assert_eq!(
            cal.end.date(),
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
        );
    }

    #[test]
    fn test_ics_escapes_text() {
        let mut cal = june_first();
        cal.description = "Wina; sery, chleb\nI muzyka".to_owned();
        let ics = cal.to_ics(stamp());
        assert!(ics.contains("DESCRIPTION:Wina\\; sery\\, chleb\\nI muzyka\r\n"));
    }

    #[test]
    fn test_long_lines_are_folded() {
        let mut cal = june_first();
        cal.description = "ż".repeat(60);
        let ics = cal.to_ics(stamp());
        for line in ics.split("\r\n") {
            assert!(line.len() <= 75, "line too long: {line}");
        }
        assert!(ics.contains("\r\n ż"));
    }

    #[test]
    fn test_google_url() {
        let url = june_first().google_url();
        assert!(url.starts_with("https://calendar.google.com/calendar/render?action=TEMPLATE"));
        assert!(url.contains("dates=20250601T180000%2F20250601T200000"));
        assert!(url.contains("text=Degustacja+win"));
    }

    #[test]
    fn test_outlook_and_yahoo_urls() {
        let cal = june_first();
        let outlook = cal.outlook_url();
        assert!(outlook.contains("rru=addevent"));
        assert!(outlook.contains("startdt=2025-06-01T18%3A00%3A00"));
        let yahoo = cal.yahoo_url();
        assert!(yahoo.starts_with("https://calendar.yahoo.com/?v=60"));
        assert!(yahoo.contains("st=20250601T180000"));
        assert!(yahoo.contains("et=20250601T200000"));
    }

    #[test]
    fn test_filename_prefers_slug() {
        let id = EventId::new();
        let mut event = tasting(20, 0);
        assert_eq!(ics_filename(&event, id), "portell-event-degustacja.ics");
        event.slug.clear();
        assert_eq!(ics_filename(&event, id), format!("portell-event-{id}.ics"));
    }
}

//! Bookable winery events: tastings, dinners, workshops.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{EventType, Language};

/// Spots left at which an event is flagged "almost full".
pub const ALMOST_FULL_THRESHOLD: i64 = 5;

/// Calendar length used when an event has no parseable duration.
pub const DEFAULT_EVENT_HOURS: i64 = 2;

/// A scheduled event with limited capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    #[serde(default)]
    pub title_en: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_en: String,
    pub date: NaiveDate,
    #[serde(with = "wall_clock")]
    pub time: NaiveTime,
    /// Free-form, e.g. "2 hours", "3h", "1:30".
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub address: String,
    pub price: Decimal,
    pub capacity: i64,
    #[serde(default)]
    pub booked_count: i64,
    #[serde(default)]
    pub image_url: String,
    pub event_type: EventType,
    #[serde(default = "default_true")]
    pub active: bool,
}

const fn default_true() -> bool {
    true
}

/// Remaining capacity of an event at the moment it was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Availability {
    pub spots_left: i64,
    pub is_full: bool,
    pub is_almost_full: bool,
}

impl Event {
    #[must_use]
    pub fn localized_title(&self, lang: Language) -> &str {
        lang.pick(&self.title, &self.title_en)
    }

    #[must_use]
    pub fn localized_description(&self, lang: Language) -> &str {
        lang.pick(&self.description, &self.description_en)
    }

    /// `spots_left` may go negative when the counter was overrun by
    /// concurrent bookings; such an event still reports full.
    #[must_use]
    pub const fn availability(&self) -> Availability {
        let spots_left = self.capacity - self.booked_count;
        Availability {
            spots_left,
            is_full: spots_left <= 0,
            is_almost_full: spots_left > 0 && spots_left <= ALMOST_FULL_THRESHOLD,
        }
    }

    #[must_use]
    pub const fn starts_at(&self) -> NaiveDateTime {
        NaiveDateTime::new(self.date, self.time)
    }

    /// Length used for calendar entries: the parsed `duration`, or two hours.
    #[must_use]
    pub fn calendar_duration(&self) -> Duration {
        parse_duration(&self.duration).unwrap_or_else(|| Duration::hours(DEFAULT_EVENT_HOURS))
    }

    /// Location line with the street address appended when present.
    #[must_use]
    pub fn full_location(&self) -> String {
        match (self.location.trim(), self.address.trim()) {
            (loc, "") => loc.to_owned(),
            ("", addr) => addr.to_owned(),
            (loc, addr) => format!("{loc}, {addr}"),
        }
    }
}

/// Parse a free-form duration such as `"2 hours"`, `"2,5 h"`, `"90 min"` or `"1:30"`.
///
/// Returns `None` for anything that does not yield a positive length of at
/// most one day.
#[must_use]
pub fn parse_duration(input: &str) -> Option<Duration> {
    let s = input.trim().to_lowercase();
    if s.is_empty() {
        return None;
    }

    let minutes = if let Some((h, m)) = s.split_once(':') {
        let hours: i64 = h.trim().parse().ok()?;
        let mins: i64 = m.trim().get(..2).unwrap_or(m.trim()).parse().ok()?;
        if !(0..60).contains(&mins) {
            return None;
        }
        hours.checked_mul(60)?.checked_add(mins)?
    } else {
        let numeric: String = s
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
            .collect();
        let unit = s.get(numeric.len()..).unwrap_or_default().trim_start();
        let value: Decimal = numeric.replace(',', ".").parse().ok()?;
        let per_unit = if unit.starts_with("min") { 1 } else { 60 };
        value
            .checked_mul(Decimal::from(per_unit))?
            .round()
            .try_into()
            .ok()?
    };

    (1..=24 * 60)
        .contains(&minutes)
        .then(|| Duration::minutes(minutes))
}

/// `NaiveTime` as `HH:MM`, accepting `HH:MM:SS` on input.
mod wall_clock {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let raw = raw.trim();
        NaiveTime::parse_from_str(raw, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
            .map_err(serde::de::Error::custom)
    }
}

//! Human-presentable booking confirmation codes and order numbers.

use chrono::{DateTime, Utc};
use rand::Rng;

const PREFIX: &str = "PORTELL";
const SUFFIX_LEN: usize = 9;

/// `PORTELL-EVENT-{unix millis}-{9 random base36 characters}`.
pub fn confirmation_code<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| {
            char::from_digit(rng.random_range(0..36), 36)
                .map_or('0', |c| c.to_ascii_uppercase())
        })
        .collect();
    format!("{PREFIX}-EVENT-{}-{suffix}", now.timestamp_millis())
}

/// `PORTELL-{unix millis}`.
#[must_use]
pub fn order_number(now: DateTime<Utc>) -> String {
    format!("{PREFIX}-{}", now.timestamp_millis())
}

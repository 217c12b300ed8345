//! "You might also like" events on the event page.
//!
//! Ranking is a plain scoring pass so the same inputs always give the same
//! list: events of the current event's type score 3, each recently viewed
//! event of the same type adds 1, ties go to the earlier date.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::Event;
use crate::types::{EventId, EventType};

/// How many recently viewed events the session remembers.
pub const VIEWED_HISTORY_CAP: usize = 20;

/// Default number of recommendations shown.
pub const DEFAULT_LIMIT: usize = 3;

const SAME_TYPE_AS_CURRENT: u32 = 3;
const PER_VIEWED_OF_TYPE: u32 = 1;

/// Ids of event pages the visitor opened, oldest first, without repeats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewedEvents(Vec<EventId>);

impl ViewedEvents {
    /// Remember a visit. Repeat visits are ignored; past the cap the oldest
    /// entry is dropped.
    pub fn record(&mut self, id: EventId) {
        if self.0.contains(&id) {
            return;
        }
        self.0.push(id);
        if self.0.len() > VIEWED_HISTORY_CAP {
            let excess = self.0.len() - VIEWED_HISTORY_CAP;
            self.0.drain(..excess);
        }
    }

    #[must_use]
    pub fn ids(&self) -> &[EventId] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, id: EventId) -> bool {
        self.0.contains(&id)
    }
}

/// Pick up to `limit` events to recommend.
///
/// Inactive events and `current` itself are never returned.
#[must_use]
pub fn recommend<'a, I>(
    events: I,
    current: Option<EventId>,
    viewed: &ViewedEvents,
    limit: usize,
) -> Vec<EventId>
where
    I: IntoIterator<Item = (EventId, &'a Event)>,
{
    let events: Vec<(EventId, &Event)> = events.into_iter().collect();

    let current_type = current.and_then(|id| {
        events
            .iter()
            .find(|(event_id, _)| *event_id == id)
            .map(|(_, event)| event.event_type)
    });

    let mut viewed_types: HashMap<EventType, u32> = HashMap::new();
    for (id, event) in &events {
        if viewed.contains(*id) {
            *viewed_types.entry(event.event_type).or_default() += 1;
        }
    }

    let mut scored: Vec<(u32, EventId, &Event)> = events
        .iter()
        .filter(|(id, event)| event.active && Some(*id) != current)
        .map(|(id, event)| {
            let mut score = viewed_types.get(&event.event_type).copied().unwrap_or(0)
                * PER_VIEWED_OF_TYPE;
            if current_type == Some(event.event_type) {
                score += SAME_TYPE_AS_CURRENT;
            }
            (score, *id, *event)
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.2.starts_at().cmp(&b.2.starts_at())));
    scored.into_iter().take(limit).map(|(_, id, _)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::tests::tasting;
    use chrono::Days;

    fn event(kind: EventType, days_later: u64) -> Event {
        let mut e = tasting(20, 0);
        e.event_type = kind;
        e.date = e.date + Days::new(days_later);
        e
    }

    #[test]
    fn test_history_skips_repeats_and_caps() {
        let mut viewed = ViewedEvents::default();
        let first = EventId::new();
        viewed.record(first);
        viewed.record(first);
        assert_eq!(viewed.ids().len(), 1);

        for _ in 0..VIEWED_HISTORY_CAP {
            viewed.record(EventId::new());
        }
        assert_eq!(viewed.ids().len(), VIEWED_HISTORY_CAP);
        assert!(!viewed.contains(first));
    }

    #[test]
    fn test_same_type_as_current_ranks_first() {
        let ids: Vec<EventId> = (0..4).map(|_| EventId::new()).collect();
        let events = [
            event(EventType::Tasting, 0),
            event(EventType::Dinner, 1),
            event(EventType::Tasting, 5),
            event(EventType::Tour, 2),
        ];
        let pairs = ids.iter().copied().zip(events.iter());

        let picked = recommend(pairs, Some(ids[0]), &ViewedEvents::default(), 3);
        assert_eq!(picked, [ids[2], ids[1], ids[3]]);
    }

    #[test]
    fn test_viewed_types_boost_and_inactive_are_skipped() {
        let ids: Vec<EventId> = (0..4).map(|_| EventId::new()).collect();
        let mut hidden = event(EventType::Workshop, 0);
        hidden.active = false;
        let events = [
            event(EventType::Dinner, 0),
            event(EventType::Workshop, 3),
            event(EventType::Workshop, 9),
            hidden,
        ];
        let mut viewed = ViewedEvents::default();
        viewed.record(ids[2]);

        let picked = recommend(ids.iter().copied().zip(events.iter()), None, &viewed, 3);
        assert_eq!(picked, [ids[1], ids[2], ids[0]]);
    }

    #[test]
    fn test_limit_and_empty_input() {
        let none: Vec<(EventId, &Event)> = Vec::new();
        assert!(recommend(none, None, &ViewedEvents::default(), 3).is_empty());

        let ids: Vec<EventId> = (0..5).map(|_| EventId::new()).collect();
        let events: Vec<Event> = (0..5).map(|d| event(EventType::Tour, d)).collect();
        let picked = recommend(ids.iter().copied().zip(events.iter()), None, &ViewedEvents::default(), 2);
        assert_eq!(picked, [ids[0], ids[1]]);
    }
}

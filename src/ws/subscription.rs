//! Per-connection event filter.
//!
//! Tracks which event types and players a WebSocket client wants to see
//! and provides server-side event filtering. An empty set on either axis
//! means "everything" on that axis.

use std::collections::HashSet;

use crate::domain::{Event, EventType};

/// Live-feed filter for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct EventFilter {
    event_types: HashSet<EventType>,
    player_ids: HashSet<u64>,
}

impl EventFilter {
    /// Creates a filter that passes every event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Narrows the feed to the given event types and players.
    pub fn subscribe(&mut self, event_types: &[EventType], player_ids: &[u64]) {
        self.event_types.extend(event_types.iter().copied());
        self.player_ids.extend(player_ids.iter().copied());
    }

    /// Removes event types and players from the filter.
    pub fn unsubscribe(&mut self, event_types: &[EventType], player_ids: &[u64]) {
        for event_type in event_types {
            self.event_types.remove(event_type);
        }
        for player_id in player_ids {
            self.player_ids.remove(player_id);
        }
    }

    /// Clears the filter so every event passes again.
    pub fn clear(&mut self) {
        self.event_types.clear();
        self.player_ids.clear();
    }

    /// Returns `true` if `event` passes the filter.
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        (self.event_types.is_empty() || self.event_types.contains(&event.event_type))
            && (self.player_ids.is_empty() || self.player_ids.contains(&event.player_id))
    }

    /// Returns `true` if no narrowing is active.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.event_types.is_empty() && self.player_ids.is_empty()
    }
}

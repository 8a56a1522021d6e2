//! Expiring set of event timestamps keyed by event id.

use std::collections::{BTreeSet, HashMap};

/// Event timestamps (unix seconds) for a rolling time window.
///
/// Re-inserting an event id moves it to the new timestamp. Entries older
/// than `span_secs` relative to the newest timestamp seen are evicted on
/// insert, so memory stays proportional to the event rate.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    span_secs: i64,
    by_id: HashMap<u64, i64>,
    by_time: BTreeSet<(i64, u64)>,
    newest: Option<i64>,
}

impl SlidingWindow {
    /// Creates an empty window covering `span_secs` seconds.
    #[must_use]
    pub fn new(span_secs: i64) -> Self {
        Self {
            span_secs,
            by_id: HashMap::new(),
            by_time: BTreeSet::new(),
            newest: None,
        }
    }

    /// Records `id` at `timestamp`.
    pub fn insert(&mut self, id: u64, timestamp: i64) {
        if let Some(previous) = self.by_id.insert(id, timestamp) {
            self.by_time.remove(&(previous, id));
        }
        self.by_time.insert((timestamp, id));

        let newest = self.newest.map_or(timestamp, |n| n.max(timestamp));
        self.newest = Some(newest);
        self.evict_before(newest - self.span_secs);
    }

    /// Counts entries with timestamp in `[now - span, now]`.
    #[must_use]
    pub fn count_at(&self, now: i64) -> usize {
        let from = now - self.span_secs;
        if from > now {
            return 0;
        }
        self.by_time
            .range((from, u64::MIN)..=(now, u64::MAX))
            .count()
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns `true` when no entries are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.by_id.clear();
        self.by_time.clear();
        self.newest = None;
    }

    fn evict_before(&mut self, cutoff: i64) {
        while let Some(&(timestamp, id)) = self.by_time.first() {
            if timestamp >= cutoff {
                break;
            }
            self.by_time.pop_first();
            self.by_id.remove(&id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_only_inside_window() {
        let mut window = SlidingWindow::new(60);
        window.insert(1, 1_000);
        window.insert(2, 1_030);
        window.insert(3, 1_059);
        assert_eq!(window.count_at(1_059), 3);
        assert_eq!(window.count_at(1_080), 2);
        assert_eq!(window.count_at(1_200), 0);
    }

    #[test]
    fn future_entries_are_not_counted() {
        let mut window = SlidingWindow::new(60);
        window.insert(1, 2_000);
        assert_eq!(window.count_at(1_000), 0);
    }

    #[test]
    fn reinserting_id_moves_it() {
        let mut window = SlidingWindow::new(60);
        window.insert(1, 1_000);
        window.insert(1, 1_050);
        assert_eq!(window.len(), 1);
        assert_eq!(window.count_at(1_100), 1);
    }

    #[test]
    fn old_entries_are_evicted() {
        let mut window = SlidingWindow::new(60);
        window.insert(1, 1_000);
        window.insert(2, 1_100);
        assert_eq!(window.len(), 1);
        assert_eq!(window.count_at(1_100), 1);
    }

    #[test]
    fn clear_resets() {
        let mut window = SlidingWindow::new(60);
        window.insert(1, 1_000);
        window.clear();
        assert!(window.is_empty());
        assert_eq!(window.count_at(1_000), 0);
    }
}

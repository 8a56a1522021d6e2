//! Fixed-capacity list of the most recent values.

use std::collections::VecDeque;

/// Bounded list that keeps the newest `capacity` values.
///
/// New values go to the front; pushing onto a full buffer evicts the
/// oldest value from the back, so `len() <= capacity` always holds.
#[derive(Debug, Clone)]
pub struct RecentBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RecentBuffer<T> {
    /// Creates an empty buffer. A capacity of zero is clamped to one.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Pushes a value, evicting the oldest ones beyond capacity.
    pub fn push(&mut self, value: T) {
        self.items.push_front(value);
        self.items.truncate(self.capacity);
    }

    /// Number of stored values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of stored values.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates from newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

//! Monotonic "current best" records.
//!
//! A [`TopRecord`] holds the best `(holder id, value)` pair seen so far for
//! one tracked metric. It only ever moves forward: a candidate replaces the
//! record iff its value strictly exceeds the current one, so ties keep the
//! first writer. Each record has its own mutex, which makes the
//! compare-and-replace atomic across concurrent update paths.

use parking_lot::Mutex;
use serde::Serialize;
use utoipa::ToSchema;

/// A value that can be ranked by a [`TopRecord`].
pub trait Ranked: Copy + Default + Send {
    /// Metric type compared between candidates.
    type Value: PartialOrd;

    /// Returns the metric value of this candidate.
    fn value(&self) -> Self::Value;
}

/// Best holder by event count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct TopCount {
    /// Holder id (player or game).
    pub id: u64,
    /// Number of events.
    pub count: u64,
}

impl TopCount {
    /// Creates a count candidate.
    #[must_use]
    pub const fn new(id: u64, count: u64) -> Self {
        Self { id, count }
    }
}

impl Ranked for TopCount {
    type Value = u64;

    fn value(&self) -> u64 {
        self.count
    }
}

/// Best holder by reference-currency amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct TopAmount {
    /// Holder id.
    pub id: u64,
    /// Amount in smallest units of the reference currency.
    pub amount: i64,
}

impl TopAmount {
    /// Creates an amount candidate.
    #[must_use]
    pub const fn new(id: u64, amount: i64) -> Self {
        Self { id, amount }
    }
}

impl Ranked for TopAmount {
    type Value = i64;

    fn value(&self) -> i64 {
        self.amount
    }
}

/// Mutex-guarded monotonically increasing record.
#[derive(Debug, Default)]
pub struct TopRecord<R> {
    current: Mutex<R>,
}

impl<R: Ranked> TopRecord<R> {
    /// Creates a record starting at the zero value.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: Mutex::new(R::default()),
        }
    }

    /// Replaces the record with `candidate` iff its value is strictly
    /// greater. Returns `true` when the record changed.
    pub fn offer(&self, candidate: R) -> bool {
        let mut current = self.current.lock();
        if candidate.value() > current.value() {
            *current = candidate;
            true
        } else {
            false
        }
    }

    /// Returns a copy of the current record.
    #[must_use]
    pub fn get(&self) -> R {
        *self.current.lock()
    }

    /// Resets the record to the zero value.
    pub fn clear(&self) {
        *self.current.lock() = R::default();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn starts_at_zero() {
        let record = TopRecord::<TopCount>::new();
        assert_eq!(record.get(), TopCount::default());
    }

    #[test]
    fn strictly_greater_replaces() {
        let record = TopRecord::new();
        assert!(record.offer(TopCount::new(1, 1)));
        assert!(record.offer(TopCount::new(2, 2)));
        assert_eq!(record.get(), TopCount::new(2, 2));
    }

    #[test]
    fn tie_keeps_first_writer() {
        let record = TopRecord::new();
        assert!(record.offer(TopCount::new(1, 3)));
        assert!(!record.offer(TopCount::new(2, 3)));
        assert_eq!(record.get().id, 1);
    }

    #[test]
    fn lower_value_is_ignored() {
        let record = TopRecord::new();
        record.offer(TopAmount::new(4, 1_000));
        assert!(!record.offer(TopAmount::new(5, 10)));
        assert_eq!(record.get(), TopAmount::new(4, 1_000));
    }

    #[test]
    fn zero_never_replaces_initial() {
        let record = TopRecord::<TopAmount>::new();
        assert!(!record.offer(TopAmount::new(9, 0)));
        assert_eq!(record.get().id, 0);
    }

    #[test]
    fn concurrent_writers_keep_maximum() {
        let record = Arc::new(TopRecord::<TopCount>::new());
        let handles: Vec<_> = (0..8u64)
            .map(|thread| {
                let record = Arc::clone(&record);
                std::thread::spawn(move || {
                    for count in 1..=1_000u64 {
                        record.offer(TopCount::new(thread, count + thread));
                    }
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().is_ok());
        }
        assert_eq!(record.get(), TopCount::new(7, 1_007));
    }
}

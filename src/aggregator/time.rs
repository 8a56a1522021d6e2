//! Event-rate statistics.
//!
//! Three structures are maintained per event, regardless of type:
//!
//! - a monotonic total counter,
//! - a [`SlidingWindow`] of event timestamps keyed by event id, range-counted
//!   for events per minute,
//! - a [`RecentBuffer`] of the newest [`RECENT_CAPACITY`] timestamps, whose
//!   length over 60 gives the moving average of events per second.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

use super::recent::RecentBuffer;
use super::window::SlidingWindow;
use super::{Aggregator, Snapshot, TIME_AGGREGATOR};
use crate::domain::Event;

/// Span of the events-per-minute window.
pub const WINDOW_SECS: i64 = 60;

/// Capacity of the recent-timestamp list.
pub const RECENT_CAPACITY: usize = 60;

/// Event-rate statistics at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TimeSnapshot {
    /// Events processed since the last reset.
    pub total_events: u64,
    /// Events with a timestamp in the last 60 seconds.
    pub events_per_minute: u64,
    /// Moving average of events per second, two decimals.
    pub moving_avg_per_second: f64,
}

#[derive(Debug)]
struct TimeSeries {
    window: SlidingWindow,
    recent: RecentBuffer<i64>,
}

/// Aggregates event counts over time.
#[derive(Debug)]
pub struct TimeAggregator {
    total: AtomicU64,
    series: Mutex<TimeSeries>,
}

impl TimeAggregator {
    /// Creates an aggregator in its zero state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            total: AtomicU64::new(0),
            series: Mutex::new(TimeSeries {
                window: SlidingWindow::new(WINDOW_SECS),
                recent: RecentBuffer::new(RECENT_CAPACITY),
            }),
        }
    }

    /// Computes the statistics as seen at `now`.
    #[must_use]
    pub fn stats_at(&self, now: DateTime<Utc>) -> TimeSnapshot {
        let total_events = self.total.load(Ordering::Relaxed);
        let series = self.series.lock();
        let in_window = series.window.count_at(now.timestamp());
        let recent = series.recent.len();
        drop(series);

        TimeSnapshot {
            total_events,
            events_per_minute: u64::try_from(in_window).unwrap_or(u64::MAX),
            moving_avg_per_second: moving_average(recent),
        }
    }
}

impl Default for TimeAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl Aggregator for TimeAggregator {
    fn name(&self) -> &'static str {
        TIME_AGGREGATOR
    }

    fn consume(&self, event: &Event) {
        self.total.fetch_add(1, Ordering::Relaxed);
        let timestamp = event.created_at.timestamp();
        let mut series = self.series.lock();
        series.window.insert(event.id, timestamp);
        series.recent.push(timestamp);
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::Time(self.stats_at(Utc::now()))
    }

    fn reset(&self) {
        let mut series = self.series.lock();
        self.total.store(0, Ordering::Relaxed);
        series.window.clear();
        series.recent.clear();
        tracing::debug!(aggregator = TIME_AGGREGATOR, "time series reset");
    }
}

/// `len / 60`, rounded to two decimals.
#[allow(clippy::cast_precision_loss)]
fn moving_average(len: usize) -> f64 {
    let per_second = len as f64 / 60.0;
    (per_second * 100.0).round() / 100.0
}

//! Service layer: event enrichment and publication.
//!
//! [`Publisher`] turns raw events into enriched ones, broadcasts them
//! through the [`crate::broker::SubscriptionBroker`] and answers combined
//! statistics queries from the registered aggregators.

pub mod publisher;

pub use publisher::{Publisher, RunOutcome, RunReport, StatsSnapshot};

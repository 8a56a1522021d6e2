//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::aggregator::PlayerAggregator;
use crate::service::Publisher;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Publisher, for combined and per-game statistics.
    pub publisher: Arc<Publisher>,
    /// Player aggregator, for per-player lookups.
    pub players: Arc<PlayerAggregator>,
}

impl AppState {
    /// Bundles the handles the HTTP and WebSocket layers read from.
    #[must_use]
    pub fn new(publisher: Arc<Publisher>, players: Arc<PlayerAggregator>) -> Self {
        Self { publisher, players }
    }
}

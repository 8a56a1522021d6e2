//! # casino-stats
//!
//! Casino event distribution pipeline with live statistics.
//!
//! Raw casino events (game start/stop, bets, deposits) are enriched with a
//! reference-currency amount, a player snapshot and a human-readable
//! description, then broadcast to independent aggregators that keep
//! per-player, per-game and time-series statistics. A combined snapshot is
//! served over HTTP, and a WebSocket feed streams the enriched events.
//!
//! ## Architecture
//!
//! ```text
//! Event source (source/)
//!     │ mpsc
//!     ▼
//! Publisher (service/) ── EnrichmentCache, PlayerDirectory (enrichment/)
//!     │ JSON payloads
//!     ▼
//! SubscriptionBroker (broker/)
//!     ├── PlayerAggregator ─┐
//!     ├── GameAggregator ───┼── Leaderboard (aggregator/)
//!     ├── TimeAggregator    │
//!     └── WS clients (ws/)  │
//!                           ▼
//!               REST handlers (api/)
//! ```

pub mod aggregator;
pub mod api;
pub mod app_state;
pub mod broker;
pub mod config;
pub mod domain;
pub mod enrichment;
pub mod error;
pub mod service;
pub mod source;
pub mod ws;

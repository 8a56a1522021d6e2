//! WebSocket layer: live event feed with per-connection filtering.
//!
//! The WebSocket endpoint at `/ws` forwards every enriched event on the
//! event channel and accepts commands to narrow the feed or fetch the
//! combined statistics.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;

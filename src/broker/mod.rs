//! Subscription broker: fan-out delivery and cooperative shutdown.
//!
//! ```text
//! Publisher ──publish(channel, json)──► SubscriptionBroker
//!                                          │  broadcast, one receiver each
//!                     ┌────────────────────┼────────────────────┐
//!                     ▼                    ▼                    ▼
//!              run_subscriber       run_subscriber       run_subscriber
//!              (player)             (game)               (time)
//! ```
//!
//! The shutdown sentinel travels on the same channel as events. It races
//! with any still-buffered events only in the sense that delivery order
//! per subscriber is publish order; nothing stronger is guaranteed.

pub mod fanout;
pub mod runner;
pub mod subscription;
pub mod wire;

pub use fanout::SubscriptionBroker;
pub use runner::{ExitReason, SubscriberExit, run_subscriber};
pub use subscription::{Message, Subscription};
pub use wire::{Payload, SHUTDOWN_SENTINEL, decode, encode, is_shutdown};

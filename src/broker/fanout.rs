//! Named fan-out channels plus the registry of aggregators.
//!
//! [`SubscriptionBroker`] maps channel names to [`tokio::sync::broadcast`]
//! senders. Every subscription on a channel receives every payload
//! published after it subscribed; when a receiver's ring buffer overflows
//! the oldest payloads are dropped for that receiver only.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::runner::{SubscriberExit, run_subscriber};
use super::subscription::Subscription;
use super::wire::{Payload, SHUTDOWN_SENTINEL};
use crate::aggregator::Aggregator;
use crate::error::StatsError;

/// Fan-out broker for encoded events.
#[derive(Debug)]
pub struct SubscriptionBroker {
    capacity: usize,
    channels: RwLock<HashMap<String, broadcast::Sender<Payload>>>,
    subscribers: RwLock<BTreeMap<&'static str, Arc<dyn Aggregator>>>,
}

impl SubscriptionBroker {
    /// Creates a broker whose channels buffer up to `capacity` payloads
    /// per receiver.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            channels: RwLock::new(HashMap::new()),
            subscribers: RwLock::new(BTreeMap::new()),
        }
    }

    fn sender(&self, channel: &str) -> broadcast::Sender<Payload> {
        if let Some(sender) = self.channels.read().get(channel) {
            return sender.clone();
        }
        let mut channels = self.channels.write();
        channels
            .entry(channel.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }

    /// Publishes a payload to every current subscriber of `channel`.
    ///
    /// Returns the number of receivers; with none the payload is dropped.
    pub fn publish(&self, channel: &str, payload: impl Into<Payload>) -> usize {
        self.sender(channel).send(payload.into()).unwrap_or(0)
    }

    /// Publishes the shutdown sentinel on `channel`.
    pub fn publish_shutdown(&self, channel: &str) -> usize {
        let receivers = self.publish(channel, SHUTDOWN_SENTINEL);
        tracing::info!(channel, receivers, "shutdown sentinel published");
        receivers
    }

    /// Opens a new subscription on `channel`.
    #[must_use]
    pub fn subscribe(&self, channel: &str) -> Subscription {
        Subscription::new(channel.to_string(), self.sender(channel).subscribe())
    }

    /// Current number of subscriptions on `channel`.
    #[must_use]
    pub fn receiver_count(&self, channel: &str) -> usize {
        self.channels
            .read()
            .get(channel)
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// Registers an aggregator under its own name, returning the one it
    /// replaced.
    pub fn register(&self, aggregator: Arc<dyn Aggregator>) -> Option<Arc<dyn Aggregator>> {
        let name = aggregator.name();
        let replaced = self.subscribers.write().insert(name, aggregator);
        if replaced.is_some() {
            tracing::warn!(subscriber = name, "subscriber replaced");
        }
        replaced
    }

    /// Looks up a registered aggregator.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::UnknownSubscriber`] if `name` is not registered.
    pub fn subscriber(&self, name: &str) -> Result<Arc<dyn Aggregator>, StatsError> {
        self.subscribers
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| StatsError::UnknownSubscriber(name.to_string()))
    }

    /// Names of all registered aggregators, sorted.
    #[must_use]
    pub fn subscriber_names(&self) -> Vec<&'static str> {
        self.subscribers.read().keys().copied().collect()
    }

    /// Subscribes every registered aggregator to `channel` and spawns its
    /// receive loop.
    ///
    /// Subscriptions are opened before this returns, so anything published
    /// afterwards reaches every loop. Each loop ends on the shutdown
    /// sentinel, on `cancel`, or when the channel closes.
    pub fn spawn_subscribers(
        &self,
        channel: &str,
        cancel: &CancellationToken,
    ) -> JoinSet<SubscriberExit> {
        let subscribers: Vec<Arc<dyn Aggregator>> =
            self.subscribers.read().values().cloned().collect();

        let mut set = JoinSet::new();
        for aggregator in subscribers {
            let subscription = self.subscribe(channel);
            set.spawn(run_subscriber(aggregator, subscription, cancel.clone()));
        }
        set
    }
}

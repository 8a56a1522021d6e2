//! A single subscriber's view of a broker channel.

use tokio::sync::broadcast;

use super::wire::{Payload, is_shutdown};

/// What a [`Subscription`] received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A regular payload (normally an encoded event).
    Payload(Payload),
    /// The shutdown sentinel.
    Shutdown,
    /// The receiver fell behind and this many payloads were dropped.
    Lagged(u64),
    /// The channel is closed or the subscription was cancelled.
    Closed,
}

/// Receiving end of a broker channel.
///
/// Receives every payload published after it was created, in publish
/// order. Unsubscribing drops the receiver and is idempotent.
#[derive(Debug)]
pub struct Subscription {
    channel: String,
    receiver: Option<broadcast::Receiver<Payload>>,
}

impl Subscription {
    pub(super) fn new(channel: String, receiver: broadcast::Receiver<Payload>) -> Self {
        Self {
            channel,
            receiver: Some(receiver),
        }
    }

    /// Channel this subscription listens on.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Returns `true` until [`Subscription::unsubscribe`] is called.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.receiver.is_some()
    }

    /// Waits for the next message. Cancel-safe.
    ///
    /// Returns [`Message::Closed`] immediately once unsubscribed.
    pub async fn recv(&mut self) -> Message {
        let Some(receiver) = self.receiver.as_mut() else {
            return Message::Closed;
        };
        match receiver.recv().await {
            Ok(payload) if is_shutdown(&payload) => Message::Shutdown,
            Ok(payload) => Message::Payload(payload),
            Err(broadcast::error::RecvError::Lagged(n)) => Message::Lagged(n),
            Err(broadcast::error::RecvError::Closed) => Message::Closed,
        }
    }

    /// Detaches from the channel. Returns `false` if already detached.
    pub fn unsubscribe(&mut self) -> bool {
        if self.receiver.take().is_some() {
            tracing::debug!(channel = %self.channel, "unsubscribed");
            true
        } else {
            false
        }
    }
}

//! Per-aggregator receive loop.
//!
//! Three independent conditions end the loop, whichever fires first:
//!
//! - the shutdown sentinel arrives on the channel,
//! - the cancellation token is cancelled,
//! - the channel closes.
//!
//! In every case the subscription is unsubscribed exactly once on the way
//! out; unsubscribing again later is a no-op.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::subscription::{Message, Subscription};
use super::wire::decode;
use crate::aggregator::Aggregator;

/// Why a receive loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The shutdown sentinel was received.
    Shutdown,
    /// The cancellation token fired.
    Cancelled,
    /// The channel closed.
    Closed,
}

/// Summary returned when a receive loop ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberExit {
    /// Aggregator name.
    pub name: &'static str,
    /// What ended the loop.
    pub reason: ExitReason,
    /// Events handed to the aggregator.
    pub processed: u64,
    /// Payloads dropped: undecodable or lost to lag.
    pub skipped: u64,
}

/// Feeds every event received on `subscription` into `aggregator` until
/// the sentinel, cancellation or channel closure.
///
/// The aggregator is reset once before the first receive. Payloads that
/// do not decode are logged and skipped; decoded events whose fields do not
/// match their type are logged and still aggregated. Neither ends the loop.
pub async fn run_subscriber(
    aggregator: Arc<dyn Aggregator>,
    mut subscription: Subscription,
    cancel: CancellationToken,
) -> SubscriberExit {
    let name = aggregator.name();
    aggregator.reset();
    tracing::info!(subscriber = name, channel = subscription.channel(), "subscribed");

    let mut processed = 0u64;
    let mut skipped = 0u64;

    let reason = loop {
        tokio::select! {
            () = cancel.cancelled() => break ExitReason::Cancelled,
            message = subscription.recv() => match message {
                Message::Shutdown => break ExitReason::Shutdown,
                Message::Closed => break ExitReason::Closed,
                Message::Lagged(n) => {
                    tracing::warn!(subscriber = name, lagged = n, "subscriber lagged behind broker");
                    skipped += n;
                }
                Message::Payload(payload) => match decode(&payload) {
                    Ok(event) => {
                        if !event.is_well_formed() {
                            tracing::warn!(
                                subscriber = name,
                                event_id = event.id,
                                event_type = event.event_type.as_str(),
                                "event fields do not match its type"
                            );
                        }
                        aggregator.consume(&event);
                        processed += 1;
                    }
                    Err(err) => {
                        tracing::warn!(subscriber = name, error = %err, "skipping malformed payload");
                        skipped += 1;
                    }
                },
            }
        }
    };

    subscription.unsubscribe();
    tracing::info!(subscriber = name, ?reason, processed, skipped, "subscriber stopped");

    SubscriberExit {
        name,
        reason,
        processed,
        skipped,
    }
}

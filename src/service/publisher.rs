//! Publisher: enriches raw events, broadcasts them and assembles stats.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use utoipa::ToSchema;

use crate::aggregator::{
    GAME_AGGREGATOR, GameSnapshot, PLAYER_AGGREGATOR, Snapshot, TIME_AGGREGATOR, TopCount,
};
use crate::broker::{SubscriptionBroker, encode};
use crate::domain::{Event, Player, describe};
use crate::enrichment::{EnrichmentCache, PlayerDirectory};
use crate::error::StatsError;

/// Combined statistics served on the read surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct StatsSnapshot {
    /// Player with the most bets.
    pub top_player_bet: TopCount,
    /// Player with the most deposits.
    pub top_player_deposit: TopCount,
    /// Player with the most wins.
    pub top_player_win: TopCount,
    /// Events processed by the time aggregator.
    pub total_events: u64,
    /// Events in the last 60 seconds.
    pub events_per_minute: u64,
    /// Moving average of events per second.
    pub moving_avg_per_second: f64,
}

/// How [`Publisher::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The source closed; the shutdown sentinel was broadcast.
    Exhausted,
    /// The cancellation token fired first.
    Cancelled,
}

/// Summary of a publisher run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// How the run ended.
    pub outcome: RunOutcome,
    /// Events broadcast.
    pub published: u64,
}

/// Owns the pipeline from raw event to broadcast.
///
/// Every event follows: enrich (reference amount, player, description)
/// → encode → broadcast on the event channel. Enrichment failures degrade
/// the event instead of dropping it.
#[derive(Debug)]
pub struct Publisher {
    broker: Arc<SubscriptionBroker>,
    enrichment: EnrichmentCache,
    directory: Arc<dyn PlayerDirectory>,
    channel: String,
}

impl Publisher {
    /// Creates a publisher broadcasting on `channel`.
    #[must_use]
    pub fn new(
        broker: Arc<SubscriptionBroker>,
        enrichment: EnrichmentCache,
        directory: Arc<dyn PlayerDirectory>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            broker,
            enrichment,
            directory,
            channel: channel.into(),
        }
    }

    /// Returns the broker events are published to.
    #[must_use]
    pub fn broker(&self) -> &Arc<SubscriptionBroker> {
        &self.broker
    }

    /// Returns the event channel name.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Fills the derived fields of a raw event.
    ///
    /// A failed conversion leaves `amount_in_reference` unset; a failed
    /// player lookup leaves the zero player. Both are logged.
    pub async fn enrich(&self, mut event: Event) -> Event {
        if event.event_type.is_monetary()
            && let (Some(amount), Some(currency)) = (event.amount, event.currency)
        {
            match self.enrichment.to_reference(currency, amount).await {
                Ok(reference) => event.amount_in_reference = Some(reference),
                Err(err) => {
                    tracing::warn!(
                        event_id = event.id,
                        %currency,
                        error = %err,
                        "currency conversion failed, reference amount left unset"
                    );
                }
            }
        }

        match self.directory.find(event.player_id).await {
            Ok(player) => event.player = player,
            Err(err) => {
                tracing::warn!(
                    event_id = event.id,
                    player_id = event.player_id,
                    error = %err,
                    "player lookup failed"
                );
                event.player = Player::default();
            }
        }

        event.description = describe(&event);
        event
    }

    /// Enriches and broadcasts one event.
    ///
    /// Returns the number of subscribers that received it. If the
    /// enriched event cannot be encoded, the raw event is sent instead.
    pub async fn publish(&self, event: Event) -> usize {
        let event = self.enrich(event).await;

        let payload = match encode(&event) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(event_id = event.id, error = %err, "failed to encode enriched event");
                let raw = Event {
                    amount_in_reference: None,
                    player: Player::default(),
                    description: String::new(),
                    ..event
                };
                match encode(&raw) {
                    Ok(payload) => payload,
                    Err(err) => {
                        tracing::error!(event_id = raw.id, error = %err, "dropping unencodable event");
                        return 0;
                    }
                }
            }
        };

        let receivers = self.broker.publish(&self.channel, payload);
        tracing::debug!(event_id = event.id, receivers, description = %event.description, "event published");
        receivers
    }

    /// Publishes every event from `source` until it closes or `cancel`
    /// fires.
    ///
    /// When the source is exhausted the shutdown sentinel is broadcast so
    /// every subscriber loop can finish. On cancellation no sentinel is
    /// sent; subscribers observe the same token.
    pub async fn run(&self, mut source: mpsc::Receiver<Event>, cancel: &CancellationToken) -> RunReport {
        tracing::info!(channel = %self.channel, "publishing started");
        let mut published = 0u64;

        let outcome = loop {
            let event = tokio::select! {
                () = cancel.cancelled() => break RunOutcome::Cancelled,
                next = source.recv() => match next {
                    Some(event) => event,
                    None => break RunOutcome::Exhausted,
                },
            };

            tokio::select! {
                () = cancel.cancelled() => break RunOutcome::Cancelled,
                _ = self.publish(event) => published += 1,
            }
        };

        if outcome == RunOutcome::Exhausted {
            self.broker.publish_shutdown(&self.channel);
        }
        tracing::info!(?outcome, published, "publishing finished");

        RunReport { outcome, published }
    }

    /// Assembles the combined statistics from the player and time
    /// aggregators.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::UnknownSubscriber`] if an aggregator is not
    /// registered and [`StatsError::Internal`] if one answers with an
    /// unexpected snapshot kind.
    pub fn get_stats(&self) -> Result<StatsSnapshot, StatsError> {
        let players = match self.snapshot_of(PLAYER_AGGREGATOR)? {
            Snapshot::Player(players) => players,
            other => return Err(unexpected_snapshot(PLAYER_AGGREGATOR, &other)),
        };
        let time = match self.snapshot_of(TIME_AGGREGATOR)? {
            Snapshot::Time(time) => time,
            other => return Err(unexpected_snapshot(TIME_AGGREGATOR, &other)),
        };

        Ok(StatsSnapshot {
            top_player_bet: players.top_player_bet,
            top_player_deposit: players.top_player_deposit,
            top_player_win: players.top_player_win,
            total_events: time.total_events,
            events_per_minute: time.events_per_minute,
            moving_avg_per_second: time.moving_avg_per_second,
        })
    }

    /// Returns the game aggregator's snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`Publisher::get_stats`].
    pub fn game_stats(&self) -> Result<GameSnapshot, StatsError> {
        match self.snapshot_of(GAME_AGGREGATOR)? {
            Snapshot::Game(games) => Ok(games),
            other => Err(unexpected_snapshot(GAME_AGGREGATOR, &other)),
        }
    }

    fn snapshot_of(&self, name: &str) -> Result<Snapshot, StatsError> {
        Ok(self.broker.subscriber(name)?.snapshot())
    }
}

fn unexpected_snapshot(name: &str, snapshot: &Snapshot) -> StatsError {
    tracing::warn!(
        subscriber = name,
        kind = snapshot.kind(),
        "subscriber returned an unexpected snapshot kind"
    );
    StatsError::Internal(format!("unexpected snapshot from {name}"))
}

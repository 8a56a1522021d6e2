//! Random event generator.
//!
//! Produces events that always pass [`Event::is_well_formed`]: game
//! events carry a known game id, monetary events carry an amount and a
//! currency, and only bets carry `has_won`.

use std::ops::RangeInclusive;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::domain::game::GAMES;
use crate::domain::{Currency, Event, EventType};

const EVENT_TYPES: [EventType; 4] = [
    EventType::GameStart,
    EventType::Bet,
    EventType::Deposit,
    EventType::GameStop,
];

/// Generator settings.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Events to produce before closing the channel. `0` means unbounded.
    pub events: u64,
    /// Delay between two events.
    pub interval: Duration,
    /// Player ids to draw from.
    pub players: RangeInclusive<u64>,
    /// Amounts (in smallest currency units) to draw from.
    pub amounts: RangeInclusive<i64>,
    /// Probability that a bet is a win.
    pub win_probability: f64,
    /// Buffer of the output channel.
    pub buffer: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            events: 0,
            interval: Duration::from_millis(50),
            players: 1..=20,
            amounts: 100..=50_000,
            win_probability: 0.3,
            buffer: 64,
        }
    }
}

/// Stateful random event factory.
#[derive(Debug)]
pub struct EventGenerator {
    rng: StdRng,
    next_id: u64,
    config: GeneratorConfig,
}

impl EventGenerator {
    /// Creates a generator seeded from the operating system.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a reproducible generator.
    #[must_use]
    pub fn seeded(config: GeneratorConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GeneratorConfig, rng: StdRng) -> Self {
        Self {
            rng,
            next_id: 1,
            config,
        }
    }

    /// Produces the next event, timestamped now.
    pub fn next_event(&mut self) -> Event {
        let id = self.next_id;
        self.next_id += 1;

        let player_id = self.rng.gen_range(self.config.players.clone());
        let now = Utc::now();
        let event_type = EVENT_TYPES
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(EventType::GameStart);

        match event_type {
            EventType::GameStart => Event::game_start(id, player_id, self.game(), now),
            EventType::GameStop => Event::game_stop(id, player_id, self.game(), now),
            EventType::Bet => {
                let game = self.game();
                let amount = self.amount();
                let currency = self.currency();
                let has_won = self.rng.gen_bool(self.config.win_probability.clamp(0.0, 1.0));
                Event::bet(id, player_id, game, amount, currency, has_won, now)
            }
            EventType::Deposit => {
                let amount = self.amount();
                let currency = self.currency();
                Event::deposit(id, player_id, amount, currency, now)
            }
        }
    }

    fn game(&mut self) -> u64 {
        GAMES.choose(&mut self.rng).map_or(GAMES[0].0, |(id, _)| *id)
    }

    fn amount(&mut self) -> i64 {
        self.rng.gen_range(self.config.amounts.clone())
    }

    fn currency(&mut self) -> Currency {
        Currency::ALL
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Currency::REFERENCE)
    }
}

/// Spawns a task feeding generated events into a bounded channel.
///
/// The channel closes after the configured number of events, when
/// `cancel` fires, or when the receiver is dropped.
pub fn spawn(
    config: GeneratorConfig,
    cancel: CancellationToken,
) -> (mpsc::Receiver<Event>, JoinHandle<u64>) {
    let (tx, rx) = mpsc::channel(config.buffer.max(1));
    let handle = tokio::spawn(produce(EventGenerator::new(config), tx, cancel));
    (rx, handle)
}

/// Drives `generator` into `tx`. Returns the number of events sent.
pub async fn produce(
    mut generator: EventGenerator,
    tx: mpsc::Sender<Event>,
    cancel: CancellationToken,
) -> u64 {
    let limit = generator.config.events;
    let interval = generator.config.interval;
    let mut sent = 0u64;

    while limit == 0 || sent < limit {
        if sent > 0 && !interval.is_zero() {
            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(interval) => {}
            }
        }

        let event = generator.next_event();
        tokio::select! {
            () = cancel.cancelled() => break,
            result = tx.send(event) => {
                if result.is_err() {
                    tracing::debug!("event receiver dropped");
                    break;
                }
                sent += 1;
            }
        }
    }

    tracing::info!(sent, "event source exhausted");
    sent
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::game_title;
    use crate::domain::game::UNKNOWN_GAME;

    fn quick(events: u64) -> GeneratorConfig {
        GeneratorConfig {
            events,
            interval: Duration::ZERO,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn generated_events_are_well_formed() {
        let mut generator = EventGenerator::seeded(quick(0), 42);
        for _ in 0..500 {
            let event = generator.next_event();
            assert!(event.is_well_formed(), "ill-formed event {event:?}");
            assert!((1..=20).contains(&event.player_id));
            if let Some(game) = event.game_id {
                assert_ne!(game_title(game), UNKNOWN_GAME);
            }
        }
    }

    #[test]
    fn ids_are_sequential() {
        let mut generator = EventGenerator::seeded(quick(0), 7);
        let ids: Vec<u64> = (0..5).map(|_| generator.next_event().id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn seeded_generators_agree() {
        let mut a = EventGenerator::seeded(quick(0), 9);
        let mut b = EventGenerator::seeded(quick(0), 9);
        for _ in 0..20 {
            let (x, y) = (a.next_event(), b.next_event());
            assert_eq!((x.event_type, x.player_id, x.amount), (y.event_type, y.player_id, y.amount));
        }
    }

    #[tokio::test]
    async fn bounded_source_closes_channel() {
        let (mut rx, handle) = spawn(quick(10), CancellationToken::new());
        let mut received = 0;
        while rx.recv().await.is_some() {
            received += 1;
        }
        assert_eq!(received, 10);
        let Ok(sent) = handle.await else {
            panic!("generator task panicked");
        };
        assert_eq!(sent, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_source_stops_on_cancel() {
        let cancel = CancellationToken::new();
        let config = GeneratorConfig {
            interval: Duration::from_millis(10),
            ..GeneratorConfig::default()
        };
        let (mut rx, handle) = spawn(config, cancel.clone());

        for _ in 0..3 {
            assert!(rx.recv().await.is_some());
        }
        cancel.cancel();
        let Ok(sent) = handle.await else {
            panic!("generator task panicked");
        };
        assert!(sent >= 3);
        while rx.recv().await.is_some() {}
    }
}

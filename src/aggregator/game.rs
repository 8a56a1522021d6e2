//! Per-game play counts and stakes.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use super::leaderboard::Leaderboard;
use super::top_record::{TopAmount, TopCount};
use super::{Aggregator, GAME_AGGREGATOR, Snapshot};
use crate::domain::{Currency, Event, EventType, game_title};

/// Running statistics for one game.
///
/// Created lazily on the first event referencing the game and kept for
/// the lifetime of the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameStatistics {
    /// Game id.
    pub id: u64,
    /// Catalog title.
    pub title: String,
    /// Number of `game_stop` events.
    pub play_count: u64,
    /// Total staked per currency, in display units.
    pub bet_per_currency: BTreeMap<Currency, f64>,
    /// Total staked in smallest units of the reference currency, saturating
    /// at `i64::MAX`.
    pub staked_reference: i64,
}

impl GameStatistics {
    /// Creates an empty row for `id`.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            title: game_title(id).to_string(),
            play_count: 0,
            bet_per_currency: BTreeMap::new(),
            staked_reference: 0,
        }
    }
}

/// Per-game rows plus game superlatives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSnapshot {
    /// Every game seen, ordered by id.
    pub games: Vec<GameStatistics>,
    /// Game with the most completed plays.
    pub most_played_game: TopCount,
    /// Game holding the largest single bet in the reference currency.
    pub most_betted_game: TopAmount,
}

/// Aggregates plays and stakes per game.
#[derive(Debug)]
pub struct GameAggregator {
    games: Mutex<HashMap<u64, GameStatistics>>,
    leaderboard: Arc<Leaderboard>,
}

enum GameUpdate {
    Played(u64),
    Staked(i64),
    None,
}

impl GameAggregator {
    /// Creates an aggregator reporting into `leaderboard`.
    #[must_use]
    pub fn new(leaderboard: Arc<Leaderboard>) -> Self {
        Self {
            games: Mutex::new(HashMap::new()),
            leaderboard,
        }
    }

    /// Returns a copy of one game's statistics.
    #[must_use]
    pub fn game(&self, game_id: u64) -> Option<GameStatistics> {
        self.games.lock().get(&game_id).cloned()
    }
}

impl Aggregator for GameAggregator {
    fn name(&self) -> &'static str {
        GAME_AGGREGATOR
    }

    fn consume(&self, event: &Event) {
        // Deposits are not tied to a game.
        let Some(game_id) = event.game_id else {
            return;
        };

        let update = {
            let mut games = self.games.lock();
            let stats = games
                .entry(game_id)
                .or_insert_with(|| GameStatistics::new(game_id));

            match event.event_type {
                EventType::GameStop => {
                    stats.play_count = stats.play_count.saturating_add(1);
                    GameUpdate::Played(stats.play_count)
                }
                EventType::Bet => {
                    if let (Some(amount), Some(currency)) = (event.amount, event.currency) {
                        *stats.bet_per_currency.entry(currency).or_insert(0.0) +=
                            currency.to_display_units(amount);
                    }
                    let stake = event.reference_amount();
                    stats.staked_reference = stats.staked_reference.saturating_add(stake);
                    GameUpdate::Staked(stake)
                }
                EventType::GameStart | EventType::Deposit => GameUpdate::None,
            }
        };

        match update {
            GameUpdate::Played(count) => {
                self.leaderboard
                    .most_played_game
                    .offer(TopCount::new(game_id, count));
            }
            GameUpdate::Staked(amount) => {
                self.leaderboard
                    .most_betted_game
                    .offer(TopAmount::new(game_id, amount));
            }
            GameUpdate::None => {}
        }
    }

    fn snapshot(&self) -> Snapshot {
        let mut games: Vec<GameStatistics> = self.games.lock().values().cloned().collect();
        games.sort_by_key(|g| g.id);
        Snapshot::Game(GameSnapshot {
            games,
            most_played_game: self.leaderboard.most_played_game.get(),
            most_betted_game: self.leaderboard.most_betted_game.get(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn aggregator() -> GameAggregator {
        GameAggregator::new(Arc::new(Leaderboard::new()))
    }

    fn game_snapshot(agg: &GameAggregator) -> GameSnapshot {
        let Snapshot::Game(snap) = agg.snapshot() else {
            panic!("expected game snapshot");
        };
        snap
    }

    #[test]
    fn three_stops_make_most_played() {
        let agg = aggregator();
        for id in 1..=3 {
            agg.consume(&Event::game_stop(id, 1, 3, Utc::now()));
        }
        assert_eq!(game_snapshot(&agg).most_played_game, TopCount::new(3, 3));
    }

    #[test]
    fn created_lazily_on_first_reference() {
        let agg = aggregator();
        assert!(agg.game(101).is_none());
        agg.consume(&Event::game_start(1, 1, 101, Utc::now()));
        let Some(stats) = agg.game(101) else {
            panic!("game 101 should exist");
        };
        assert_eq!(stats.play_count, 0);
        assert_eq!(stats.title, "Book of Cats");
    }

    #[test]
    fn bets_accumulate_in_display_units() {
        let agg = aggregator();
        let mut bet = Event::bet(1, 1, 101, 250, Currency::Usd, false, Utc::now());
        bet.amount_in_reference = Some(230);
        agg.consume(&bet);
        agg.consume(&bet);
        let mut btc = Event::bet(2, 1, 101, 1_000, Currency::Btc, false, Utc::now());
        btc.amount_in_reference = Some(40);
        agg.consume(&btc);

        let Some(stats) = agg.game(101) else {
            panic!("game 101 should exist");
        };
        let usd = stats.bet_per_currency.get(&Currency::Usd).copied().unwrap_or_default();
        assert!((usd - 5.0).abs() < 1e-9);
        let btc_total = stats.bet_per_currency.get(&Currency::Btc).copied().unwrap_or_default();
        assert!((btc_total - 0.000_01).abs() < 1e-12);
        assert_eq!(stats.staked_reference, 500);
        assert_eq!(game_snapshot(&agg).most_betted_game, TopAmount::new(101, 230));
    }

    #[test]
    fn largest_single_bet_beats_larger_total() {
        let agg = aggregator();
        for (id, game, stake) in [(1, 101, 600), (2, 101, 600), (3, 102, 1_000)] {
            let mut bet = Event::bet(id, 1, game, stake, Currency::Eur, false, Utc::now());
            bet.amount_in_reference = Some(stake);
            agg.consume(&bet);
        }

        let snap = game_snapshot(&agg);
        assert_eq!(snap.most_betted_game, TopAmount::new(102, 1_000));
        assert_eq!(snap.games[0].staked_reference, 1_200);
    }

    #[test]
    fn huge_stakes_saturate() {
        let agg = aggregator();
        let mut bet = Event::bet(1, 1, 101, 1, Currency::Eur, false, Utc::now());
        bet.amount_in_reference = Some(i64::MAX);
        agg.consume(&bet);
        agg.consume(&bet);

        let Some(stats) = agg.game(101) else {
            panic!("game 101 should exist");
        };
        assert_eq!(stats.staked_reference, i64::MAX);
    }

    #[test]
    fn deposits_are_ignored() {
        let agg = aggregator();
        agg.consume(&Event::deposit(1, 1, 100, Currency::Eur, Utc::now()));
        assert!(game_snapshot(&agg).games.is_empty());
    }

    #[test]
    fn snapshot_orders_games_by_id() {
        let agg = aggregator();
        for game in [105, 101, 103] {
            agg.consume(&Event::game_start(1, 1, game, Utc::now()));
        }
        let ids: Vec<u64> = game_snapshot(&agg).games.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![101, 103, 105]);
    }
}

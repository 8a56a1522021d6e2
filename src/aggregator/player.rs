//! Per-player bet, deposit and win counters.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::Serialize;

use super::leaderboard::Leaderboard;
use super::top_record::TopCount;
use super::{Aggregator, PLAYER_AGGREGATOR, Snapshot};
use crate::domain::{Event, EventType};

/// Running counters for one player.
///
/// Every field is atomic so increments from concurrent callers are never
/// lost; amounts are in smallest units of the reference currency.
#[derive(Debug, Default)]
pub struct PlayerStatistics {
    bet_count: AtomicU64,
    bet_amount: AtomicI64,
    deposit_count: AtomicU64,
    deposit_amount: AtomicI64,
    win_count: AtomicU64,
}

impl PlayerStatistics {
    fn record_bet(&self, amount: i64) -> u64 {
        self.bet_amount.fetch_add(amount, Ordering::Relaxed);
        self.bet_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn record_deposit(&self, amount: i64) -> u64 {
        self.deposit_amount.fetch_add(amount, Ordering::Relaxed);
        self.deposit_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn record_win(&self) -> u64 {
        self.win_count.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Copies the current counter values.
    #[must_use]
    pub fn counters(&self) -> PlayerCounters {
        PlayerCounters {
            bet_count: self.bet_count.load(Ordering::Relaxed),
            bet_amount: self.bet_amount.load(Ordering::Relaxed),
            deposit_count: self.deposit_count.load(Ordering::Relaxed),
            deposit_amount: self.deposit_amount.load(Ordering::Relaxed),
            win_count: self.win_count.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of a player's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlayerCounters {
    /// Number of bets.
    pub bet_count: u64,
    /// Total bet amount in the reference currency.
    pub bet_amount: i64,
    /// Number of deposits.
    pub deposit_count: u64,
    /// Total deposit amount in the reference currency.
    pub deposit_amount: i64,
    /// Number of winning bets.
    pub win_count: u64,
}

/// Player superlatives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlayerSnapshot {
    /// Player with the most bets.
    pub top_player_bet: TopCount,
    /// Player with the most deposits.
    pub top_player_deposit: TopCount,
    /// Player with the most wins.
    pub top_player_win: TopCount,
}

/// Aggregates bets, deposits and wins per player.
#[derive(Debug)]
pub struct PlayerAggregator {
    players: RwLock<HashMap<u64, Arc<PlayerStatistics>>>,
    leaderboard: Arc<Leaderboard>,
}

impl PlayerAggregator {
    /// Creates an aggregator reporting into `leaderboard`.
    #[must_use]
    pub fn new(leaderboard: Arc<Leaderboard>) -> Self {
        Self {
            players: RwLock::new(HashMap::new()),
            leaderboard,
        }
    }

    /// Returns the counters of one player, if any event referenced it.
    #[must_use]
    pub fn player(&self, player_id: u64) -> Option<PlayerCounters> {
        self.players
            .read()
            .get(&player_id)
            .map(|stats| stats.counters())
    }

    /// Number of distinct players seen.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.read().len()
    }

    fn entry(&self, player_id: u64) -> Arc<PlayerStatistics> {
        if let Some(stats) = self.players.read().get(&player_id) {
            return Arc::clone(stats);
        }
        let mut players = self.players.write();
        Arc::clone(players.entry(player_id).or_default())
    }
}

impl Aggregator for PlayerAggregator {
    fn name(&self) -> &'static str {
        PLAYER_AGGREGATOR
    }

    fn consume(&self, event: &Event) {
        let id = event.player_id;
        let stats = self.entry(id);

        match event.event_type {
            EventType::Bet => {
                let count = stats.record_bet(event.reference_amount());
                self.leaderboard
                    .top_player_bet
                    .offer(TopCount::new(id, count));
            }
            EventType::Deposit => {
                let count = stats.record_deposit(event.reference_amount());
                self.leaderboard
                    .top_player_deposit
                    .offer(TopCount::new(id, count));
            }
            EventType::GameStart | EventType::GameStop => {}
        }

        if event.has_won() {
            let count = stats.record_win();
            self.leaderboard
                .top_player_win
                .offer(TopCount::new(id, count));
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::Player(PlayerSnapshot {
            top_player_bet: self.leaderboard.top_player_bet.get(),
            top_player_deposit: self.leaderboard.top_player_deposit.get(),
            top_player_win: self.leaderboard.top_player_win.get(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::Currency;

    fn aggregator() -> PlayerAggregator {
        PlayerAggregator::new(Arc::new(Leaderboard::new()))
    }

    fn player_snapshot(agg: &PlayerAggregator) -> PlayerSnapshot {
        let Snapshot::Player(snap) = agg.snapshot() else {
            panic!("expected player snapshot");
        };
        snap
    }

    fn enriched_bet(id: u64, player_id: u64, amount: i64, has_won: bool) -> Event {
        let mut event = Event::bet(id, player_id, 101, amount, Currency::Eur, has_won, Utc::now());
        event.amount_in_reference = Some(amount);
        event
    }

    #[test]
    fn single_bet_updates_counters_and_top_bettor() {
        let agg = aggregator();
        agg.consume(&enriched_bet(1, 7, 500, false));

        let Some(counters) = agg.player(7) else {
            panic!("player 7 should be tracked");
        };
        assert_eq!(counters.bet_count, 1);
        assert_eq!(counters.bet_amount, 500);
        assert_eq!(counters.win_count, 0);
        assert_eq!(player_snapshot(&agg).top_player_bet, TopCount::new(7, 1));
    }

    #[test]
    fn deposits_are_counted_separately() {
        let agg = aggregator();
        let mut deposit = Event::deposit(1, 3, 1_000, Currency::Eur, Utc::now());
        deposit.amount_in_reference = Some(1_000);
        agg.consume(&deposit);
        agg.consume(&deposit);

        let Some(counters) = agg.player(3) else {
            panic!("player 3 should be tracked");
        };
        assert_eq!(counters.deposit_count, 2);
        assert_eq!(counters.deposit_amount, 2_000);
        assert_eq!(counters.bet_count, 0);
        assert_eq!(player_snapshot(&agg).top_player_deposit, TopCount::new(3, 2));
    }

    #[test]
    fn wins_tracked_after_bet() {
        let agg = aggregator();
        agg.consume(&enriched_bet(1, 4, 100, true));
        agg.consume(&enriched_bet(2, 4, 100, true));
        agg.consume(&enriched_bet(3, 5, 100, false));

        let snap = player_snapshot(&agg);
        assert_eq!(snap.top_player_win, TopCount::new(4, 2));
        assert_eq!(snap.top_player_bet, TopCount::new(4, 2));
    }

    #[test]
    fn ties_keep_first_player() {
        let agg = aggregator();
        agg.consume(&enriched_bet(1, 1, 100, false));
        agg.consume(&enriched_bet(2, 2, 100, false));
        assert_eq!(player_snapshot(&agg).top_player_bet, TopCount::new(1, 1));
    }

    #[test]
    fn missing_reference_amount_counts_as_zero() {
        let agg = aggregator();
        let bet = Event::bet(1, 9, 101, 700, Currency::Usd, false, Utc::now());
        agg.consume(&bet);
        let Some(counters) = agg.player(9) else {
            panic!("player 9 should be tracked");
        };
        assert_eq!(counters.bet_count, 1);
        assert_eq!(counters.bet_amount, 0);
    }

    #[test]
    fn game_events_only_register_player() {
        let agg = aggregator();
        agg.consume(&Event::game_start(1, 2, 101, Utc::now()));
        assert_eq!(agg.player(2), Some(PlayerCounters::default()));
        assert_eq!(agg.player_count(), 1);
        assert_eq!(player_snapshot(&agg), PlayerSnapshot::default());
    }

    #[test]
    fn top_records_never_decrease() {
        let agg = aggregator();
        let mut last = 0;
        for i in 0..50u64 {
            agg.consume(&enriched_bet(i, i % 7, 10, i % 3 == 0));
            let current = player_snapshot(&agg).top_player_bet.count;
            assert!(current >= last);
            last = current;
        }
    }
}

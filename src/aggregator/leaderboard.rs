//! Process-wide superlative records.
//!
//! [`Leaderboard`] is constructed once at startup and shared (via `Arc`)
//! with the aggregators that feed it, so each aggregator can also be built
//! in isolation with its own board in tests.

use serde::Serialize;

use super::top_record::{TopAmount, TopCount, TopRecord};

/// All tracked [`TopRecord`]s.
#[derive(Debug, Default)]
pub struct Leaderboard {
    /// Player with the most bets.
    pub top_player_bet: TopRecord<TopCount>,
    /// Player with the most deposits.
    pub top_player_deposit: TopRecord<TopCount>,
    /// Player with the most wins.
    pub top_player_win: TopRecord<TopCount>,
    /// Game with the most completed plays.
    pub most_played_game: TopRecord<TopCount>,
    /// Game with the largest reference-currency stake.
    pub most_betted_game: TopRecord<TopAmount>,
}

/// Point-in-time copy of every record on the board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LeaderboardSnapshot {
    /// Player with the most bets.
    pub top_player_bet: TopCount,
    /// Player with the most deposits.
    pub top_player_deposit: TopCount,
    /// Player with the most wins.
    pub top_player_win: TopCount,
    /// Game with the most completed plays.
    pub most_played_game: TopCount,
    /// Game with the largest reference-currency stake.
    pub most_betted_game: TopAmount,
}

impl Leaderboard {
    /// Creates a board with every record at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies every record.
    #[must_use]
    pub fn snapshot(&self) -> LeaderboardSnapshot {
        LeaderboardSnapshot {
            top_player_bet: self.top_player_bet.get(),
            top_player_deposit: self.top_player_deposit.get(),
            top_player_win: self.top_player_win.get(),
            most_played_game: self.most_played_game.get(),
            most_betted_game: self.most_betted_game.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_board_is_zeroed() {
        assert_eq!(Leaderboard::new().snapshot(), LeaderboardSnapshot::default());
    }

    #[test]
    fn snapshot_reflects_offers() {
        let board = Leaderboard::new();
        board.top_player_win.offer(TopCount::new(3, 2));
        board.most_betted_game.offer(TopAmount::new(101, 900));
        let snap = board.snapshot();
        assert_eq!(snap.top_player_win, TopCount::new(3, 2));
        assert_eq!(snap.most_betted_game, TopAmount::new(101, 900));
        assert_eq!(snap.top_player_bet, TopCount::default());
    }
}

//! Statistics DTOs for the read endpoints.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::aggregator::{GameSnapshot, GameStatistics, PlayerCounters, TopAmount, TopCount};

/// One game row in `GET /stats/games`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameStatsDto {
    /// Game id.
    pub id: u64,
    /// Catalog title.
    pub title: String,
    /// Completed plays.
    pub play_count: u64,
    /// Total staked per currency code, in display units.
    pub bet_per_currency: BTreeMap<String, f64>,
    /// Total staked in smallest units of the reference currency.
    pub staked_reference: i64,
}

impl From<GameStatistics> for GameStatsDto {
    fn from(stats: GameStatistics) -> Self {
        Self {
            id: stats.id,
            title: stats.title,
            play_count: stats.play_count,
            bet_per_currency: stats
                .bet_per_currency
                .into_iter()
                .map(|(currency, total)| (currency.code().to_string(), total))
                .collect(),
            staked_reference: stats.staked_reference,
        }
    }
}

/// Response body for `GET /stats/games`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GameStatsResponse {
    /// Every game seen, ordered by id.
    pub games: Vec<GameStatsDto>,
    /// Game with the most completed plays.
    pub most_played_game: TopCount,
    /// Game holding the largest single bet in the reference currency.
    pub most_betted_game: TopAmount,
}

impl From<GameSnapshot> for GameStatsResponse {
    fn from(snapshot: GameSnapshot) -> Self {
        Self {
            games: snapshot.games.into_iter().map(GameStatsDto::from).collect(),
            most_played_game: snapshot.most_played_game,
            most_betted_game: snapshot.most_betted_game,
        }
    }
}

/// Response body for `GET /stats/players/{id}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerStatsResponse {
    /// Player id.
    pub player_id: u64,
    /// Number of bets.
    pub bet_count: u64,
    /// Total bet, smallest reference units.
    pub bet_amount: i64,
    /// Number of deposits.
    pub deposit_count: u64,
    /// Total deposited, smallest reference units.
    pub deposit_amount: i64,
    /// Number of winning events.
    pub win_count: u64,
}

impl PlayerStatsResponse {
    /// Builds the response from a player's counters.
    #[must_use]
    pub fn new(player_id: u64, counters: PlayerCounters) -> Self {
        Self {
            player_id,
            bet_count: counters.bet_count,
            bet_amount: counters.bet_amount,
            deposit_count: counters.deposit_count,
            deposit_amount: counters.deposit_amount,
            win_count: counters.win_count,
        }
    }
}

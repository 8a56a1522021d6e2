//! Player directory lookups.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::domain::Player;
use crate::error::StatsError;

/// External player directory.
#[async_trait]
pub trait PlayerDirectory: fmt::Debug + Send + Sync {
    /// Resolves a player's identity metadata.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::PlayerNotFound`] for unknown ids and
    /// [`StatsError::Directory`] on backend failure.
    async fn find(&self, player_id: u64) -> Result<Player, StatsError>;
}

/// PostgreSQL-backed directory reading the `players` table.
#[derive(Debug, Clone)]
pub struct PgPlayerDirectory {
    pool: PgPool,
}

impl PgPlayerDirectory {
    /// Creates a directory over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to `url` and verifies the connection.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Directory`] if no connection can be
    /// established.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        connect_timeout: Duration,
    ) -> Result<Self, StatsError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(connect_timeout)
            .connect(url)
            .await
            .map_err(|e| StatsError::Directory(e.to_string()))?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl PlayerDirectory for PgPlayerDirectory {
    async fn find(&self, player_id: u64) -> Result<Player, StatsError> {
        let id = i64::try_from(player_id)
            .map_err(|_| StatsError::InvalidRequest(format!("player id out of range: {player_id}")))?;

        let row = sqlx::query_as::<_, (String, DateTime<Utc>)>(
            "SELECT email, last_signed_in_at FROM players WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StatsError::Directory(e.to_string()))?;

        row.map(|(email, last_signed_in_at)| Player::new(email, last_signed_in_at))
            .ok_or(StatsError::PlayerNotFound(player_id))
    }
}

/// In-memory directory, used when no database is configured and in tests.
#[derive(Debug, Default)]
pub struct InMemoryPlayerDirectory {
    players: RwLock<HashMap<u64, Player>>,
}

impl InMemoryPlayerDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a player.
    pub fn insert(&self, player_id: u64, player: Player) {
        self.players.write().insert(player_id, player);
    }

    /// Builder-style [`InMemoryPlayerDirectory::insert`].
    #[must_use]
    pub fn with_player(self, player_id: u64, player: Player) -> Self {
        self.insert(player_id, player);
        self
    }

    /// Number of known players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.read().len()
    }

    /// Returns `true` when no player is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.read().is_empty()
    }
}

#[async_trait]
impl PlayerDirectory for InMemoryPlayerDirectory {
    async fn find(&self, player_id: u64) -> Result<Player, StatsError> {
        self.players
            .read()
            .get(&player_id)
            .cloned()
            .ok_or(StatsError::PlayerNotFound(player_id))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_finds_known_player() {
        let directory =
            InMemoryPlayerDirectory::new().with_player(7, Player::new("jane@example.com", Utc::now()));
        let Ok(player) = directory.find(7).await else {
            panic!("player 7 should exist");
        };
        assert_eq!(player.email, "jane@example.com");
        assert_eq!(directory.len(), 1);
    }

    #[tokio::test]
    async fn in_memory_reports_not_found() {
        let directory = InMemoryPlayerDirectory::new();
        let result = directory.find(1).await;
        assert!(matches!(result, Err(StatsError::PlayerNotFound(1))));
    }
}

//! Statistics aggregators fed by the subscription broker.
//!
//! Each aggregator implements [`Aggregator`]: it consumes every event it
//! receives on its own receive loop and can hand out a point-in-time
//! [`Snapshot`] at any moment from another task. Aggregators never talk to
//! each other; the only shared state is the [`Leaderboard`] that the
//! player and game aggregators feed.
//!
//! ```text
//! broker ──► PlayerAggregator ──┐
//!        ├─► GameAggregator   ──┴─► Leaderboard (TopRecords)
//!        └─► TimeAggregator
//! ```

pub mod game;
pub mod leaderboard;
pub mod player;
pub mod recent;
pub mod time;
pub mod top_record;
pub mod window;

use std::fmt;

use serde::Serialize;

use crate::domain::Event;

pub use game::{GameAggregator, GameSnapshot, GameStatistics};
pub use leaderboard::{Leaderboard, LeaderboardSnapshot};
pub use player::{PlayerAggregator, PlayerCounters, PlayerSnapshot};
pub use time::{TimeAggregator, TimeSnapshot};
pub use top_record::{Ranked, TopAmount, TopCount, TopRecord};

/// Registered name of the [`PlayerAggregator`].
pub const PLAYER_AGGREGATOR: &str = "player";
/// Registered name of the [`GameAggregator`].
pub const GAME_AGGREGATOR: &str = "game";
/// Registered name of the [`TimeAggregator`].
pub const TIME_AGGREGATOR: &str = "time";

/// A statistics consumer attached to the broker.
///
/// `consume` is called from the aggregator's dedicated receive loop, one
/// event at a time and in publish order. `snapshot` may be called
/// concurrently from any task and must not block event processing beyond
/// short critical sections.
pub trait Aggregator: fmt::Debug + Send + Sync + 'static {
    /// Name the aggregator is registered under.
    fn name(&self) -> &'static str;

    /// Folds one event into the running statistics.
    fn consume(&self, event: &Event);

    /// Returns a point-in-time copy of the statistics.
    fn snapshot(&self) -> Snapshot;

    /// Clears state at the start of a subscription lifecycle.
    fn reset(&self) {}
}

/// Snapshot returned by [`Aggregator::snapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Snapshot {
    /// Player superlatives.
    Player(PlayerSnapshot),
    /// Per-game rows and game superlatives.
    Game(GameSnapshot),
    /// Event-rate statistics.
    Time(TimeSnapshot),
}

impl Snapshot {
    /// Returns the variant name, for logging.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Player(_) => PLAYER_AGGREGATOR,
            Self::Game(_) => GAME_AGGREGATOR,
            Self::Time(_) => TIME_AGGREGATOR,
        }
    }
}

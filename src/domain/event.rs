//! Casino domain events.
//!
//! An [`Event`] arrives raw from the event source, is enriched once by the
//! publisher (reference-currency amount, player snapshot, description) and
//! is immutable afterwards. Its JSON form is the broker wire format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Currency, Player};

/// Kind of casino event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A player opened a game.
    GameStart,
    /// A player placed a bet in a game.
    Bet,
    /// A player deposited funds.
    Deposit,
    /// A player closed a game.
    GameStop,
}

impl EventType {
    /// Returns the wire name of the event type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GameStart => "game_start",
            Self::Bet => "bet",
            Self::Deposit => "deposit",
            Self::GameStop => "game_stop",
        }
    }

    /// Returns `true` for types that carry an amount and a currency.
    #[must_use]
    pub const fn is_monetary(self) -> bool {
        matches!(self, Self::Bet | Self::Deposit)
    }
}

/// A single casino event.
///
/// Optional fields are omitted from the wire format when not applicable:
/// `game_id` is absent for deposits, `amount`/`currency` are present only
/// for bets and deposits, `has_won` only for bets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event identifier.
    pub id: u64,
    /// Player that produced the event.
    pub player_id: u64,
    /// Game the event refers to (absent for deposits).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_id: Option<u64>,
    /// Event kind.
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Amount in the currency's smallest unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<i64>,
    /// Currency of `amount`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
    /// Bet outcome.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_won: Option<bool>,
    /// Creation timestamp (RFC 3339 on the wire).
    pub created_at: DateTime<Utc>,
    /// `amount` converted into the reference currency, set by enrichment.
    #[serde(
        rename = "amount_eur",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub amount_in_reference: Option<i64>,
    /// Player snapshot, set by enrichment.
    #[serde(default, skip_serializing_if = "Player::is_zero")]
    pub player: Player,
    /// Human-readable description, set by enrichment.
    #[serde(default)]
    pub description: String,
}

impl Event {
    fn base(id: u64, player_id: u64, event_type: EventType, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            player_id,
            game_id: None,
            event_type,
            amount: None,
            currency: None,
            has_won: None,
            created_at,
            amount_in_reference: None,
            player: Player::default(),
            description: String::new(),
        }
    }

    /// Builds a raw `game_start` event.
    #[must_use]
    pub fn game_start(id: u64, player_id: u64, game_id: u64, created_at: DateTime<Utc>) -> Self {
        Self {
            game_id: Some(game_id),
            ..Self::base(id, player_id, EventType::GameStart, created_at)
        }
    }

    /// Builds a raw `game_stop` event.
    #[must_use]
    pub fn game_stop(id: u64, player_id: u64, game_id: u64, created_at: DateTime<Utc>) -> Self {
        Self {
            game_id: Some(game_id),
            ..Self::base(id, player_id, EventType::GameStop, created_at)
        }
    }

    /// Builds a raw `bet` event.
    #[must_use]
    pub fn bet(
        id: u64,
        player_id: u64,
        game_id: u64,
        amount: i64,
        currency: Currency,
        has_won: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            game_id: Some(game_id),
            amount: Some(amount),
            currency: Some(currency),
            has_won: Some(has_won),
            ..Self::base(id, player_id, EventType::Bet, created_at)
        }
    }

    /// Builds a raw `deposit` event.
    #[must_use]
    pub fn deposit(
        id: u64,
        player_id: u64,
        amount: i64,
        currency: Currency,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            amount: Some(amount),
            currency: Some(currency),
            ..Self::base(id, player_id, EventType::Deposit, created_at)
        }
    }

    /// Returns `true` when the bet outcome flag is set.
    #[must_use]
    pub fn has_won(&self) -> bool {
        self.has_won.unwrap_or(false)
    }

    /// Reference-currency amount, or zero when enrichment could not fill it.
    #[must_use]
    pub fn reference_amount(&self) -> i64 {
        self.amount_in_reference.unwrap_or(0)
    }

    /// Checks the field-presence invariant: `amount` and `currency` are set
    /// iff the type is monetary, `has_won` only for bets, `game_id` for
    /// every type except deposits.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let monetary = self.event_type.is_monetary();
        let money_ok = self.amount.is_some() == monetary && self.currency.is_some() == monetary;
        let outcome_ok = self.has_won.is_none() || self.event_type == EventType::Bet;
        let game_ok = match self.event_type {
            EventType::Deposit => true,
            EventType::GameStart | EventType::GameStop | EventType::Bet => self.game_id.is_some(),
        };
        money_ok && outcome_ok && game_ok
    }
}

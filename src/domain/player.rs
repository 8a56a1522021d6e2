//! Player identity projection attached to events during enrichment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity metadata resolved from the player directory.
///
/// The default value is the "zero" player: it stands in for a failed or
/// skipped lookup and is never treated as a found player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Player e-mail address.
    #[serde(default)]
    pub email: String,
    /// Last sign-in timestamp.
    #[serde(default)]
    pub last_signed_in_at: Option<DateTime<Utc>>,
}

impl Player {
    /// Creates a player projection.
    #[must_use]
    pub fn new(email: impl Into<String>, last_signed_in_at: DateTime<Utc>) -> Self {
        Self {
            email: email.into(),
            last_signed_in_at: Some(last_signed_in_at),
        }
    }

    /// Returns `true` for the absence sentinel (empty e-mail or no timestamp).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.email.is_empty() || self.last_signed_in_at.is_none()
    }
}

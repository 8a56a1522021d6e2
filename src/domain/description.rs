//! Human-readable event descriptions.
//!
//! ```text
//! Player ID 7 (jane@example.com) placed bet of 3.00 USD (2.75 EUR) on game "Book of Cats" on March 2nd, 2024 at 10:05 UTC
//! ```

use chrono::{DateTime, Datelike, Timelike, Utc};

use super::{Currency, Event, EventType, game_title};

/// Renders the description for an event using its current enrichment state.
#[must_use]
pub fn describe(event: &Event) -> String {
    let player = describe_player(event);
    let when = describe_time(event.created_at);
    let game = event.game_id.map_or("", game_title);

    match event.event_type {
        EventType::GameStart => {
            format!(r#"{player} started playing a game "{game}" on {when}"#)
        }
        EventType::GameStop => {
            format!(r#"{player} stopped playing a game "{game}" on {when}"#)
        }
        EventType::Bet => {
            let amount = describe_amount(event);
            format!(r#"{player} placed bet of {amount} on game "{game}" on {when}"#)
        }
        EventType::Deposit => {
            let amount = describe_amount(event);
            format!(r#"{player} placed deposit of {amount} on game "{game}" on {when}"#)
        }
    }
}

fn describe_player(event: &Event) -> String {
    if event.player.is_zero() {
        format!("Player ID {}", event.player_id)
    } else {
        format!("Player ID {} ({})", event.player_id, event.player.email)
    }
}

fn describe_amount(event: &Event) -> String {
    let (Some(amount), Some(currency)) = (event.amount, event.currency) else {
        return "an unknown amount".to_string();
    };
    // Always suffixed, even for reference-currency amounts; a failed
    // conversion shows as zero.
    format!(
        "{} ({})",
        currency.format_amount(amount),
        Currency::REFERENCE.format_amount(event.reference_amount())
    )
}

/// Formats a timestamp as `"March 2nd, 2024 at 10:05 UTC"`.
#[must_use]
pub fn describe_time(at: DateTime<Utc>) -> String {
    let day = at.day();
    format!(
        "{} {day}{}, {} at {:02}:{:02} UTC",
        at.format("%B"),
        ordinal_suffix(day),
        at.year(),
        at.hour(),
        at.minute()
    )
}

/// English ordinal suffix for a day of the month.
#[must_use]
pub const fn ordinal_suffix(day: u32) -> &'static str {
    match day {
        1 | 21 | 31 => "st",
        2 | 22 => "nd",
        3 | 23 => "rd",
        _ => "th",
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::Player;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        let Some(at) = Utc.with_ymd_and_hms(2024, 3, day, 10, 5, 0).single() else {
            panic!("valid date");
        };
        at
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(23), "rd");
        assert_eq!(ordinal_suffix(31), "st");
    }

    #[test]
    fn time_format() {
        assert_eq!(describe_time(at(2)), "March 2nd, 2024 at 10:05 UTC");
        assert_eq!(describe_time(at(21)), "March 21st, 2024 at 10:05 UTC");
    }

    #[test]
    fn game_start_with_unknown_player() {
        let event = Event::game_start(1, 7, 101, at(3));
        assert_eq!(
            describe(&event),
            r#"Player ID 7 started playing a game "Book of Cats" on March 3rd, 2024 at 10:05 UTC"#
        );
    }

    #[test]
    fn bet_with_player_and_conversion() {
        let mut event = Event::bet(1, 7, 101, 300, Currency::Usd, false, at(2));
        event.amount_in_reference = Some(275);
        event.player = Player::new("jane@example.com", at(1));
        assert_eq!(
            describe(&event),
            r#"Player ID 7 (jane@example.com) placed bet of 3.00 USD (2.75 EUR) on game "Book of Cats" on March 2nd, 2024 at 10:05 UTC"#
        );
    }

    #[test]
    fn deposit_in_reference_currency() {
        let mut event = Event::deposit(1, 7, 1_000, Currency::Eur, at(4));
        event.amount_in_reference = Some(1_000);
        assert_eq!(
            describe(&event),
            r#"Player ID 7 placed deposit of 10.00 EUR (10.00 EUR) on game "" on March 4th, 2024 at 10:05 UTC"#
        );
    }

    #[test]
    fn btc_uses_eight_decimals() {
        let event = Event::deposit(1, 7, 150_000, Currency::Btc, at(4));
        assert!(describe(&event).contains("0.00150000 BTC (0.00 EUR)"));
    }
}

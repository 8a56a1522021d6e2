//! Broker wire format.
//!
//! Events travel as JSON objects. The shutdown signal is a reserved
//! plain-text payload; since every encoded event starts with `{`, the
//! sentinel can never collide with one.

use std::sync::Arc;

use crate::domain::Event;
use crate::error::StatsError;

/// Payload carried on a broker channel.
pub type Payload = Arc<str>;

/// Reserved payload announcing that the event source is exhausted.
pub const SHUTDOWN_SENTINEL: &str = "casino-stats:shutdown";

/// Returns `true` if `payload` is the shutdown sentinel.
#[must_use]
pub fn is_shutdown(payload: &str) -> bool {
    payload == SHUTDOWN_SENTINEL
}

/// Serializes an event into its wire form.
///
/// # Errors
///
/// Returns [`StatsError::Serialization`] if the event cannot be encoded.
pub fn encode(event: &Event) -> Result<Payload, StatsError> {
    Ok(serde_json::to_string(event)?.into())
}

/// Parses a wire payload back into an event.
///
/// # Errors
///
/// Returns [`StatsError::Serialization`] for anything that is not a valid
/// event object, the sentinel included.
pub fn decode(payload: &str) -> Result<Event, StatsError> {
    Ok(serde_json::from_str(payload)?)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::Currency;

    #[test]
    fn sentinel_is_not_an_event() {
        assert!(decode(SHUTDOWN_SENTINEL).is_err());
        assert!(serde_json::from_str::<serde_json::Value>(SHUTDOWN_SENTINEL).is_err());
    }

    #[test]
    fn encoded_event_is_never_sentinel() {
        let Ok(payload) = encode(&Event::deposit(1, 2, 3, Currency::Eur, Utc::now())) else {
            panic!("encoding should succeed");
        };
        assert!(payload.starts_with('{'));
        assert!(!is_shutdown(&payload));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode("{not json"), Err(StatsError::Serialization(_))));
        assert!(decode(r#"{"id":1}"#).is_err());
    }

    #[test]
    fn decode_reads_encoded_event() {
        let event = Event::game_stop(5, 6, 101, Utc::now());
        let Ok(payload) = encode(&event) else {
            panic!("encoding should succeed");
        };
        let Ok(decoded) = decode(&payload) else {
            panic!("decoding should succeed");
        };
        assert_eq!(decoded.id, 5);
        assert_eq!(decoded.game_id, Some(101));
    }
}

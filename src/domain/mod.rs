//! Domain layer: casino events, players, currencies and games.
//!
//! These types are shared by every stage of the pipeline: the event
//! source produces [`Event`]s, the publisher enriches them with a
//! [`Player`] snapshot, a reference-currency amount and a description,
//! and the aggregators consume them from the broker.

pub mod currency;
pub mod description;
pub mod event;
pub mod game;
pub mod player;

pub use currency::Currency;
pub use description::describe;
pub use event::{Event, EventType};
pub use game::game_title;
pub use player::Player;

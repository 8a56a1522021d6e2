//! Game catalog used to resolve titles for descriptions and statistics.

/// Title reported for game ids missing from the catalog.
pub const UNKNOWN_GAME: &str = "Unknown game";

/// Known games as `(id, title)` pairs.
pub const GAMES: [(u64, &str); 10] = [
    (100, "Aloha King Elvis"),
    (101, "Book of Cats"),
    (102, "Candy Ice Cream"),
    (103, "Dig Dig Digger"),
    (104, "Elvis Frog in Vegas"),
    (105, "Fruit Million"),
    (106, "Gemhalla"),
    (107, "Hot Triple Sevens"),
    (108, "Lucky Lady Moon"),
    (109, "Wild Spin"),
];

/// Looks up the title for a game id.
#[must_use]
pub fn game_title(id: u64) -> &'static str {
    GAMES
        .iter()
        .find(|(game_id, _)| *game_id == id)
        .map_or(UNKNOWN_GAME, |(_, title)| title)
}

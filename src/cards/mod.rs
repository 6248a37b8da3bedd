pub mod deck;
pub mod set;

pub use deck::{load_deck_file, parse_card_line, parse_deck, CardLine, Deck, DeckError};
pub use set::{normalize_card_name, Card, CardSet};

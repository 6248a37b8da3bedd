use crate::cards::set::{normalize_card_name, CardSet};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A deck list: main deck and sideboard. Only the main deck is drawn from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    pub main: CardSet,
    pub side: CardSet,
}

impl Deck {
    /// Every distinct card name listed in the deck, main or side
    pub fn card_names(&self) -> BTreeSet<String> {
        self.main.iter().chain(self.side.iter()).cloned().collect()
    }
}

/// One parsed deck-list line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLine {
    pub main: bool,
    pub extension: Option<String>,
    pub count: usize,
    pub name: String,
}

/// Parse a card line such as `4x [M19] Sol Ring` or `SB: 2 Fireball`.
/// Returns None for blank and comment lines.
pub fn parse_card_line(line: &str) -> Option<CardLine> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
        return None;
    }

    let mut rest = line;
    let mut main = true;
    if let Some(after) = rest.strip_prefix("SB") {
        if after.starts_with(':') || after.starts_with(char::is_whitespace) {
            main = false;
            rest = after.strip_prefix(':').unwrap_or(after).trim_start();
        }
    }

    // Optional count: digits, an optional 'x', then mandatory whitespace
    let mut count = 1;
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        let after = &rest[digits..];
        let after = after.strip_prefix('x').unwrap_or(after);
        if after.starts_with(char::is_whitespace) {
            if let Ok(parsed) = rest[..digits].parse() {
                count = parsed;
                rest = after.trim_start();
            }
        }
    }

    // Optional extension: `[SET]` followed by a non-empty name
    let mut extension = None;
    if rest.starts_with('[') {
        if let Some(close) = rest.rfind(']') {
            let name = rest[close + 1..].trim_start();
            if !name.is_empty() {
                extension = Some(rest[1..close].to_string());
                rest = name;
            }
        }
    }

    if rest.is_empty() {
        return None;
    }

    Some(CardLine {
        main,
        extension,
        count,
        name: normalize_card_name(rest),
    })
}

/// Parse a whole deck list. A `Sideboard` header line sends every following
/// card to the sideboard.
pub fn parse_deck(text: &str) -> Deck {
    let mut main = Vec::new();
    let mut side = Vec::new();
    let mut reading_sideboard = false;

    for line in text.lines() {
        if line.trim().to_lowercase().starts_with("sideboard") {
            reading_sideboard = true;
            continue;
        }
        if let Some(card) = parse_card_line(line) {
            let target = if card.main && !reading_sideboard {
                &mut main
            } else {
                &mut side
            };
            for _ in 0..card.count {
                target.push(card.name.clone());
            }
        }
    }

    Deck {
        main: main.into_iter().collect(),
        side: side.into_iter().collect(),
    }
}

/// Load and parse a deck list file
pub fn load_deck_file(path: &str) -> Result<Deck, DeckError> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse_deck(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_line() {
        let line = parse_card_line("4x [M19] Sol Ring").expect("line should parse");
        assert!(line.main);
        assert_eq!(line.count, 4);
        assert_eq!(line.extension.as_deref(), Some("M19"));
        assert_eq!(line.name, "sol ring");
    }

    #[test]
    fn test_parse_sideboard_prefix() {
        let line = parse_card_line("SB: 2 Fireball").expect("line should parse");
        assert!(!line.main);
        assert_eq!(line.count, 2);
        assert_eq!(line.name, "fireball");

        let line = parse_card_line("SB 1 Pyroblast").expect("line should parse");
        assert!(!line.main);
        assert_eq!(line.name, "pyroblast");
    }

    #[test]
    fn test_line_without_count_is_one_copy() {
        let line = parse_card_line("Lightning Bolt").expect("line should parse");
        assert_eq!(line.count, 1);
        assert_eq!(line.name, "lightning bolt");
    }

    #[test]
    fn test_leading_number_needs_whitespace() {
        let line = parse_card_line("1996 World Champion").expect("line should parse");
        assert_eq!(line.count, 1996);
        let line = parse_card_line("42").expect("line should parse");
        assert_eq!(line.count, 1);
        assert_eq!(line.name, "42");
    }

    #[test]
    fn test_comments_and_blanks_ignored() {
        assert!(parse_card_line("").is_none());
        assert!(parse_card_line("   ").is_none());
        assert!(parse_card_line("# lands").is_none());
        assert!(parse_card_line("// spells").is_none());
    }

    #[test]
    fn test_parse_deck_counts() {
        let deck = parse_deck("4x [set] sol ring\n2 fireball\n");
        assert_eq!(deck.main.size(), 6);
        assert_eq!(deck.main.count("sol ring"), 4);
        assert_eq!(deck.main.count("fireball"), 2);
        assert!(deck.side.is_empty());
    }

    #[test]
    fn test_parse_deck_sideboard_section() {
        let deck = parse_deck("20 Forest\nSB: 1 Naturalize\nSideboard\n3 Hydroblast\n");
        assert_eq!(deck.main.size(), 20);
        assert_eq!(deck.side.size(), 4);
        assert_eq!(deck.side.count("hydroblast"), 3);
        let names = deck.card_names();
        assert!(names.contains("naturalize"));
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_missing_file() {
        assert!(load_deck_file("no/such/deck.txt").is_err());
    }
}

//! Immutable multiset of card names.
//!
//! Every operation returns a new `CardSet`. The matcher engine explores many
//! hypotheses over the same hand, so a removal made on one branch must never
//! be visible from a sibling branch. The backing `im::Vector` makes the copies
//! cheap: clones share structure until one side is modified.

use crate::rng::SimRng;
use im::Vector;
use std::fmt;

/// A card is identified by its lowercased name
pub type Card = String;

/// Normalize a card name the way deck lists and card matchers do
pub fn normalize_card_name(name: &str) -> Card {
    name.trim().to_lowercase()
}

/// Ordered sequence of cards, duplicates allowed (one entry per copy)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardSet {
    cards: Vector<Card>,
}

impl CardSet {
    pub fn new() -> Self {
        CardSet { cards: Vector::new() }
    }

    /// Build a set from card names, kept as given
    pub fn of<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Card>,
    {
        CardSet {
            cards: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn has(&self, card: &str) -> bool {
        self.cards.iter().any(|c| c == card)
    }

    /// Number of copies of `card`
    pub fn count(&self, card: &str) -> usize {
        self.cards.iter().filter(|c| *c == card).count()
    }

    /// Uniformly random permutation of this set (Fisher-Yates)
    pub fn shuffle(&self, rng: &mut SimRng) -> CardSet {
        let mut cards: Vec<Card> = self.cards.iter().cloned().collect();
        rng.shuffle(&mut cards);
        CardSet {
            cards: cards.into_iter().collect(),
        }
    }

    /// Draw up to `number` cards from the top of the stack (the end of the sequence)
    pub fn draw(&self, number: usize) -> CardSet {
        let mut stack = self.cards.clone();
        let mut drawn = Vector::new();
        while drawn.len() < number {
            match stack.pop_back() {
                Some(card) => drawn.push_back(card),
                None => break,
            }
        }
        CardSet { cards: drawn }
    }

    /// Copy of this set with one occurrence of `card` removed.
    ///
    /// Callers check `has` first.
    ///
    /// # Panics
    ///
    /// When `card` is not in the set.
    pub fn remove(&self, card: &str) -> CardSet {
        let mut cards = self.cards.clone();
        match cards.iter().position(|c| c == card) {
            Some(index) => {
                cards.remove(index);
            }
            None => panic!("card [{}] is not in the set", card),
        }
        CardSet { cards }
    }

    /// Copy of this set with one occurrence of `card` appended
    pub fn add(&self, card: &str) -> CardSet {
        let mut cards = self.cards.clone();
        cards.push_back(card.to_string());
        CardSet { cards }
    }

    /// Same cards with the same multiplicities, regardless of order
    pub fn same_cards(&self, other: &CardSet) -> bool {
        self.sorted() == other.sorted()
    }

    fn sorted(&self) -> Vec<&Card> {
        let mut cards: Vec<&Card> = self.cards.iter().collect();
        cards.sort();
        cards
    }
}

impl FromIterator<Card> for CardSet {
    fn from_iter<T: IntoIterator<Item = Card>>(iter: T) -> Self {
        CardSet {
            cards: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for CardSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, card) in self.cards.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", card)?;
        }
        write!(f, "]")
    }
}

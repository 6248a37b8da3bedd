use crate::cards::CardSet;

/// One hypothesis of which cards of a hand have been consumed so far.
///
/// `remaining` and `selected` always partition the original hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub remaining: CardSet,
    pub selected: CardSet,
}

impl Match {
    /// Initial hypothesis: nothing selected yet
    pub fn from_hand(hand: &CardSet) -> Self {
        Match {
            remaining: hand.clone(),
            selected: CardSet::new(),
        }
    }

    pub fn has(&self, card: &str) -> bool {
        self.remaining.has(card)
    }

    /// Successor hypothesis with one `card` moved from remaining to selected
    pub fn select(&self, card: &str) -> Match {
        Match {
            remaining: self.remaining.remove(card),
            selected: self.selected.add(card),
        }
    }
}

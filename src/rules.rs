//! Registry of declared matchers and the ordered criteria a hand is tested against.

use crate::cards::{CardSet, Deck};
use crate::matcher::{Match, Matcher, MatcherContext, Validation};
use crate::parser::{parse_declaration, DeclaredMatcher, ParseError};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RulesError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default)]
pub struct Rules {
    matchers: BTreeMap<String, Matcher>,
    criteria: Vec<DeclaredMatcher>,
    parse_errors: Vec<ParseError>,
    validation: Validation,
    /// Card universe of the deck under test; None accepts every card
    cards: Option<HashSet<String>>,
    /// Matchers that refer back to themselves, never resolved while matching
    cyclic: BTreeSet<String>,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse rule text, one declaration per line. Blank lines and `#` or `//`
    /// comments are skipped; a malformed line is recorded and parsing goes on.
    pub fn parse(text: &str) -> Rules {
        let mut rules = Rules::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }
            match parse_declaration(line) {
                Ok(declared) => rules.add(declared),
                Err(error) => rules.parse_errors.push(error.at_line(index + 1)),
            }
        }
        rules.validate();
        rules
    }

    /// Load and parse a rules file
    pub fn from_file(path: &str) -> Result<Rules, RulesError> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Register a declaration, replacing any matcher of the same name
    pub fn add(&mut self, declared: DeclaredMatcher) {
        self.matchers.insert(declared.name.clone(), declared.matcher.clone());
        if declared.criteria {
            self.criteria.push(declared);
        }
    }

    /// Re-run validation of every matcher
    pub fn validate(&mut self) -> &Validation {
        let mut validation = Validation::new();
        self.cyclic.clear();
        for matcher in self.matchers.values() {
            matcher.validate(&mut validation, &*self);
        }
        self.cyclic = self.find_cycles();
        for name in &self.cyclic {
            validation.error(format!("Matcher <{}> refers to itself", name));
        }
        self.validation = validation;
        &self.validation
    }

    /// Validate with card warnings computed against every given deck variant.
    /// A card is known when any variant lists it, main deck or sideboard.
    pub fn validate_against(&mut self, decks: &[Deck]) -> &Validation {
        self.cards = Some(decks.iter().flat_map(|deck| deck.card_names()).collect());
        self.validate()
    }

    fn find_cycles(&self) -> BTreeSet<String> {
        let mut cyclic = BTreeSet::new();
        for name in self.matchers.keys() {
            let mut seen = BTreeSet::new();
            let mut pending: Vec<&str> = self.matchers[name].references();
            while let Some(next) = pending.pop() {
                if next == name.as_str() {
                    cyclic.insert(name.clone());
                    break;
                }
                if seen.insert(next) {
                    if let Some(matcher) = self.matchers.get(next) {
                        pending.extend(matcher.references());
                    }
                }
            }
        }
        cyclic
    }

    /// First criterion, in declaration order, satisfied by the hand
    pub fn matches(&self, hand: &CardSet) -> Option<&DeclaredMatcher> {
        self.matching_index(hand).map(|index| &self.criteria[index])
    }

    /// Position in `criteria()` of the first criterion satisfied by the hand
    pub fn matching_index(&self, hand: &CardSet) -> Option<usize> {
        let start = Match::from_hand(hand);
        self.criteria
            .iter()
            .position(|criterion| !criterion.matcher.matches(vec![start.clone()], self).is_empty())
    }

    pub fn criteria(&self) -> &[DeclaredMatcher] {
        &self.criteria
    }

    pub fn get(&self, name: &str) -> Option<&Matcher> {
        self.matchers.get(name)
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn parse_errors(&self) -> &[ParseError] {
        &self.parse_errors
    }

    pub fn validation(&self) -> &Validation {
        &self.validation
    }

    /// Whether the rule set is broken: a line failed to parse or a reference
    /// cannot be resolved
    pub fn has_errors(&self) -> bool {
        !self.parse_errors.is_empty() || !self.validation.errors.is_empty()
    }
}

impl MatcherContext for Rules {
    fn matcher(&self, name: &str) -> Option<&Matcher> {
        if self.cyclic.contains(name) {
            return None;
        }
        self.matchers.get(name)
    }

    fn has_card(&self, card: &str) -> bool {
        self.cards.as_ref().map_or(true, |cards| cards.contains(card))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_deck;

    const RULES: &str = "\
# lands
<land>: [forest] | [island]
<<two lands and a bolt>>: 2<land> & [lightning bolt]
<<two lands>>: 2 <land>

// fallback
<<anything>>: <land>
";

    fn hand(cards: &[&str]) -> CardSet {
        CardSet::of(cards.iter().copied())
    }

    #[test]
    fn test_parse_registers_criteria_in_order() {
        let rules = Rules::parse(RULES);
        assert!(!rules.has_errors(), "{:?}", rules.parse_errors());
        assert_eq!(rules.len(), 4);
        let names: Vec<&str> = rules.criteria().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["two lands and a bolt", "two lands", "anything"]);
        assert!(rules.get("land").is_some());
    }

    #[test]
    fn test_first_match_wins() {
        let rules = Rules::parse(RULES);
        let matched = rules.matches(&hand(&["forest", "island", "lightning bolt"]));
        assert_eq!(matched.map(|c| c.name.as_str()), Some("two lands and a bolt"));

        let matched = rules.matches(&hand(&["forest", "forest", "swamp"]));
        assert_eq!(matched.map(|c| c.name.as_str()), Some("two lands"));

        assert_eq!(rules.matching_index(&hand(&["island", "swamp"])), Some(2));
        assert!(rules.matches(&hand(&["swamp", "swamp"])).is_none());
    }

    #[test]
    fn test_order_decides_between_overlapping_criteria() {
        let rules = Rules::parse("<<first>>: [forest]\n<<second>>: [forest]");
        assert_eq!(rules.matches(&hand(&["forest"])).map(|c| c.name.as_str()), Some("first"));
    }

    #[test]
    fn test_parse_errors_keep_going() {
        let rules = Rules::parse("<<ok>>: [forest]\n<broken: [x]\n<<also ok>>: [island]");
        assert_eq!(rules.criteria().len(), 2);
        assert_eq!(rules.parse_errors().len(), 1);
        let error = &rules.parse_errors()[0];
        assert_eq!(error.line, 2);
        assert_eq!(error.column, 9);
        assert!(rules.has_errors());
    }

    #[test]
    fn test_later_declaration_overwrites() {
        let rules = Rules::parse("<land>: [forest]\n<land>: [island]\n<<keep>>: <land>");
        assert_eq!(rules.get("land"), Some(&Matcher::card("island")));
        assert!(rules.matches(&hand(&["forest"])).is_none());
        assert!(rules.matches(&hand(&["island"])).is_some());
    }

    #[test]
    fn test_unknown_reference_is_an_error() {
        let rules = Rules::parse("<<keep>>: <missing> | [forest]");
        assert_eq!(rules.validation().errors, vec!["Matcher <missing> not found"]);
        assert!(rules.has_errors());
        assert!(rules.matches(&hand(&["forest"])).is_some(), "unresolved refs match nothing");
    }

    #[test]
    fn test_card_warnings_against_deck() {
        let mut rules = Rules::parse("<<keep>>: [forest] & [black lotus]");
        assert!(rules.validation().warnings.is_empty());

        let deck = parse_deck("20 Forest\n20 Island\n");
        let validation = rules.validate_against(&[deck]);
        assert_eq!(validation.warnings, vec!["Card [black lotus] not found in deck"]);
        assert!(validation.is_ok());
    }

    #[test]
    fn test_card_warnings_cover_every_variant() {
        let mut rules = Rules::parse("<<keep>>: [forest] | [black lotus] | [mox pearl]");
        let decks = [parse_deck("20 Forest
"), parse_deck("20 Island
1 Black Lotus
")];

        let validation = rules.validate_against(&decks);
        assert_eq!(validation.warnings, vec!["Card [mox pearl] not found in deck"]);
    }

    #[test]
    fn test_cycles_are_reported_and_not_followed() {
        let rules = Rules::parse("<a>: <b> | [forest]\n<b>: <a>\n<<keep>>: <a>");
        let errors = &rules.validation().errors;
        assert!(errors.contains(&"Matcher <a> refers to itself".to_string()));
        assert!(errors.contains(&"Matcher <b> refers to itself".to_string()));
        assert!(rules.matches(&hand(&["forest"])).is_none());
    }
}

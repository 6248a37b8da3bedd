use crate::cards::{normalize_card_name, Card};
use crate::matcher::combinations::{binomial, combinations};
use crate::matcher::hypothesis::Match;
use crate::matcher::validation::Validation;
use crate::matcher::MatcherContext;
use std::fmt;

/// A node of a parsed rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Passes every hypothesis through unchanged
    Noop,
    /// Consumes one copy of a card
    Card(Card),
    /// Delegates to a declared matcher, looked up at evaluation time
    Ref(String),
    /// All children, consuming cards left to right
    And(Vec<Matcher>),
    /// Any child; every successful branch is kept
    Or(Vec<Matcher>),
    /// The child applied this many times, each time on distinct cards
    Times(usize, Box<Matcher>),
    /// Keeps hypotheses for which the child finds nothing; consumes no card
    Not(Box<Matcher>),
}

impl Matcher {
    pub fn card(name: &str) -> Matcher {
        Matcher::Card(normalize_card_name(name))
    }

    pub fn reference(name: &str) -> Matcher {
        Matcher::Ref(name.trim().to_string())
    }

    pub fn not(matcher: Matcher) -> Matcher {
        Matcher::Not(Box::new(matcher))
    }

    pub fn and(mut matchers: Vec<Matcher>) -> Matcher {
        match matchers.len() {
            0 => Matcher::Noop,
            1 => matchers.remove(0),
            _ => Matcher::And(matchers),
        }
    }

    pub fn or(mut matchers: Vec<Matcher>) -> Matcher {
        match matchers.len() {
            0 => Matcher::Noop,
            1 => matchers.remove(0),
            _ => Matcher::Or(matchers),
        }
    }

    pub fn times(times: usize, matcher: Matcher) -> Matcher {
        match times {
            0 => Matcher::Noop,
            1 => matcher,
            _ => Matcher::Times(times, Box::new(matcher)),
        }
    }

    /// `count` of the given matchers holding at once.
    ///
    /// Expands into an `Or` over every `count`-sized combination, each an
    /// `And`. Returns None when `count` exceeds the number of matchers.
    pub fn at_least(count: usize, matchers: Vec<Matcher>) -> Option<Matcher> {
        if count == 0 {
            return Some(Matcher::Noop);
        }
        if count > matchers.len() {
            return None;
        }
        if count == 1 {
            return Some(Matcher::or(matchers));
        }
        if count == matchers.len() {
            return Some(Matcher::and(matchers));
        }
        let mut branches = Vec::with_capacity(binomial(matchers.len(), count));
        for indexes in combinations(matchers.len(), count) {
            branches.push(Matcher::And(indexes.into_iter().map(|i| matchers[i].clone()).collect()));
        }
        Some(Matcher::Or(branches))
    }

    /// Names of the declared matchers this tree refers to
    pub fn references(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_references(&mut names);
        names
    }

    fn collect_references<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Matcher::Noop | Matcher::Card(_) => {}
            Matcher::Ref(name) => names.push(name),
            Matcher::And(children) | Matcher::Or(children) => {
                for child in children {
                    child.collect_references(names);
                }
            }
            Matcher::Times(_, child) | Matcher::Not(child) => child.collect_references(names),
        }
    }

    /// Check references and card names, recording problems in `validation`
    pub fn validate(&self, validation: &mut Validation, context: &dyn MatcherContext) {
        match self {
            Matcher::Noop => {}
            Matcher::Card(card) => {
                if !context.has_card(card) {
                    validation.warning(format!("Card [{}] not found in deck", card));
                }
            }
            Matcher::Ref(name) => {
                if context.matcher(name).is_none() {
                    validation.error(format!("Matcher <{}> not found", name));
                }
            }
            Matcher::And(children) | Matcher::Or(children) => {
                for child in children {
                    child.validate(validation, context);
                }
            }
            Matcher::Times(_, child) | Matcher::Not(child) => child.validate(validation, context),
        }
    }

    /// Hypotheses of `stream` that also satisfy this matcher, each advanced
    /// past the cards it consumed
    pub fn matches(&self, stream: Vec<Match>, context: &dyn MatcherContext) -> Vec<Match> {
        match self {
            Matcher::Noop => stream,
            Matcher::Card(card) => stream
                .into_iter()
                .filter(|m| m.has(card))
                .map(|m| m.select(card))
                .collect(),
            Matcher::Ref(name) => match context.matcher(name) {
                Some(matcher) => matcher.matches(stream, context),
                None => Vec::new(),
            },
            Matcher::And(children) => {
                let mut stream = stream;
                for child in children {
                    if stream.is_empty() {
                        break;
                    }
                    stream = child.matches(stream, context);
                }
                stream
            }
            Matcher::Or(children) => children
                .iter()
                .flat_map(|child| child.matches(stream.clone(), context))
                .collect(),
            Matcher::Times(times, child) => {
                let mut stream = stream;
                for _ in 0..*times {
                    if stream.is_empty() {
                        break;
                    }
                    let next = child.matches(stream.clone(), context);
                    // A child that consumes nothing settles after one pass
                    if next == stream {
                        break;
                    }
                    stream = next;
                }
                stream
            }
            Matcher::Not(child) => stream
                .into_iter()
                .filter(|m| child.matches(vec![m.clone()], context).is_empty())
                .collect(),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Noop => write!(f, "$noop"),
            Matcher::Card(card) => write!(f, "[{}]", card),
            Matcher::Ref(name) => write!(f, "<{}>", name),
            Matcher::And(children) => write_joined(f, children, " && "),
            Matcher::Or(children) => write_joined(f, children, " || "),
            Matcher::Times(times, child) => write!(f, "{} {}", times, child),
            Matcher::Not(child) => write!(f, "@not({})", child),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Matcher], separator: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", separator)?;
        }
        write!(f, "{}", child)?;
    }
    write!(f, ")")
}

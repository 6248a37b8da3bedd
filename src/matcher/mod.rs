//! Matcher trees and their evaluation against drawn hands.
//!
//! A matcher does not answer yes/no: it maps a stream of hypotheses (ways of
//! having consumed cards from the hand so far) to the hypotheses that also
//! satisfy it. A hand matches when the resulting stream is not empty.

pub mod combinations;
pub mod hypothesis;
pub mod node;
pub mod validation;

pub use combinations::{binomial, combinations};
pub use hypothesis::Match;
pub use node::Matcher;
pub use validation::Validation;

/// Read-only lookups a matcher needs while validating or matching
pub trait MatcherContext {
    /// Declared matcher with the given name, if it can be resolved
    fn matcher(&self, name: &str) -> Option<&Matcher>;

    /// Whether the card belongs to the deck being evaluated
    fn has_card(&self, card: &str) -> bool;
}

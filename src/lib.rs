pub mod cards;
pub mod matcher;
pub mod parser;
pub mod rng;
pub mod rules;
pub mod simulation;

#[cfg(test)]
mod integration_tests;

pub use cards::{CardSet, Deck};
pub use matcher::{Match, Matcher, Validation};
pub use parser::{DeclaredMatcher, ParseError};
pub use rules::Rules;
pub use simulation::{SimulationConfig, SimulationResult, Simulator};

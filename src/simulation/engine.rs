//! Monte-Carlo driver: shuffle, draw, find the first matching criterion, tally.

use crate::cards::Deck;
use crate::rng::SimRng;
use crate::rules::Rules;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimulationError {
    #[error("rules contain {parse_errors} parse error(s) and {validation_errors} validation error(s)")]
    InvalidRules {
        parse_errors: usize,
        validation_errors: usize,
    },
    #[error("no deck to simulate")]
    NoDeck,
}

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Hands drawn per deck variant
    pub iterations: usize,
    /// Cards per hand
    pub draw: usize,
    /// Base seed; trial `i` of variant `d` uses `seed + d * iterations + i`
    pub seed: Option<u64>,
    /// Spread trials over the rayon thread pool
    pub parallel: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            iterations: 1000,
            draw: 7,
            seed: None,
            parallel: true,
        }
    }
}

/// Aggregated counts. `match_counts[c][d]` is the number of hands of deck
/// variant `d` whose first matching criterion was `criteria[c]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub iterations: usize,
    pub draw: usize,
    pub seed: u64,
    pub criteria: Vec<String>,
    pub deck_sizes: Vec<usize>,
    pub match_counts: Vec<Vec<usize>>,
    pub no_match_counts: Vec<usize>,
}

impl SimulationResult {
    pub fn deck_count(&self) -> usize {
        self.deck_sizes.len()
    }

    /// Count for the criterion at `index` in declaration order
    pub fn count(&self, criterion: usize, deck: usize) -> usize {
        self.match_counts[criterion][deck]
    }

    /// Count for the first criterion with the given name
    pub fn count_by_name(&self, name: &str, deck: usize) -> Option<usize> {
        let index = self.criteria.iter().position(|c| c == name)?;
        Some(self.count(index, deck))
    }

    pub fn no_match(&self, deck: usize) -> usize {
        self.no_match_counts[deck]
    }

    /// Fraction of hands, in [0, 1]
    pub fn ratio(&self, count: usize) -> f64 {
        if self.iterations == 0 {
            0.0
        } else {
            count as f64 / self.iterations as f64
        }
    }
}

/// Per-worker partial sums for one deck variant
#[derive(Debug, Clone)]
struct Tally {
    matches: Vec<usize>,
    no_match: usize,
}

impl Tally {
    fn new(criteria: usize) -> Self {
        Tally {
            matches: vec![0; criteria],
            no_match: 0,
        }
    }

    fn record(mut self, outcome: Option<usize>) -> Self {
        match outcome {
            Some(index) => self.matches[index] += 1,
            None => self.no_match += 1,
        }
        self
    }

    fn merge(mut self, other: Tally) -> Self {
        for (total, count) in self.matches.iter_mut().zip(other.matches) {
            *total += count;
        }
        self.no_match += other.no_match;
        self
    }
}

pub struct Simulator<'a> {
    rules: &'a Rules,
    config: SimulationConfig,
}

impl<'a> Simulator<'a> {
    pub fn new(rules: &'a Rules, config: SimulationConfig) -> Self {
        Simulator { rules, config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Index of the criterion matched by one shuffled hand, if any
    pub fn run_trial(&self, deck: &Deck, rng: &mut SimRng) -> Option<usize> {
        let hand = deck.main.shuffle(rng).draw(self.config.draw);
        self.rules.matching_index(&hand)
    }

    /// Simulate every deck variant
    pub fn simulate(&self, decks: &[Deck]) -> SimulationResult {
        self.simulate_observed(decks, &|| {})
    }

    /// Like `simulate`, calling `on_trial` after every hand
    pub fn simulate_observed(&self, decks: &[Deck], on_trial: &(dyn Fn() + Sync)) -> SimulationResult {
        let seed = self.config.seed.unwrap_or_else(|| SimRng::new(None).seed());
        let criteria = self.rules.criteria().len();
        let iterations = self.config.iterations;

        let tallies: Vec<Tally> = decks
            .iter()
            .enumerate()
            .map(|(d, deck)| {
                let offset = seed.wrapping_add((d * iterations) as u64);
                let trial = |tally: Tally, i: usize| {
                    let mut rng = SimRng::for_trial(offset, i as u64);
                    let outcome = self.run_trial(deck, &mut rng);
                    on_trial();
                    tally.record(outcome)
                };
                if self.config.parallel {
                    (0..iterations)
                        .into_par_iter()
                        .fold(|| Tally::new(criteria), trial)
                        .reduce(|| Tally::new(criteria), Tally::merge)
                } else {
                    (0..iterations).fold(Tally::new(criteria), trial)
                }
            })
            .collect();

        let mut match_counts = vec![Vec::with_capacity(decks.len()); criteria];
        for tally in &tallies {
            for (counts, count) in match_counts.iter_mut().zip(&tally.matches) {
                counts.push(*count);
            }
        }

        SimulationResult {
            iterations,
            draw: self.config.draw,
            seed,
            criteria: self.rules.criteria().iter().map(|c| c.name.clone()).collect(),
            deck_sizes: decks.iter().map(|deck| deck.main.size()).collect(),
            match_counts,
            no_match_counts: tallies.iter().map(|t| t.no_match).collect(),
        }
    }

    /// Refuse to simulate broken rules
    pub fn simulate_strict(&self, decks: &[Deck]) -> Result<SimulationResult, SimulationError> {
        if self.rules.has_errors() {
            return Err(SimulationError::InvalidRules {
                parse_errors: self.rules.parse_errors().len(),
                validation_errors: self.rules.validation().errors.len(),
            });
        }
        if decks.is_empty() {
            return Err(SimulationError::NoDeck);
        }
        Ok(self.simulate(decks))
    }
}

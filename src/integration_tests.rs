//! End-to-end tests: deck text and rule text in, simulation counts out

use crate::cards::parse_deck;
use crate::rules::Rules;
use crate::simulation::{format_table, SimulationConfig, Simulator};

const DECK: &str = "\
# main deck
4x [set] sol ring
2 fireball
4 Mountain

SB: 3 Pyroblast
";

#[test]
fn test_deck_list_end_to_end() {
    let deck = parse_deck("4x [set] sol ring\n2 fireball");
    assert_eq!(deck.main.size(), 6);
    assert_eq!(deck.main.count("sol ring"), 4);
    assert_eq!(deck.main.count("fireball"), 2);
}

#[test]
fn test_ring_hit_rate() {
    let deck = parse_deck(DECK);
    assert_eq!(deck.main.size(), 10);
    assert_eq!(deck.side.size(), 3);

    let mut rules = Rules::parse("<<have ring>>: [sol ring]\n<<have fireball>>: [fireball]\n");
    rules.validate_against(std::slice::from_ref(&deck));
    assert!(!rules.has_errors());
    assert!(rules.validation().warnings.is_empty());

    let config = SimulationConfig {
        iterations: 1000,
        draw: 7,
        seed: Some(12345),
        parallel: true,
    };
    let result = Simulator::new(&rules, config).simulate(&[deck]);

    let ring = result.count_by_name("have ring", 0).expect("criterion exists");
    let fireball = result.count_by_name("have fireball", 0).expect("criterion exists");
    // 7 of 10 cards without any of the 4 rings: C(6,7) = 0, so every hand has one
    assert_eq!(ring, 1000);
    assert_eq!(ring + fireball + result.no_match(0), 1000);
}

#[test]
fn test_plausible_hit_rate_in_bigger_deck() {
    let deck = parse_deck("4 Sol Ring\n56 Island\n");
    let rules = Rules::parse("<<have ring>>: [sol ring]");
    let config = SimulationConfig {
        iterations: 2000,
        draw: 7,
        seed: Some(7),
        parallel: true,
    };
    let result = Simulator::new(&rules, config).simulate(&[deck]);

    // Exact probability of at least one ring is about 39.9%
    let ratio = result.ratio(result.count(0, 0));
    assert!(ratio > 0.33 && ratio < 0.47, "ratio {} out of range", ratio);
    assert_eq!(result.count(0, 0) + result.no_match(0), 2000);
}

#[test]
fn test_combinatorial_rules_against_variants() {
    let rules = Rules::parse(
        "\
<land>: [forest] | [island]
<threat>: [delver] | [goyf]
<<nut draw>>: 2<land> & @xof(2)(<threat> [counterspell] [brainstorm])
<<keepable>>: @atleast(2)(<land> <threat> [brainstorm])
<<mulligan>>: @not(<land>)
",
    );
    assert!(!rules.has_errors(), "{:?}", rules.parse_errors());

    let lands = parse_deck("20 Forest\n20 Island\n");
    let threats = parse_deck("30 Delver\n30 Goyf\n");
    let config = SimulationConfig {
        iterations: 200,
        draw: 7,
        seed: Some(99),
        parallel: false,
    };
    let result = Simulator::new(&rules, config).simulate(&[lands, threats]);

    // Lands only: never two matchers of the keepable list, never "not a land"
    assert_eq!(result.no_match(0), 200);
    // Threats only: no land at all, so only the mulligan criterion matches
    assert_eq!(result.count_by_name("mulligan", 1), Some(200));

    let table = format_table(&result);
    assert!(table.contains("alt.1 (60 cards)"));
    assert!(table.contains("mulligan"));
}

#[test]
fn test_hand_checks_through_rules() {
    use crate::cards::CardSet;

    let rules = Rules::parse("<<four of a kind>>: 4[ace] | 4[king]\n<<pair>>: 2[ace] | 2[king]");
    let hand = CardSet::of(["ace", "ace", "king", "ace", "ace"]);
    assert_eq!(rules.matches(&hand).map(|c| c.name.as_str()), Some("four of a kind"));

    let hand = CardSet::of(["ace", "king", "king"]);
    assert_eq!(rules.matches(&hand).map(|c| c.name.as_str()), Some("pair"));
}

#[test]
fn test_huge_repetition_count_answers_quickly() {
    use crate::cards::CardSet;

    let rules = Rules::parse("<<k>>: 100000000000[forest]");
    assert!(!rules.has_errors());

    let started = std::time::Instant::now();
    assert!(rules.matches(&CardSet::of(["forest", "island"])).is_none());
    assert!(started.elapsed() < std::time::Duration::from_secs(5));
}

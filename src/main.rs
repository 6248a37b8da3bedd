use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use perfect_hand::cards::{load_deck_file, Deck};
use perfect_hand::rules::Rules;
use perfect_hand::simulation::{format_table, SimulationConfig, Simulator};

#[derive(Parser)]
#[command(name = "perfect-hand")]
#[command(about = "Opening hand statistics for a deck and a set of keeping rules", long_about = None)]
struct Cli {
    /// Deck file to test
    #[arg(short = 'D', long)]
    deck: String,

    /// Alternative deck files, simulated side by side with the main deck
    #[arg(short, long)]
    alt: Vec<String>,

    /// Rules file (one matcher declaration per line)
    #[arg(short = 'R', long)]
    rules: String,

    /// Number of hands drawn per deck
    #[arg(short = 'I', long, default_value = "1000")]
    iterations: usize,

    /// Cards per hand
    #[arg(short, long, default_value = "7")]
    draw: usize,

    /// Seed for random number generator (for reproducibility)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop when the rules contain errors
    #[arg(long)]
    strict: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Show a progress bar while simulating
    #[arg(long)]
    progress: bool,

    /// Run trials on a single thread
    #[arg(long)]
    sequential: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut decks = Vec::with_capacity(1 + cli.alt.len());
    for path in std::iter::once(&cli.deck).chain(&cli.alt) {
        decks.push(load_deck(path));
    }

    let mut rules = match Rules::from_file(&cli.rules) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("✗ Failed to load rules '{}': {}", cli.rules, e);
            std::process::exit(1);
        }
    };
    rules.validate_against(&decks);
    if rules.is_empty() {
        eprintln!("✗ No matcher declared in {}", cli.rules);
    }
    eprintln!(
        "✓ Loaded {} matchers ({} criteria) from {}",
        rules.len(),
        rules.criteria().len(),
        cli.rules
    );

    report_problems(&rules);
    if cli.strict && rules.has_errors() {
        eprintln!("✗ Rules contain errors, aborting (--strict)");
        std::process::exit(1);
    }

    let config = SimulationConfig {
        iterations: cli.iterations,
        draw: cli.draw,
        seed: cli.seed,
        parallel: !cli.sequential,
    };
    let simulator = Simulator::new(&rules, config);

    let start = std::time::Instant::now();
    let result = if cli.progress {
        let bar = ProgressBar::new((cli.iterations * decks.len()) as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} hands ({eta})") {
            bar.set_style(style);
        }
        let result = simulator.simulate_observed(&decks, &|| bar.inc(1));
        bar.finish_and_clear();
        result
    } else {
        simulator.simulate(&decks)
    };
    let elapsed = start.elapsed();

    if cli.json {
        match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("✗ Failed to serialize results: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("\n=== STATS ({} hands of {} cards, seed {}) ===\n", result.iterations, result.draw, result.seed);
        print!("{}", format_table(&result));
    }

    eprintln!(
        "\nSimulation completed in {:.2?} ({:.0} hands/sec)",
        elapsed,
        (result.iterations * decks.len()) as f64 / elapsed.as_secs_f64()
    );
}

fn load_deck(path: &str) -> Deck {
    match load_deck_file(path) {
        Ok(deck) => {
            eprintln!(
                "✓ Loaded deck {}: {} cards ({} in sideboard)",
                path,
                deck.main.size(),
                deck.side.size()
            );
            deck
        }
        Err(e) => {
            eprintln!("✗ Failed to parse deck file '{}': {}", path, e);
            std::process::exit(1);
        }
    }
}

fn report_problems(rules: &Rules) {
    if !rules.parse_errors().is_empty() {
        eprintln!("\n=== PARSE ERRORS ===");
        for error in rules.parse_errors() {
            eprintln!("{}\n", error);
        }
    }
    let validation = rules.validation();
    if !validation.errors.is_empty() {
        eprintln!("\n=== ERRORS ===");
        for message in &validation.errors {
            eprintln!("-> {}", message);
        }
    }
    if !validation.warnings.is_empty() {
        eprintln!("\n=== WARNINGS ===");
        for message in &validation.warnings {
            eprintln!("-> {}", message);
        }
    }
}

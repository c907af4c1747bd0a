use std::io::{self, Read};

use hiero_rule_extractor::cli::{Cli, CommandFactory, Commands, Parser};
use hiero_rule_extractor::cli_format::parse_scenario;
use hiero_rule_extractor::Extractor;

fn main() {
    env_logger_init();
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Extract) => {
            if let Err(err) = run_extract() {
                eprintln!("error: {err}");
                std::process::exit(1);
            }
        }
        None => {
            Cli::command()
                .print_help()
                .expect("Couldn't print help to stdout");
        }
    }
}

fn run_extract() -> Result<(), Box<dyn std::error::Error>> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let scenario = parse_scenario(&input)?;
    let extractor = Extractor::new(
        scenario.config,
        &scenario.source_corpus,
        &scenario.target_corpus,
        &scenario.alignments,
        &scenario.lex_probs,
    );

    let rules = extractor.extract_rules(&scenario.source_pattern, &scenario.occurrences);
    for rule in rules {
        println!("{rule}");
    }

    Ok(())
}

/// Wires up `env_logger` the way the library's `log` diagnostics expect a
/// caller to; a no-op if `RUST_LOG` is unset.
fn env_logger_init() {
    let _ = env_logger::try_init();
}

pub use clap::{CommandFactory, Parser};

use clap::Subcommand;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reads a toy scenario (config, corpus, alignment, pattern, occurrences)
    /// from stdin and prints the extracted rules to stdout.
    Extract,
}

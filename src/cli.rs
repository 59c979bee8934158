use std::path::PathBuf;

use clap::Parser;

use crate::grammar::Markers;

#[derive(Parser)]
#[command(version, about = "Analyzes an LL(1) grammar and parses a sentence with its predictive table")]
pub struct Cli {
    /// File with the production count, the productions and the sentence (`-` for stdin)
    pub file: PathBuf,

    /// Start symbol (default: head of the first production)
    #[arg(short, long, value_name = "SYMBOL")]
    pub start: Option<String>,

    /// Character written for the empty alternative
    #[arg(long, value_name = "CHAR", default_value_t = '?')]
    pub epsilon: char,

    /// Character appended to the input and used as end of input
    #[arg(long, value_name = "CHAR", default_value_t = '#')]
    pub end_marker: char,

    /// Sentence to parse instead of the one in the file
    #[arg(short = 'w', long, value_name = "SENTENCE")]
    pub sentence: Option<String>,

    /// Also generate this many random sentences and parse them
    #[arg(short = 'n', long, value_name = "AMOUNT")]
    pub generate: Option<u32>,

    /// Print every note of the log, not only warnings
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn markers(&self) -> Markers {
        Markers { epsilon: self.epsilon, end: self.end_marker }
    }
}

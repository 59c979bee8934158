mod analysis;
mod cli;
mod error_handling;
mod generator;
mod grammar;
mod input;
mod log;
mod pipeline;
mod predictive;
mod reader;
mod report;
mod transform;


use std::process::exit;

use clap::Parser;

use crate::cli::Cli;
use crate::error_handling::Location;
use crate::generator::Generator;
use crate::log::{Log, Logger, Severity};
use crate::pipeline::{Analysis, Pipeline};
use crate::report::Report;

// Depth after which generated sentences take the shortest way out
const GENERATE_BUDGET: usize = 8;

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    exit(1);
}

fn print_log(log: &Log, verbose: bool) {
    for diagnostic in log.diagnostics() {
        if verbose || diagnostic.severity != Severity::Note {
            eprintln!("{}", diagnostic);
        }
    }
}

// Random sentences of the grammar as written, checked against the final table
fn generate(analysis: &Analysis, amount: u32, log: &mut Log) {
    let generator = Generator::new(&analysis.original, GENERATE_BUDGET);
    let mut rng = rand::thread_rng();

    println!("GENERATE_START#");
    for _ in 0..amount {
        match generator.generate(&mut rng) {
            Ok(sentence) => {
                let verdict = if analysis.parse(&sentence).accepted() { "accept" } else { "reject" };
                println!("{}\t{}", sentence, verdict);
            }
            Err(error) => {
                log.add_error(error.to_string());
                break;
            }
        }
    }
    println!("GENERATE_END#");
}

fn main() {
    let cli = Cli::parse();

    let markers = cli.markers();
    if markers.epsilon == markers.end || markers.epsilon == '|' || markers.end == '|' {
        fail("\x1b[31;49;1m[options]\x1b[39;49;1m  The epsilon and end markers must be two different characters other than `|`\x1b[0m");
    }

    let problem = input::read_file(&cli.file).unwrap_or_else(|error| fail(error));
    let sentence = cli.sentence.clone().unwrap_or(problem.sentence);

    let analysis = Pipeline::new(markers)
        .with_start(cli.start.clone())
        .run_located(problem.productions, Location::in_file(cli.file.clone(), 0), &sentence)
        .unwrap_or_else(|error| fail(error));

    print_log(&analysis.log, cli.verbose);
    print!("{}", Report::new(&analysis));

    if let Some(amount) = cli.generate {
        let mut log = Log::new();
        generate(&analysis, amount, &mut log);
        print_log(&log, cli.verbose);
    }
}

/*
    This module chains the stages: read, remove left recursion, prune,
    derive relations, check LL(1), build the table and parse
*/

use std::fmt::Display;

use itertools::Itertools;

use crate::analysis::{is_ll1, PredictiveTable, Relations};
use crate::error_handling::Location;
use crate::grammar::{Grammar, Markers};
use crate::log::Log;
use crate::predictive::{self, Trace};
use crate::reader::{self, FormatErrors};
use crate::transform::{self, NameAllocator, TransformErrorType};

/// Structural grammar errors. They end the run before any table exists.
#[derive(Debug, PartialEq)]
pub enum PipelineError {
    Format(FormatErrors),
    Transform(TransformErrorType),
}

impl Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Format(errors) => write!(f, "{}", errors.iter().join("\n")),
            PipelineError::Transform(error) => write!(f, "\x1b[31;49;1m[grammar]\x1b[39;49;1m  {}\x1b[0m", error),
        }
    }
}

/// Everything the stages produced for one grammar and sentence.
#[derive(Debug)]
pub struct Analysis {
    pub original: Grammar,
    pub grammar: Grammar,
    pub relations: Relations,
    pub ll1: bool,
    pub table: PredictiveTable,
    pub trace: Trace,
    pub log: Log,
}

impl Analysis {
    // Runs the stack machine on another sentence with the same table
    pub fn parse(&self, sentence: &str) -> Trace {
        predictive::parse(&self.grammar, &self.table, sentence)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    markers: Markers,
    start: Option<String>,
}

impl Pipeline {
    pub fn new(markers: Markers) -> Self {
        Pipeline { markers, start: None }
    }

    pub fn with_start(mut self, start: Option<String>) -> Self {
        self.start = start;
        self
    }

    #[cfg(test)]
    pub fn run<S: AsRef<str>>(&self, productions: &[S], sentence: &str) -> Result<Analysis, PipelineError> {
        let original = reader::read_productions(productions, self.start.as_deref(), self.markers)
            .map_err(PipelineError::Format)?;
        self.analyze(original, sentence)
    }

    pub fn run_located(&self, productions: Vec<(Location, String)>, origin: Location, sentence: &str) -> Result<Analysis, PipelineError> {
        let original = reader::read_located(productions, self.start.as_deref(), origin, self.markers)
            .map_err(PipelineError::Format)?;
        self.analyze(original, sentence)
    }

    pub fn analyze(&self, original: Grammar, sentence: &str) -> Result<Analysis, PipelineError> {
        let mut log = Log::new();

        let allocator = NameAllocator::for_grammar(&original);
        let (without_recursion, _) = transform::remove_left_recursion(&original, allocator, &mut log)
            .map_err(PipelineError::Transform)?;
        let grammar = transform::prune_unreachable(&without_recursion, &mut log);

        let relations = Relations::compute(&grammar);
        let ll1 = is_ll1(&grammar, &relations, &mut log);
        let table = PredictiveTable::build(&grammar, &relations, &mut log);
        let trace = predictive::parse(&grammar, &table, sentence);

        return Ok(Analysis { original, grammar, relations, ll1, table, trace, log });
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use rand::prelude::*;
    use rand::rngs::StdRng;

    use crate::generator::Generator;
    use crate::input;
    use crate::log::Severity;
    use crate::predictive::{Action, Outcome};
    use crate::reader::{FormatError, FormatErrorType};

    use super::*;

    const EXPRESSIONS: [&str; 3] = ["E->E+T|T", "T->T*F|F", "F->(E)|i"];

    fn run_file(name: &str) -> Result<Analysis, PipelineError> {
        let path = PathBuf::from("example_data").join(name);
        let problem = input::read_file(&path).unwrap();
        Pipeline::default().run_located(problem.productions, Location::in_file(path, 0), &problem.sentence)
    }

    #[test]
    fn removes_recursion_of_sum() {
        let analysis = Pipeline::default().run(&["E->E+T|T"], "T+T").unwrap();
        assert_eq!(analysis.grammar.to_string(), "E->TA\nA->+TA|?\n");
        assert!(analysis.ll1);
        assert!(analysis.trace.accepted());
        assert!(!analysis.parse("T+").accepted());
    }

    #[test]
    fn expressions_end_to_end() {
        let analysis = Pipeline::default().run(&EXPRESSIONS, "i+i*i").unwrap();
        assert_eq!(analysis.grammar.to_string(), "E->TA\nT->FB\nF->(E)|i\nA->+TA|?\nB->*FB|?\n");
        assert!(analysis.ll1);
        assert_eq!(analysis.trace.outcome, Outcome::Accept);

        let last = analysis.trace.steps.last().unwrap();
        assert_eq!(last.action, Action::Consume);
        assert_eq!(last.stack.len(), 1);

        assert_eq!(analysis.parse("i+").outcome, Outcome::RejectIncomplete);
        assert!(matches!(analysis.parse("i i").outcome, Outcome::RejectNoEntry { .. }));
        assert!(analysis.parse("(i+i)*i").accepted());
    }

    #[test]
    fn removal_preserves_language() {
        let analysis = Pipeline::default().run(&EXPRESSIONS, "").unwrap();
        let generator = Generator::new(&analysis.original, 6);
        let mut rng = StdRng::seed_from_u64(2024);

        for _ in 0..100 {
            let sentence = generator.generate(&mut rng).unwrap();
            assert!(analysis.parse(&sentence).accepted(), "rejected {}", sentence);
        }
    }

    #[test]
    fn start_override_prunes_the_rest() {
        let analysis = Pipeline::default()
            .with_start(Some("T".to_string()))
            .run(&EXPRESSIONS, "i*(i)")
            .unwrap();
        assert_eq!(analysis.grammar.to_string(), "E->TA\nT->FB\nF->(E)|i\nA->+TA|?\nB->*FB|?\n");
        assert_eq!(analysis.grammar.name(analysis.grammar.start()), "T");
        assert!(analysis.trace.accepted());

        let analysis = Pipeline::default()
            .with_start(Some("F".to_string()))
            .run(&["S->Fa", "F->b"], "b")
            .unwrap();
        assert_eq!(analysis.grammar.to_string(), "F->b\n");
        assert!(analysis.trace.accepted());
    }

    #[test]
    fn not_ll1_still_builds_a_table() {
        let analysis = Pipeline::default().run(&["S->a|a"], "a").unwrap();
        assert!(!analysis.ll1);
        assert_eq!(analysis.table.len(), 1);
        assert!(analysis.trace.accepted());
        assert!(!analysis.log.messages(Severity::Warning).is_empty());
    }

    #[test]
    fn ll1_grammar_passes() {
        let analysis = Pipeline::default().run(&["S->aA|bB", "A->c", "B->d"], "bd").unwrap();
        assert!(analysis.ll1);
        assert!(analysis.trace.accepted());
    }

    #[test]
    fn format_errors_abort() {
        let error = Pipeline::default().run(&["S->a", "SS"], "a").unwrap_err();
        let PipelineError::Format(errors) = error else { panic!("expected format errors") };
        assert_eq!(errors[0].error, FormatErrorType::MissingArrow);
        assert_eq!(errors[0].location, Location::line(2));
    }

    #[test]
    fn degenerate_recursion_aborts() {
        let error = Pipeline::default().run(&["S->Sa"], "a").unwrap_err();
        assert_eq!(error, PipelineError::Transform(TransformErrorType::DegenerateRecursion("S".to_string())));
    }

    #[test]
    fn custom_markers() {
        let markers = Markers { epsilon: 'e', end: '$' };
        let analysis = Pipeline::new(markers).run(&["S->aS|e"], "aa").unwrap();
        assert_eq!(analysis.grammar.to_string(), "S->aS|e\n");
        assert!(analysis.trace.accepted());
        assert_eq!(*analysis.trace.input.last().unwrap(), '$');
    }

    #[test]
    fn files_end_to_end() {
        let analysis = run_file("expressions.txt").unwrap();
        assert!(analysis.ll1);
        assert!(analysis.trace.accepted());

        let analysis = run_file("not_ll1.txt").unwrap();
        assert!(!analysis.ll1);
        // `aB` overwrites `aA` under `a`, so `ab` is lost
        assert!(matches!(analysis.trace.outcome, Outcome::RejectNoEntry { .. }));

        let analysis = run_file("unreachable.txt").unwrap();
        assert_eq!(analysis.grammar.to_string(), "S->aA\nA->b|?\n");
        assert_eq!(analysis.log.messages(Severity::Note).len(), 2);
        assert!(analysis.trace.accepted());
    }

    #[test]
    fn malformed_file_reports_every_line() {
        let PipelineError::Format(errors) = run_file("malformed.txt").unwrap_err() else {
            panic!("expected format errors")
        };
        let path = PathBuf::from("example_data/malformed.txt");
        assert_eq!(errors, vec![
            FormatError { location: Location::in_file(path.clone(), 3), error: FormatErrorType::MisplacedArrow },
            FormatError { location: Location::in_file(path, 4), error: FormatErrorType::MissingArrow },
        ]);
    }
}

/*
    This module renders an analysis as the sectioned text report
*/

use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::analysis::{Lookahead, LookaheadSet};
use crate::grammar::Grammar;
use crate::pipeline::Analysis;
use crate::predictive::{Action, Outcome, Trace};

const SECTIONS: [&str; 7] = ["CHECK", "PRODUCTIONS", "FIRST", "FOLLOW", "NULLABLE", "TABLE", "PROCESS"];

fn set_to_string(grammar: &Grammar, set: &LookaheadSet) -> String {
    set.iter().map(|l| l.name(grammar)).join(",")
}

fn stack_to_string(grammar: &Grammar, stack: &[Lookahead]) -> String {
    stack.iter().map(|l| l.name(grammar)).collect()
}

/// The reason and detail columns of the error line of a rejected trace.
pub fn rejection(grammar: &Grammar, outcome: &Outcome) -> Option<(&'static str, String)> {
    match outcome {
        Outcome::Accept => None,
        Outcome::RejectEarly => Some(("Symbol Stack is empty", "Input String not empty".to_string())),
        Outcome::RejectIncomplete => Some(("Symbol Stack not Empty", "Input String is empty".to_string())),
        Outcome::RejectNoEntry { top, current } => Some((
            "Not Found in Predictive Table",
            format!("{}, {}", top.name(grammar), current)
        )),
        Outcome::RejectDivergent { nonterminal, current } => Some((
            "Expansion does not Consume Input",
            format!("{}, {}", grammar.name(*nonterminal), current)
        )),
    }
}

// One line per step, then the error line if the sentence was rejected
pub fn trace_lines(grammar: &Grammar, trace: &Trace) -> Vec<String> {
    let mut lines = Vec::with_capacity(trace.steps.len() + 1);

    for step in trace.steps.iter() {
        let remaining: String = trace.input[step.cursor..].iter().collect();
        let action = match &step.action {
            Action::Expand(head, alt) => grammar.production_to_string(*head, alt),
            Action::Consume => "GETNEXT()".to_string(),
        };
        lines.push(format!("{}\t{}\t{}", stack_to_string(grammar, &step.stack), remaining, action));
    }

    if let Some((reason, detail)) = rejection(grammar, &trace.outcome) {
        lines.push(format!("ERROR\t{}\t{}", reason, detail));
    }

    return lines;
}

/// The text report of one analysis, one delimited section per stage.
pub struct Report<'a> {
    analysis: &'a Analysis,
}

impl<'a> Report<'a> {
    pub fn new(analysis: &'a Analysis) -> Self {
        Report { analysis }
    }

    fn section_lines(&self, section: &str) -> Vec<String> {
        let grammar = &self.analysis.grammar;
        let relations = &self.analysis.relations;

        match section {
            "CHECK" => vec![self.analysis.ll1.to_string()],
            "PRODUCTIONS" => grammar.nonterminals()
                .map(|(head, rewrite)| format!("{}->{}", grammar.name(head),
                    rewrite.iter().map(|alt| grammar.alternative_to_string(alt)).join("|")))
                .collect(),
            "FIRST" => grammar.ids()
                .map(|id| format!("{}:{}", grammar.name(id), set_to_string(grammar, relations.first(id))))
                .collect(),
            "FOLLOW" => grammar.ids()
                .map(|id| format!("{}:{}", grammar.name(id), set_to_string(grammar, relations.follow(id))))
                .collect(),
            "NULLABLE" => grammar.ids()
                .map(|id| format!("{}:{}", grammar.name(id), relations.nullable(id)))
                .collect(),
            "TABLE" => self.analysis.table.cells()
                .map(|(head, lookahead, alt)| format!("T({},{}) = {} -> {}",
                    grammar.name(head), lookahead.name(grammar),
                    grammar.name(head), grammar.alternative_to_string(alt)))
                .collect(),
            "PROCESS" => trace_lines(grammar, &self.analysis.trace),
            _ => Vec::new(),
        }
    }
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for section in SECTIONS {
            writeln!(f, "{}_START#", section)?;
            for line in self.section_lines(section) {
                writeln!(f, "{}", line)?;
            }
            writeln!(f, "{}_END#", section)?;
        }
        Ok(())
    }
}

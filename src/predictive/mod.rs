/*
    This module runs the LL(1) stack machine over an input sentence
*/

use crate::analysis::{Lookahead, PredictiveTable};
use crate::grammar::{Alternative, Grammar, SymId};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // The top of the stack was replaced by the alternative
    Expand(SymId, Alternative),
    // The top of the stack matched the current input symbol
    Consume,
}

/// One move of the machine, with the stack and cursor as they were before it.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub stack: Vec<Lookahead>,
    pub cursor: usize,
    pub action: Action,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    // Stack and input ran out together
    Accept,
    // The stack ran out while input remained
    RejectEarly,
    // The input ran out while the stack still expected symbols
    RejectIncomplete,
    // No table entry for the top of the stack and the current input symbol
    RejectNoEntry { top: Lookahead, current: char },
    // The table keeps expanding `nonterminal` without consuming any input
    RejectDivergent { nonterminal: SymId, current: char },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// The input sentence followed by the end-marker.
    pub input: Vec<char>,
    pub steps: Vec<Step>,
    pub outcome: Outcome,
}

impl Trace {
    pub fn accepted(&self) -> bool {
        self.outcome == Outcome::Accept
    }
}

// Input characters that name no grammar symbol can only cause a table miss
fn classify(grammar: &Grammar, c: char) -> Option<Lookahead> {
    if c == grammar.markers().end {
        return Some(Lookahead::End);
    }
    grammar.lookup(&c.to_string()).map(Lookahead::Sym)
}

/// Parses `sentence` with `table`, starting from `[end-marker, start]`.
/// There is no error recovery: the first failure ends the trace.
pub fn parse(grammar: &Grammar, table: &PredictiveTable, sentence: &str) -> Trace {
    let input: Vec<char> = sentence.chars().chain([grammar.markers().end]).collect();
    let tokens: Vec<Option<Lookahead>> = input.iter().map(|&c| classify(grammar, c)).collect();

    let mut stack = vec![Lookahead::End, Lookahead::Sym(grammar.start())];
    let mut cursor = 0;
    let mut steps = Vec::new();
    // Expansions since the last consume, as (non-terminal, stack length)
    let mut chain: Vec<(SymId, usize)> = Vec::new();

    let finish = |steps: Vec<Step>, outcome: Outcome| Trace { input: input.clone(), steps, outcome };

    while let (Some(&top), Some(&current)) = (stack.last(), tokens.get(cursor)) {
        if Some(top) == current {
            steps.push(Step { stack: stack.clone(), cursor, action: Action::Consume });
            stack.pop();
            cursor += 1;
            chain.clear();
            continue;
        }

        let entry = match (top, current) {
            (Lookahead::Sym(head), Some(lookahead)) => table.get(head, lookahead).map(|alt| (head, alt)),
            _ => None,
        };
        let Some((head, alt)) = entry else {
            let outcome = match cursor + 1 == input.len() {
                true => Outcome::RejectIncomplete,
                false => Outcome::RejectNoEntry { top, current: input[cursor] },
            };
            return finish(steps, outcome);
        };

        // Reaching `head` again without the stack ever dropping below the
        // previous expansion of it repeats the same moves forever
        while chain.last().is_some_and(|&(_, depth)| depth > stack.len()) {
            chain.pop();
        }
        if chain.iter().any(|&(nonterminal, _)| nonterminal == head) {
            return finish(steps, Outcome::RejectDivergent { nonterminal: head, current: input[cursor] });
        }
        chain.push((head, stack.len()));

        steps.push(Step { stack: stack.clone(), cursor, action: Action::Expand(head, alt.clone()) });
        stack.pop();
        stack.extend(alt.iter().rev().map(|&s| Lookahead::Sym(s)));
    }

    let outcome = match (stack.is_empty(), cursor == input.len()) {
        (true, true) => Outcome::Accept,
        (true, false) => Outcome::RejectEarly,
        (false, _) => Outcome::RejectIncomplete,
    };
    return finish(steps, outcome);
}

#[cfg(test)]
mod tests {
    use crate::analysis::Relations;
    use crate::grammar;
    use crate::log::Log;

    use super::*;

    fn expressions() -> Grammar {
        grammar::grammar(&[
            ("E", &["TA"]),
            ("A", &["+TA", "?"]),
            ("T", &["FB"]),
            ("B", &["*FB", "?"]),
            ("F", &["i"]),
        ])
    }

    fn run(g: &Grammar, sentence: &str) -> Trace {
        let rel = Relations::compute(g);
        let table = PredictiveTable::build(g, &rel, &mut Log::new());
        parse(g, &table, sentence)
    }

    fn actions(g: &Grammar, trace: &Trace) -> Vec<String> {
        trace.steps.iter().map(|step| match &step.action {
            Action::Expand(head, alt) => g.production_to_string(*head, alt),
            Action::Consume => "GETNEXT()".to_string(),
        }).collect()
    }

    #[test]
    fn accepts_expression() {
        let g = expressions();
        let trace = run(&g, "i+i*i");
        assert_eq!(trace.outcome, Outcome::Accept);

        let last = trace.steps.last().unwrap();
        assert_eq!(last.action, Action::Consume);
        assert_eq!(last.stack, vec![Lookahead::End]);
        assert_eq!(last.cursor, trace.input.len() - 1);
        assert_eq!(actions(&g, &trace)[..6], ["E->TA", "T->FB", "F->i", "GETNEXT()", "B->?", "A->+TA"]);
    }

    #[test]
    fn accepts_empty_sentence_of_nullable_start() {
        let g = grammar::grammar(&[("S", &["aS", "?"])]);
        let trace = run(&g, "");
        assert!(trace.accepted());
        assert_eq!(actions(&g, &trace), vec!["S->?", "GETNEXT()"]);
    }

    #[test]
    fn truncated_input_is_incomplete() {
        let g = expressions();
        let trace = run(&g, "i+");
        assert_eq!(trace.outcome, Outcome::RejectIncomplete);
        assert_eq!(trace.steps.last().unwrap().action, Action::Consume);
    }

    #[test]
    fn missing_operator_has_no_entry() {
        let g = expressions();
        let b = Lookahead::Sym(g.lookup("B").unwrap());

        let trace = run(&g, "i i");
        assert_eq!(trace.outcome, Outcome::RejectNoEntry { top: b, current: ' ' });

        let trace = run(&g, "ii");
        assert_eq!(trace.outcome, Outcome::RejectNoEntry { top: b, current: 'i' });
    }

    #[test]
    fn unmatched_terminal_has_no_entry() {
        let g = grammar::grammar(&[("S", &["ab"])]);
        let trace = run(&g, "ac");
        let b = Lookahead::Sym(g.lookup("b").unwrap());
        assert_eq!(trace.outcome, Outcome::RejectNoEntry { top: b, current: 'c' });
    }

    #[test]
    fn end_marker_inside_input_rejects_early() {
        let g = grammar::grammar(&[("S", &["a"])]);
        let trace = run(&g, "a#a");
        assert_eq!(trace.outcome, Outcome::RejectEarly);
        assert_eq!(trace.steps.len(), 3);
    }

    #[test]
    fn divergent_table_is_stopped() {
        // Left-recursive, so `Sa` claims `b` after `b` does and wins
        let g = grammar::grammar(&[("S", &["b", "Sa"])]);
        let trace = run(&g, "ba");
        let s = g.lookup("S").unwrap();
        assert_eq!(trace.outcome, Outcome::RejectDivergent { nonterminal: s, current: 'b' });
    }
}

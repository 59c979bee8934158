use itertools::Itertools;

use crate::grammar::{Grammar, SymId};
use crate::log::Logger;
use super::{LookaheadSet, Relations};

/// The first violation of the LL(1) condition found in a grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Conflict {
    // A nullable non-terminal whose FIRST and FOLLOW overlap
    FirstFollow { nonterminal: SymId, overlap: LookaheadSet },
    // Two alternatives, by index, whose FIRST sets overlap
    FirstFirst { nonterminal: SymId, left: usize, right: usize, overlap: LookaheadSet },
}

impl Conflict {
    pub fn describe(&self, grammar: &Grammar) -> String {
        let show = |set: &LookaheadSet| set.iter().map(|l| l.name(grammar)).join(",");
        match self {
            Conflict::FirstFollow { nonterminal, overlap } => format!(
                "`{}` is nullable and FIRST/FOLLOW share {}",
                grammar.name(*nonterminal), show(overlap)),
            Conflict::FirstFirst { nonterminal, left, right, overlap } => {
                let rewrite = grammar.rewrite(*nonterminal).map(Vec::as_slice).unwrap_or(&[]);
                let alt = |i: usize| rewrite.get(i).map(|a| grammar.alternative_to_string(a)).unwrap_or_default();
                format!("alternatives `{}` and `{}` of `{}` share {}",
                    alt(*left), alt(*right), grammar.name(*nonterminal), show(overlap))
            }
        }
    }
}

pub fn find_conflict(grammar: &Grammar, relations: &Relations) -> Option<Conflict> {
    for (nonterminal, rewrite) in grammar.nonterminals() {
        if relations.nullable(nonterminal) {
            let overlap: LookaheadSet = relations.first(nonterminal)
                .intersection(relations.follow(nonterminal))
                .copied()
                .collect();
            if !overlap.is_empty() {
                return Some(Conflict::FirstFollow { nonterminal, overlap });
            }
        }

        let firsts = rewrite.iter().map(|alt| relations.first_of(alt)).collect_vec();
        for ((left, a), (right, b)) in firsts.iter().enumerate().tuple_combinations() {
            let overlap: LookaheadSet = a.intersection(b).copied().collect();
            if !overlap.is_empty() {
                return Some(Conflict::FirstFirst { nonterminal, left, right, overlap });
            }
        }
    }

    return None;
}

/// Checks the LL(1) condition. A failed check is an outcome, not an error:
/// the table can still be built, with later alternatives winning.
pub fn is_ll1(grammar: &Grammar, relations: &Relations, log: &mut impl Logger) -> bool {
    match find_conflict(grammar, relations) {
        Some(conflict) => {
            log.add_warning(format!("grammar is not LL(1): {}", conflict.describe(grammar)));
            false
        }
        None => true
    }
}

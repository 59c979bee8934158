/*
    This module generates random sentences of a grammar
*/

use rand::prelude::*;
use std::fmt::Display;

use crate::grammar::*;
use crate::error_handling::*;

#[derive(Debug, PartialEq)]
pub enum GenerateErrorType {
    // The nonterminal derives no string of terminals
    Unproductive(String),
}

impl ErrorType for GenerateErrorType {}

impl Display for GenerateErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerateErrorType::Unproductive(nonterminal) => write!(f, "`{}` derives no sentence", nonterminal),
        }
    }
}

pub type GenResult = Result<String, GenerateErrorType>;

// Height of the shortest derivation tree of every symbol; None if there is none
fn derivation_heights(grammar: &Grammar) -> Vec<Option<usize>> {
    let mut heights: Vec<Option<usize>> = grammar.ids()
        .map(|id| if grammar.is_terminal(id) { Some(0) } else { None })
        .collect();

    let mut changed = true;
    while changed {
        changed = false;
        for (head, rewrite) in grammar.nonterminals() {
            let best = rewrite.iter().filter_map(|alt| alternative_height(alt, &heights)).min();
            if best.is_some() && (heights[head.index()].is_none() || best < heights[head.index()]) {
                heights[head.index()] = best;
                changed = true;
            }
        }
    }

    return heights;
}

fn alternative_height(alternative: &Alternative, heights: &[Option<usize>]) -> Option<usize> {
    alternative.iter()
        .map(|s| heights[s.index()])
        .try_fold(0, |max, h| h.map(|h| max.max(h)))
        .map(|h| h + 1)
}

/// Random sentence generation with a depth budget.
///
/// Within the budget any productive alternative may be picked; past it the
/// alternative with the shortest derivation is taken, so every sentence is
/// finite even for recursive grammars.
pub struct Generator<'g> {
    grammar: &'g Grammar,
    heights: Vec<Option<usize>>,
    budget: usize,
}

impl<'g> Generator<'g> {
    pub fn new(grammar: &'g Grammar, budget: usize) -> Self {
        Generator { grammar, heights: derivation_heights(grammar), budget }
    }

    pub fn is_productive(&self, symbol: SymId) -> bool {
        self.heights[symbol.index()].is_some()
    }

    pub fn generate(&self, rng: &mut impl Rng) -> GenResult {
        self.generate_with_override(self.grammar.start(), rng)
    }

    // Generates a sentence starting with the given symbol
    pub fn generate_with_override(&self, start: SymId, rng: &mut impl Rng) -> GenResult {
        if !self.is_productive(start) {
            return Err(GenerateErrorType::Unproductive(self.grammar.name(start).to_string()));
        }

        let mut result = String::new();
        self.generate_symbol(start, 0, rng, &mut result);
        return Ok(result);
    }

    fn generate_symbol(&self, symbol: SymId, depth: usize, rng: &mut impl Rng, result: &mut String) {
        let Some(rewrite) = self.grammar.rewrite(symbol) else {
            result.push_str(self.grammar.name(symbol));
            return;
        };

        let productive = rewrite.iter()
            .filter_map(|alt| alternative_height(alt, &self.heights).map(|h| (alt, h)))
            .collect::<Vec<_>>();
        let chosen = if depth < self.budget {
            productive.choose(rng)
        } else {
            productive.iter().min_by_key(|(_, h)| *h)
        };

        if let Some((alternative, _)) = chosen {
            for &s in alternative.iter() {
                self.generate_symbol(s, depth + 1, rng, result);
            }
        }
    }
}

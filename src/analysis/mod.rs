/*
    This module derives FIRST/FOLLOW/NULLABLE, checks LL(1) and builds the predictive table
*/

mod first_follow;
mod ll1;
mod table;

use crate::grammar::{Grammar, SymId};

pub use first_follow::{LookaheadSet, Relations};
#[cfg(test)]
pub use first_follow::Solver;
pub use ll1::is_ll1;
pub use table::PredictiveTable;

/// A terminal or the end-marker. The end-marker sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lookahead {
    End,
    Sym(SymId),
}

impl Lookahead {
    pub fn name(&self, grammar: &Grammar) -> String {
        match self {
            Lookahead::End => grammar.markers().end.to_string(),
            Lookahead::Sym(id) => grammar.name(*id).to_string(),
        }
    }
}

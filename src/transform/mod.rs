/*
    This module rewrites grammars: left recursion removal and pruning
*/

mod alloc;
mod left_recursion;
mod prune;

use std::fmt::Display;

use crate::error_handling::ErrorType;

pub use alloc::NameAllocator;
pub use left_recursion::remove_left_recursion;
pub use prune::prune_unreachable;

#[derive(Debug, PartialEq, Clone)]
pub enum TransformErrorType {
    // Every alternative of the non-terminal is left-recursive
    DegenerateRecursion(String),
    // Substituting leading non-terminals keeps exposing new ones
    DivergentSubstitution(String),
}

impl ErrorType for TransformErrorType {}

impl Display for TransformErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformErrorType::DegenerateRecursion(nonterminal) => write!(f, "Every alternative of `{}` is left-recursive", nonterminal),
            TransformErrorType::DivergentSubstitution(nonterminal) => write!(f, "Substitution of leading non-terminals in `{}` does not terminate", nonterminal),
        }
    }
}

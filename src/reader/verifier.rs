use crate::grammar::{GrammarBuilder, SymId};
use super::{FormatErrorType, Result};

// Resolves the start symbol: the requested one, or else the head of the
// first production. Either way it has to be a non-terminal.
pub fn verify_start(builder: &GrammarBuilder, requested: Option<&str>) -> Result<SymId> {
    let first_head = builder.first_head().ok_or(FormatErrorType::NoProductions)?;

    let Some(name) = requested else {
        return Ok(first_head);
    };

    let start = builder.lookup(name)
        .ok_or_else(|| FormatErrorType::UndefinedStart(name.to_string()))?;

    if !builder.is_nonterminal(start) {
        return Err(FormatErrorType::StartNotNonterminal(name.to_string()));
    }

    return Ok(start);
}

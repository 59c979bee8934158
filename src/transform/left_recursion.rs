use std::collections::HashMap;

use itertools::Itertools;

use crate::grammar::{Alternative, Grammar, Rewrite, SymId};
use crate::log::Logger;
use super::{NameAllocator, TransformErrorType};

// Upper bound on how often one non-terminal is rescanned after substitutions
const MAX_ROUNDS_PER_SYMBOL: usize = 256;

/// Removes left recursion.
///
/// Non-terminals are handled in symbol-table order. For the one at index
/// `i`, every alternative led by a non-terminal of smaller index is replaced
/// by that non-terminal's alternatives followed by the rest of the original
/// alternative, rescanning until no such lead remains. Direct recursion of
/// the non-terminal is then turned into right recursion through a fresh
/// non-terminal:
/// ```text
/// X -> X α1 | ... | X αm | β1 | ... | βn
/// ```
/// becomes
/// ```text
/// X  -> β1 X' | ... | βn X'
/// X' -> α1 X' | ... | αm X' | ε
/// ```
/// Non-terminals without left-recursive alternatives keep their alternatives
/// and get no fresh symbol. An alternative `X -> X` is dropped before the
/// split: its suffix is empty, so it would turn into `X' -> X'`, a new
/// left recursion. When it is the only recursive alternative, `X` keeps its
/// other alternatives and gets no fresh symbol either.
pub fn remove_left_recursion(
    grammar: &Grammar,
    mut allocator: NameAllocator,
    log: &mut impl Logger
) -> Result<(Grammar, NameAllocator), TransformErrorType> {
    let order = grammar.nonterminals().map(|(id, _)| id).collect_vec();
    let position: HashMap<SymId, usize> = order.iter().enumerate().map(|(i, &id)| (id, i)).collect();
    let mut result = grammar.clone();

    for (i, &head) in order.iter().enumerate() {
        substitute_backward_leads(&mut result, head, i, &position, log)?;
        remove_direct_recursion(&mut result, head, &mut allocator, log)?;
    }

    return Ok((result, allocator));
}

// Phase 1: no alternative of `head` may start with a non-terminal handled before it
fn substitute_backward_leads(
    grammar: &mut Grammar,
    head: SymId,
    index: usize,
    position: &HashMap<SymId, usize>,
    log: &mut impl Logger
) -> Result<(), TransformErrorType> {
    let backward = |alt: &Alternative| alt.first()
        .copied()
        .filter(|lead| position.get(lead).is_some_and(|&j| j < index));

    for _ in 0..MAX_ROUNDS_PER_SYMBOL {
        let rewrite = grammar.rewrite(head).cloned().unwrap_or_default();
        if !rewrite.iter().any(|alt| backward(alt).is_some()) {
            return Ok(());
        }

        let mut substituted = Rewrite::with_capacity(rewrite.len());
        for alt in rewrite {
            let Some(lead) = backward(&alt) else {
                substituted.push(alt);
                continue;
            };
            log.add_note(format!("substituting `{}` at the front of {}",
                grammar.name(lead), grammar.production_to_string(head, &alt)));
            let tail = &alt[1..];
            for lead_alt in grammar.rewrite(lead).into_iter().flatten() {
                substituted.push(lead_alt.iter().chain(tail).copied().collect());
            }
        }
        grammar.set_rewrite(head, substituted);
    }

    return Err(TransformErrorType::DivergentSubstitution(grammar.name(head).to_string()));
}

// Phase 2
fn remove_direct_recursion(
    grammar: &mut Grammar,
    head: SymId,
    allocator: &mut NameAllocator,
    log: &mut impl Logger
) -> Result<(), TransformErrorType> {
    let rewrite = grammar.rewrite(head).cloned().unwrap_or_default();
    let (recursive, rest): (Vec<_>, Vec<_>) = rewrite.into_iter()
        .partition(|alt| alt.first() == Some(&head));

    if recursive.is_empty() {
        return Ok(());
    }
    if rest.is_empty() {
        return Err(TransformErrorType::DegenerateRecursion(grammar.name(head).to_string()));
    }

    // `X -> X` derives nothing new
    let (cycles, recursive): (Vec<_>, Vec<_>) = recursive.into_iter().partition(|alt| alt.len() == 1);
    if !cycles.is_empty() {
        log.add_note(format!("dropping {}", grammar.production_to_string(head, &[head])));
    }
    if recursive.is_empty() {
        grammar.set_rewrite(head, rest);
        return Ok(());
    }

    let fresh_name = allocator.allocate();
    log.add_note(format!("introducing `{}` to remove the left recursion of `{}`", fresh_name, grammar.name(head)));
    let fresh = grammar.add_nonterminal(fresh_name, Rewrite::new());

    let betas = rest.into_iter()
        .map(|beta| beta.into_iter().chain([fresh]).collect())
        .collect();
    let alphas = recursive.into_iter()
        .map(|alpha| alpha[1..].iter().copied().chain([fresh]).collect())
        .chain([Alternative::new()])
        .collect();

    grammar.set_rewrite(head, betas);
    grammar.set_rewrite(fresh, alphas);
    return Ok(());
}

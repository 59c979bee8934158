use crate::grammar::Grammar;
use crate::log::Logger;

// Marks the non-terminals reachable from the start symbol
pub fn reachable(grammar: &Grammar) -> Vec<bool> {
    let mut visited = vec![false; grammar.len()];
    let mut stack = vec![grammar.start()];

    while let Some(symbol) = stack.pop() {
        if visited[symbol.index()] {
            continue;
        }
        visited[symbol.index()] = true;
        let targets = grammar.rewrite(symbol).into_iter()
            .flatten()
            .flatten()
            .filter(|&&s| grammar.is_nonterminal(s) && !visited[s.index()]);
        stack.extend(targets);
    }

    return visited;
}

/// Drops the non-terminals that can not be reached from the start symbol.
/// Terminals are always kept.
pub fn prune_unreachable(grammar: &Grammar, log: &mut impl Logger) -> Grammar {
    let visited = reachable(grammar);

    for (id, _) in grammar.nonterminals().filter(|(id, _)| !visited[id.index()]) {
        log.add_note(format!("removing unreachable non-terminal `{}`", grammar.name(id)));
    }

    grammar.retain(|id| grammar.is_terminal(id) || visited[id.index()])
}

use std::collections::BTreeMap;

use crate::grammar::{Alternative, Grammar, SymId};
use crate::log::Logger;
use super::{Lookahead, Relations};

/// The `(non-terminal, lookahead) -> alternative` table of a predictive parser.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PredictiveTable {
    rows: BTreeMap<SymId, BTreeMap<Lookahead, Alternative>>,
}

impl PredictiveTable {
    /// Fills the table alternative by alternative. When two alternatives
    /// claim the same cell, the later one stays and the replacement is
    /// logged.
    pub fn build(grammar: &Grammar, relations: &Relations, log: &mut impl Logger) -> Self {
        let mut rows = BTreeMap::new();

        for (head, rewrite) in grammar.nonterminals() {
            let row: &mut BTreeMap<Lookahead, Alternative> = rows.entry(head).or_default();
            // The end-marker cell of a nullable head starts out empty and is
            // free for the first alternative that claims it
            let mut end_seeded = relations.nullable(head);
            if end_seeded {
                row.insert(Lookahead::End, Alternative::new());
            }

            for alt in rewrite {
                // Only the leading symbol is looked at; the empty alternative
                // behaves like a nullable lead with an empty FIRST set
                let (first, lead_nullable) = match alt.first() {
                    Some(&lead) => (relations.first(lead).clone(), relations.nullable(lead)),
                    None => (Default::default(), true),
                };
                let follow = match lead_nullable {
                    true => relations.follow(head).clone(),
                    false => Default::default(),
                };

                for lookahead in first.into_iter().chain(follow) {
                    let previous = row.insert(lookahead, alt.clone());
                    if lookahead == Lookahead::End && end_seeded {
                        end_seeded = false;
                        continue;
                    }
                    if let Some(previous) = previous.filter(|previous| previous != alt) {
                        log.add_warning(format!("T({},{}): {} replaced by {}",
                            grammar.name(head), lookahead.name(grammar),
                            grammar.production_to_string(head, &previous),
                            grammar.production_to_string(head, alt)));
                    }
                }
            }
        }

        PredictiveTable { rows }
    }

    pub fn get(&self, nonterminal: SymId, lookahead: Lookahead) -> Option<&Alternative> {
        self.rows.get(&nonterminal)?.get(&lookahead)
    }

    /// Defined cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = (SymId, Lookahead, &Alternative)> {
        self.rows.iter()
            .flat_map(|(&head, row)| row.iter().map(move |(&lookahead, alt)| (head, lookahead, alt)))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }
}

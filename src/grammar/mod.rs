/*
    This module is for storing and manipulating grammars
*/

use std::fmt::Display;

use indexmap::IndexMap;
use itertools::Itertools;

// Interned identity of a grammar symbol: its position in the symbol table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymId(usize);

impl SymId {
    pub fn index(self) -> usize {
        self.0
    }
}

// The symbols in a single alternative. The empty alternative derives nothing.
pub type Alternative = Vec<SymId>;

// The alternatives of a non-terminal
pub type Rewrite = Vec<Alternative>;

#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Terminal,
    Nonterminal(Rewrite),
}

/// The two reserved characters of the production syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Markers {
    /// Written in a production body for the empty alternative.
    pub epsilon: char,
    /// Appended to every input and seeded in FOLLOW of the start symbol.
    pub end: char,
}

impl Default for Markers {
    fn default() -> Self {
        Markers { epsilon: '?', end: '#' }
    }
}

impl Markers {
    pub fn is_reserved(&self, c: char) -> bool {
        c == self.epsilon || c == self.end || c == '|'
    }
}

/// A context-free grammar over interned symbols.
///
/// Symbols keep the order in which they were first seen; fresh non-terminals
/// are appended at the end. A `Grammar` is never shared mutably between
/// stages: every transformation clones it and returns a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
    symbols: IndexMap<String, Symbol>,
    start: SymId,
    markers: Markers,
}

impl Grammar {
    pub fn builder(markers: Markers) -> GrammarBuilder {
        GrammarBuilder::new(markers)
    }

    pub fn start(&self) -> SymId {
        self.start
    }

    pub fn markers(&self) -> Markers {
        self.markers
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = SymId> {
        (0..self.symbols.len()).map(SymId)
    }

    pub fn name(&self, id: SymId) -> &str {
        self.symbols.get_index(id.0).map(|(name, _)| name.as_str()).unwrap_or("")
    }

    pub fn lookup(&self, name: &str) -> Option<SymId> {
        self.symbols.get_index_of(name).map(SymId)
    }

    pub fn symbol(&self, id: SymId) -> Option<&Symbol> {
        self.symbols.get_index(id.0).map(|(_, symbol)| symbol)
    }

    pub fn is_terminal(&self, id: SymId) -> bool {
        matches!(self.symbol(id), Some(Symbol::Terminal))
    }

    pub fn is_nonterminal(&self, id: SymId) -> bool {
        matches!(self.symbol(id), Some(Symbol::Nonterminal(_)))
    }

    pub fn rewrite(&self, id: SymId) -> Option<&Rewrite> {
        match self.symbol(id) {
            Some(Symbol::Nonterminal(rewrite)) => Some(rewrite),
            _ => None,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }

    /// Non-terminals in symbol-table order, with their alternatives.
    pub fn nonterminals(&self) -> impl Iterator<Item = (SymId, &Rewrite)> {
        self.symbols.values().enumerate().filter_map(|(i, symbol)| match symbol {
            Symbol::Nonterminal(rewrite) => Some((SymId(i), rewrite)),
            Symbol::Terminal => None,
        })
    }

    pub fn alternative_to_string(&self, alternative: &[SymId]) -> String {
        if alternative.is_empty() {
            return self.markers.epsilon.to_string();
        }
        alternative.iter().map(|&id| self.name(id)).collect()
    }

    pub fn production_to_string(&self, head: SymId, alternative: &[SymId]) -> String {
        format!("{}->{}", self.name(head), self.alternative_to_string(alternative))
    }

    pub(crate) fn set_rewrite(&mut self, id: SymId, rewrite: Rewrite) {
        if let Some((_, symbol)) = self.symbols.get_index_mut(id.0) {
            *symbol = Symbol::Nonterminal(rewrite);
        }
    }

    // Appends a non-terminal; the caller guarantees the name is unused
    pub(crate) fn add_nonterminal(&mut self, name: String, rewrite: Rewrite) -> SymId {
        let (index, _) = self.symbols.insert_full(name, Symbol::Nonterminal(rewrite));
        SymId(index)
    }

    /// Keeps the symbols accepted by `keep`, preserving their order and
    /// renumbering the identifiers. The start symbol is always kept.
    pub(crate) fn retain(&self, keep: impl Fn(SymId) -> bool) -> Grammar {
        let kept = self.ids().filter(|&id| id == self.start || keep(id)).collect_vec();
        let mut renumber = vec![None; self.len()];
        for (new, old) in kept.iter().enumerate() {
            renumber[old.0] = Some(SymId(new));
        }
        let remap = |alternative: &Alternative| -> Alternative {
            alternative.iter().filter_map(|id| renumber[id.0]).collect()
        };

        let symbols = kept.iter()
            .filter_map(|&id| self.symbols.get_index(id.0))
            .map(|(name, symbol)| {
                let symbol = match symbol {
                    Symbol::Terminal => Symbol::Terminal,
                    Symbol::Nonterminal(rewrite) => Symbol::Nonterminal(rewrite.iter().map(remap).collect()),
                };
                (name.clone(), symbol)
            })
            .collect();

        return Grammar {
            symbols,
            start: renumber[self.start.0].unwrap_or(SymId(0)),
            markers: self.markers,
        };
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (head, rewrite) in self.nonterminals() {
            let alternatives = rewrite.iter().map(|alt| self.alternative_to_string(alt)).join("|");
            writeln!(f, "{}->{}", self.name(head), alternatives)?;
        }
        Ok(())
    }
}

/// Collects productions into a symbol table.
///
/// Any name first seen in a body is registered as a terminal; naming it as
/// the head of a rule later turns it into a non-terminal. A second rule for
/// the same head replaces the alternatives of the first.
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    symbols: IndexMap<String, Symbol>,
    first_head: Option<SymId>,
    markers: Markers,
}

impl GrammarBuilder {
    pub fn new(markers: Markers) -> Self {
        GrammarBuilder {
            symbols: IndexMap::new(),
            first_head: None,
            markers,
        }
    }

    fn intern(&mut self, name: &str) -> SymId {
        match self.symbols.get_index_of(name) {
            Some(index) => SymId(index),
            None => SymId(self.symbols.insert_full(name.to_string(), Symbol::Terminal).0),
        }
    }

    pub fn add_rule<S: AsRef<str>>(&mut self, head: &str, alternatives: &[Vec<S>]) -> SymId {
        let head_id = self.intern(head);
        let rewrite: Rewrite = alternatives.iter()
            .map(|alt| alt.iter().map(|name| self.intern(name.as_ref())).collect())
            .collect();
        if let Some((_, symbol)) = self.symbols.get_index_mut(head_id.0) {
            *symbol = Symbol::Nonterminal(rewrite);
        }
        self.first_head.get_or_insert(head_id);
        return head_id;
    }

    /// Chainable form of [`GrammarBuilder::add_rule`] taking one character
    /// per symbol; the epsilon marker is dropped from bodies.
    #[cfg(test)]
    pub fn with_rules(mut self, head: &str, alternatives: &[&str]) -> Self {
        let epsilon = self.markers.epsilon;
        let alternatives = alternatives.iter()
            .map(|alt| alt.chars().filter(|&c| c != epsilon).map(String::from).collect_vec())
            .collect_vec();
        self.add_rule(head, &alternatives);
        self
    }

    pub fn lookup(&self, name: &str) -> Option<SymId> {
        self.symbols.get_index_of(name).map(SymId)
    }

    pub fn first_head(&self) -> Option<SymId> {
        self.first_head
    }

    pub fn is_nonterminal(&self, id: SymId) -> bool {
        matches!(self.symbols.get_index(id.0), Some((_, Symbol::Nonterminal(_))))
    }

    /// Finishes the table with the given start symbol.
    pub fn build(self, start: SymId) -> Grammar {
        Grammar {
            symbols: self.symbols,
            start,
            markers: self.markers,
        }
    }

    /// Finishes the table with the head of the first rule as start symbol.
    #[cfg(test)]
    pub fn build_default(self) -> Option<Grammar> {
        let start = self.first_head?;
        Some(self.build(start))
    }
}

#[cfg(test)]
pub(crate) fn grammar(rules: &[(&str, &[&str])]) -> Grammar {
    rules.iter()
        .fold(Grammar::builder(Markers::default()), |builder, (head, alts)| builder.with_rules(head, alts))
        .build_default()
        .expect("at least one rule")
}

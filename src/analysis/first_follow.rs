use std::collections::BTreeSet;

use crate::grammar::{Grammar, SymId};
use super::Lookahead;

pub type LookaheadSet = BTreeSet<Lookahead>;

/// FIRST, FOLLOW and NULLABLE of every symbol of one grammar.
///
/// The empty alternative is represented by an empty symbol string, so the
/// epsilon marker never needs to be stripped from the sets.
#[derive(Debug, Clone, PartialEq)]
pub struct Relations {
    first: Vec<LookaheadSet>,
    follow: Vec<LookaheadSet>,
    nullable: Vec<bool>,
}

impl Relations {
    pub fn compute(grammar: &Grammar) -> Relations {
        Solver::new(grammar).solve()
    }

    pub fn first(&self, symbol: SymId) -> &LookaheadSet {
        &self.first[symbol.index()]
    }

    pub fn follow(&self, symbol: SymId) -> &LookaheadSet {
        &self.follow[symbol.index()]
    }

    pub fn nullable(&self, symbol: SymId) -> bool {
        self.nullable[symbol.index()]
    }

    #[cfg(test)]
    pub fn is_nullable_string(&self, symbols: &[SymId]) -> bool {
        symbols.iter().all(|&s| self.nullable(s))
    }

    /// FIRST of a symbol string: the FIRST sets of its symbols up to and
    /// including the first one that is not nullable.
    pub fn first_of(&self, symbols: &[SymId]) -> LookaheadSet {
        let mut result = LookaheadSet::new();
        for &s in symbols {
            result.extend(self.first(s));
            if !self.nullable(s) {
                break;
            }
        }
        return result;
    }

    /// True when every set of `self` contains the matching set of `earlier`
    /// and no symbol went from nullable back to not nullable.
    #[cfg(test)]
    pub fn includes(&self, earlier: &Relations) -> bool {
        let sets_grow = |now: &[LookaheadSet], then: &[LookaheadSet]| {
            now.len() == then.len() && now.iter().zip(then).all(|(n, t)| n.is_superset(t))
        };
        sets_grow(&self.first, &earlier.first)
            && sets_grow(&self.follow, &earlier.follow)
            && self.nullable.iter().zip(&earlier.nullable).all(|(&n, &t)| n || !t)
    }
}

fn union_into(target: &mut LookaheadSet, source: &LookaheadSet) -> bool {
    let before = target.len();
    target.extend(source);
    target.len() != before
}

/// Fixed-point iteration over the three relations.
///
/// Every pass only adds to the sets and only sets flags, so the iteration
/// stops after finitely many passes.
pub struct Solver<'g> {
    grammar: &'g Grammar,
    relations: Relations,
    #[cfg_attr(not(test), allow(dead_code))]
    passes: usize,
}

impl<'g> Solver<'g> {
    pub fn new(grammar: &'g Grammar) -> Self {
        let first = grammar.ids()
            .map(|id| match grammar.is_terminal(id) {
                true => LookaheadSet::from([Lookahead::Sym(id)]),
                false => LookaheadSet::new(),
            })
            .collect();
        let mut follow = vec![LookaheadSet::new(); grammar.len()];
        follow[grammar.start().index()].insert(Lookahead::End);

        Solver {
            grammar,
            relations: Relations { first, follow, nullable: vec![false; grammar.len()] },
            passes: 0,
        }
    }

    #[cfg(test)]
    pub fn relations(&self) -> &Relations {
        &self.relations
    }

    #[cfg(test)]
    pub fn passes(&self) -> usize {
        self.passes
    }

    /// Runs one pass over all alternatives and tells whether anything changed.
    pub fn step(&mut self) -> bool {
        let grammar = self.grammar;
        let rel = &mut self.relations;
        let mut changed = false;

        for (head, rewrite) in grammar.nonterminals() {
            let x = head.index();
            for alt in rewrite {
                // FIRST and NULLABLE of the head
                let mut first = LookaheadSet::new();
                let mut all_nullable = true;
                for s in alt.iter().map(|s| s.index()) {
                    first.extend(&rel.first[s]);
                    if !rel.nullable[s] {
                        all_nullable = false;
                        break;
                    }
                }
                changed |= union_into(&mut rel.first[x], &first);
                if all_nullable && !rel.nullable[x] {
                    rel.nullable[x] = true;
                    changed = true;
                }

                // FOLLOW of every symbol in the alternative
                for (i, s) in alt.iter().map(|s| s.index()).enumerate() {
                    let mut trail = LookaheadSet::new();
                    let mut rest_nullable = true;
                    for t in alt[i + 1..].iter().map(|t| t.index()) {
                        trail.extend(&rel.first[t]);
                        if !rel.nullable[t] {
                            rest_nullable = false;
                            break;
                        }
                    }
                    if rest_nullable {
                        trail.extend(&rel.follow[x]);
                    }
                    changed |= union_into(&mut rel.follow[s], &trail);
                }
            }
        }

        self.passes += 1;
        return changed;
    }

    pub fn solve(mut self) -> Relations {
        while self.step() {}
        self.relations
    }
}

#[cfg(test)]
mod tests {
    use crate::grammar;

    use super::*;

    fn names(g: &Grammar, set: &LookaheadSet) -> String {
        set.iter().map(|l| match l {
            Lookahead::End => g.markers().end.to_string(),
            Lookahead::Sym(id) => g.name(*id).to_string(),
        }).collect()
    }

    fn expressions() -> Grammar {
        grammar::grammar(&[
            ("E", &["TA"]),
            ("A", &["+TA", "?"]),
            ("T", &["FB"]),
            ("B", &["*FB", "?"]),
            ("F", &["(E)", "i"]),
        ])
    }

    #[test]
    fn expression_relations() {
        let g = expressions();
        let rel = Relations::compute(&g);
        let id = |n: &str| g.lookup(n).unwrap();

        assert_eq!(names(&g, rel.first(id("E"))), "(i");
        assert_eq!(names(&g, rel.first(id("A"))), "+");
        assert_eq!(names(&g, rel.first(id("B"))), "*");
        assert_eq!(names(&g, rel.first(id("+"))), "+");

        assert_eq!(names(&g, rel.follow(id("E"))), "#)");
        assert_eq!(names(&g, rel.follow(id("A"))), "#)");
        assert_eq!(names(&g, rel.follow(id("T"))), "#+)");
        assert_eq!(names(&g, rel.follow(id("B"))), "#+)");
        assert_eq!(names(&g, rel.follow(id("F"))), "#+*)");
        assert_eq!(names(&g, rel.follow(id("i"))), "#+*)");

        assert!(rel.nullable(id("A")));
        assert!(rel.nullable(id("B")));
        assert!(!rel.nullable(id("E")));
        assert!(!rel.nullable(id("i")));
    }

    #[test]
    fn nullable_prefix_scan() {
        // S -> ABc with A and B nullable; sets list symbols in table order
        let g = grammar::grammar(&[("S", &["ABc"]), ("A", &["a", "?"]), ("B", &["b", "?"])]);
        let rel = Relations::compute(&g);
        let id = |n: &str| g.lookup(n).unwrap();

        assert_eq!(names(&g, rel.first(id("S"))), "cab");
        assert!(!rel.nullable(id("S")));
        assert_eq!(names(&g, rel.follow(id("A"))), "cb");
        assert_eq!(names(&g, rel.follow(id("B"))), "c");
        assert_eq!(names(&g, &rel.first_of(&[id("A"), id("B")])), "ab");
        assert!(rel.is_nullable_string(&[id("A"), id("B")]));
        assert!(rel.is_nullable_string(&[]));
    }

    #[test]
    fn follow_of_head_flows_through_nullable_tail() {
        let g = grammar::grammar(&[("S", &["Ad"]), ("A", &["aBC"]), ("B", &["b"]), ("C", &["?"])]);
        let rel = Relations::compute(&g);
        let id = |n: &str| g.lookup(n).unwrap();

        assert_eq!(names(&g, rel.follow(id("A"))), "d");
        assert_eq!(names(&g, rel.follow(id("B"))), "d");
        assert_eq!(names(&g, rel.follow(id("C"))), "d");
        assert_eq!(names(&g, rel.follow(id("S"))), "#");
    }

    #[test]
    fn nullable_through_chain() {
        let g = grammar::grammar(&[("S", &["AB"]), ("A", &["B"]), ("B", &["C"]), ("C", &["?"])]);
        let rel = Relations::compute(&g);
        assert!(g.ids().all(|id| rel.nullable(id)));
        assert!(g.ids().all(|id| rel.first(id).is_empty()));
    }

    #[test]
    fn passes_are_monotone() {
        let g = expressions();
        let mut solver = Solver::new(&g);
        let mut previous = solver.relations().clone();
        while solver.step() {
            assert!(solver.relations().includes(&previous));
            previous = solver.relations().clone();
        }
        assert_eq!(solver.relations(), &previous);
        assert!(solver.passes() > 1);
        assert_eq!(solver.relations(), &Relations::compute(&g));
    }
}

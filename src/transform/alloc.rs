use std::collections::HashSet;

use crate::grammar::Grammar;

/// Hands out non-terminal names that are not used in a grammar.
///
/// Candidates are tried in a fixed order: `A`..`Z`, then `a`..`z`, then
/// `N1`, `N2`, ... Every name handed out is remembered, so one allocator
/// never repeats itself.
#[derive(Debug, Clone, PartialEq)]
pub struct NameAllocator {
    used: HashSet<String>,
    next_numbered: usize,
}

impl NameAllocator {
    /// Seeds the allocator with the symbols of `grammar` and its markers.
    pub fn for_grammar(grammar: &Grammar) -> Self {
        let markers = grammar.markers();
        let used = grammar.names()
            .map(str::to_string)
            .chain([markers.epsilon.to_string(), markers.end.to_string(), "|".to_string()])
            .collect();

        NameAllocator { used, next_numbered: 1 }
    }

    #[cfg(test)]
    pub fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    pub fn allocate(&mut self) -> String {
        let letter = ('A'..='Z').chain('a'..='z')
            .map(String::from)
            .find(|name| !self.used.contains(name));

        let name = match letter {
            Some(name) => name,
            None => loop {
                let name = format!("N{}", self.next_numbered);
                self.next_numbered += 1;
                if !self.used.contains(&name) {
                    break name;
                }
            }
        };

        self.used.insert(name.clone());
        return name;
    }
}

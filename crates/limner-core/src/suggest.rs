use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::normalize::normalize_name;

/// The artist names a player may pick from.
///
/// Names keep their display form and their order (most popular first, as
/// handed over by the catalog); membership is decided on normalized names.
#[derive(Debug, Clone, Default)]
pub struct SuggestionIndex {
    names: Vec<String>,
    normalized: HashSet<String>,
}

impl SuggestionIndex {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::default();
        for name in names {
            let name = name.into();
            let key = normalize_name(&name);
            if key.is_empty() || !index.normalized.insert(key) {
                continue;
            }
            index.names.push(name);
        }
        index
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, guess: &str) -> bool {
        self.normalized.contains(&normalize_name(guess))
    }

    /// Names containing `query`, prefix matches on any word first.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&str> {
        let q = normalize_name(query);
        if q.is_empty() {
            return self.names.iter().take(limit).map(String::as_str).collect();
        }
        let mut prefixed = Vec::new();
        let mut contained = Vec::new();
        for name in &self.names {
            let n = normalize_name(name);
            if n.split_whitespace().any(|w| w.starts_with(&q)) || n.starts_with(&q) {
                prefixed.push(name.as_str());
            } else if n.contains(&q) {
                contained.push(name.as_str());
            }
        }
        prefixed.extend(contained);
        prefixed.truncate(limit);
        prefixed
    }

    /// Random sample for a "try one of these" list. The RNG is injected so
    /// callers (and tests) control determinism.
    pub fn shuffled<R: Rng + ?Sized>(&self, rng: &mut R, limit: usize) -> Vec<&str> {
        let mut picks: Vec<&str> = self.names.iter().map(String::as_str).collect();
        picks.shuffle(rng);
        picks.truncate(limit);
        picks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn index() -> SuggestionIndex {
        SuggestionIndex::new([
            "Claude Monet",
            "Édouard Manet",
            "Vincent van Gogh",
            "claude monet",
            "Gustav Klimt",
            "  ",
        ])
    }

    #[test]
    fn dedupes_on_normalized_name() {
        let idx = index();
        assert_eq!(idx.len(), 4);
        assert_eq!(idx.names()[0], "Claude Monet");
    }

    #[test]
    fn membership_ignores_case_and_accents() {
        let idx = index();
        assert!(idx.contains("edouard manet"));
        assert!(idx.contains("VINCENT VAN GOGH"));
        assert!(!idx.contains("Monet"));
    }

    #[test]
    fn search_ranks_word_prefix_first() {
        let idx = index();
        assert_eq!(idx.search("go", 10), vec!["Vincent van Gogh"]);
        assert_eq!(idx.search("net", 10), vec!["Claude Monet", "Édouard Manet"]);
        assert_eq!(idx.search("man", 10), vec!["Édouard Manet"]);
        assert_eq!(idx.search("", 2).len(), 2);
    }

    #[test]
    fn shuffle_is_deterministic_with_seed() {
        let idx = index();
        let a = idx.shuffled(&mut StdRng::seed_from_u64(7), 3);
        let b = idx.shuffled(&mut StdRng::seed_from_u64(7), 3);
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
    }
}

//! Approximate alias → value lookup.
//!
//! Scores are edit distances: lower is better, `0.0` only for an identical
//! alias. A score `<= 0.0` can never be improved upon and callers stop there.

use rustc_hash::FxHashMap;
use strsim::levenshtein;

// ============================================================================
// Distance
// ============================================================================

/// Subtracted when one side contains the other. Kept below 1.0 so a
/// non-identical pair always scores strictly above zero.
pub const CONTAINMENT_BONUS: f64 = 0.5;

/// Distance between a normalized query and a stored alias.
///
/// Levenshtein distance over chars, minus [`CONTAINMENT_BONUS`] when either
/// string contains the other. Identical strings score exactly `0.0`.
pub fn alias_distance(query: &str, alias: &str) -> f64 {
    if query == alias {
        return 0.0;
    }

    let raw = levenshtein(query, alias) as f64;
    let contained = !query.is_empty()
        && !alias.is_empty()
        && (alias.contains(query) || query.contains(alias));
    if contained {
        raw - CONTAINMENT_BONUS
    } else {
        raw
    }
}

// ============================================================================
// Index
// ============================================================================

#[derive(Debug, Clone)]
struct Entry<V> {
    alias: String,
    chars: usize,
    value: V,
}

/// Best entry found by [`FuzzyIndex::get`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyHit<'a, V> {
    pub score: f64,
    pub alias: &'a str,
    pub value: &'a V,
}

/// Alias → value store with nearest-alias lookup.
///
/// Several aliases may point at equal values. Re-inserting an alias
/// overwrites its value but keeps its original position, which is what
/// decides ties (first inserted wins).
#[derive(Debug, Clone)]
pub struct FuzzyIndex<V> {
    entries: Vec<Entry<V>>,
    slots: FxHashMap<String, usize>,
}

impl<V> FuzzyIndex<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            slots: FxHashMap::default(),
        }
    }

    /// Store `value` under `alias`, overwriting any previous value (last write wins).
    pub fn insert(&mut self, alias: impl Into<String>, value: V) {
        let alias = alias.into();
        if let Some(&slot) = self.slots.get(alias.as_str()) {
            self.entries[slot].value = value;
            return;
        }

        self.slots.insert(alias.clone(), self.entries.len());
        self.entries.push(Entry {
            chars: alias.chars().count(),
            alias,
            value,
        });
    }

    /// Number of distinct aliases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact alias lookup, no scoring.
    pub fn get_exact(&self, alias: &str) -> Option<&V> {
        self.slots.get(alias).map(|&slot| &self.entries[slot].value)
    }

    /// Aliases and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|e| (e.alias.as_str(), &e.value))
    }

    /// Nearest alias to `query`. `None` only when the index is empty.
    ///
    /// Scans every alias, but skips any whose length difference alone rules
    /// out beating the current best, and stops at the first exact hit.
    pub fn get(&self, query: &str) -> Option<FuzzyHit<'_, V>> {
        let query_chars = query.chars().count();
        let mut best: Option<(f64, usize)> = None;

        for (slot, entry) in self.entries.iter().enumerate() {
            if let Some((best_score, _)) = best {
                // Levenshtein is at least the length difference
                let floor = entry.chars.abs_diff(query_chars) as f64 - CONTAINMENT_BONUS;
                if floor >= best_score {
                    continue;
                }
            }

            let score = alias_distance(query, &entry.alias);
            if best.map_or(true, |(best_score, _)| score < best_score) {
                best = Some((score, slot));
                if score <= 0.0 {
                    break;
                }
            }
        }

        best.map(|(score, slot)| {
            let entry = &self.entries[slot];
            FuzzyHit {
                score,
                alias: &entry.alias,
                value: &entry.value,
            }
        })
    }
}

impl<V> Default for FuzzyIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Into<String>, V> FromIterator<(A, V)> for FuzzyIndex<V> {
    fn from_iter<T: IntoIterator<Item = (A, V)>>(iter: T) -> Self {
        let mut index = Self::new();
        for (alias, value) in iter {
            index.insert(alias, value);
        }
        index
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Shared normalization for catalog aliases and spoken queries.
//! Used by both catalog construction and the match resolver.
//!
//! CRITICAL: aliases and live queries must pass through the same normalizer,
//! otherwise exact matches silently degrade into near misses.

use once_cell::sync::Lazy;
use regex::Regex;

// ============================================================================
// REGEX PATTERNS
// ============================================================================

/// Collapses any run of whitespace (tabs, newlines, repeated spaces) to one space.
pub static MULTI_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// ============================================================================
// PHONETIC REPLACEMENTS
// ============================================================================

/// Transcription artifacts rewritten before matching (whole words only).
/// Voice assistants hear "Christmas" and transcribe "Xmas".
pub const DEFAULT_PHONETIC_REPLACEMENTS: &[(&str, &str)] = &[("xmas", "christmas")];

static DEFAULT_NORMALIZER: Lazy<Normalizer> = Lazy::new(Normalizer::default);

/// Normalize with the built-in replacement table.
/// e.g., "  Women & Songs " → "women and songs"
pub fn normalize(raw: &str) -> String {
    DEFAULT_NORMALIZER.normalize(raw)
}

/// Query normalizer carrying its phonetic replacement table.
///
/// Pure and total: every input produces an alias, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalizer {
    replacements: Vec<(String, String)>,
}

impl Normalizer {
    /// Build a normalizer from `(from, to)` pairs. Both sides are lowercased
    /// and trimmed so table entries line up with the lowercased query.
    pub fn new<I, A, B>(replacements: I) -> Self
    where
        I: IntoIterator<Item = (A, B)>,
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let replacements = replacements
            .into_iter()
            .map(|(from, to)| {
                (
                    from.as_ref().trim().to_lowercase(),
                    to.as_ref().trim().to_lowercase(),
                )
            })
            .filter(|(from, _)| !from.is_empty())
            .collect();
        Self { replacements }
    }

    pub fn replacements(&self) -> &[(String, String)] {
        &self.replacements
    }

    /// Canonicalize raw text into an alias.
    ///
    /// Steps, in order: pad with spaces, lowercase, whole-word phonetic
    /// replacements, `&` → ` and `, collapse whitespace, trim.
    pub fn normalize(&self, raw: &str) -> String {
        let mut result = format!(" {} ", raw).to_lowercase();

        for (from, to) in &self.replacements {
            result = replace_whole_words(&result, from, to);
        }

        // Keeps the compound separator unambiguous: no alias ever contains '&'
        result = result.replace('&', " and ");

        MULTI_SPACE.replace_all(&result, " ").trim().to_string()
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_PHONETIC_REPLACEMENTS.iter().copied())
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Replace `from` only where it is bounded by whitespace or the string edges.
/// Neighbouring whitespace is checked, not consumed, so back-to-back
/// occurrences ("xmas xmas") are all replaced.
pub fn replace_whole_words(text: &str, from: &str, to: &str) -> String {
    if from.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (at, _) in text.match_indices(from) {
        let end = at + from.len();
        let before_ok = text[..at].chars().next_back().map_or(true, char::is_whitespace);
        let after_ok = text[end..].chars().next().map_or(true, char::is_whitespace);
        if before_ok && after_ok {
            out.push_str(&text[last..at]);
            out.push_str(to);
            last = end;
        }
    }
    out.push_str(&text[last..]);
    out
}

// ============================================================================
// TESTS
// ============================================================================

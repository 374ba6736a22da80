//! Compound keys: a (thing, artist) pair folded into one alias string.
//!
//! The separator is safe only because the normalizer rewrites every `&`
//! to ` and `, so no normalized alias can contain it on its own.

use thiserror::Error;

/// Reserved separator between the two halves of a compound key.
pub const SEPARATOR: &str = " & ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The string did not contain exactly one separator.
    #[error("compound key has {found} parts, expected 2")]
    WrongPartCount { found: usize },
}

/// Join a pair into a compound key: `a & b`.
pub fn join(a: &str, b: &str) -> String {
    let mut joined = String::with_capacity(a.len() + SEPARATOR.len() + b.len());
    joined.push_str(a);
    joined.push_str(SEPARATOR);
    joined.push_str(b);
    joined
}

/// Split a compound key produced by [`join`] back into its halves.
pub fn split(s: &str) -> Result<(String, String), FormatError> {
    let parts: Vec<&str> = s.split(SEPARATOR).collect();
    match parts.as_slice() {
        [a, b] => Ok((a.to_string(), b.to_string())),
        _ => Err(FormatError::WrongPartCount { found: parts.len() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    #[test]
    fn test_join() {
        assert_eq!(join("21", "adele"), "21 & adele");
        assert_eq!(join("", ""), " & ");
    }

    #[test]
    fn test_split_round_trip() {
        let pairs = [("21", "adele"), ("hello", "adele"), ("", "x"), ("a by b", "c")];
        for (a, b) in pairs {
            assert_eq!(split(&join(a, b)), Ok((a.to_string(), b.to_string())));
        }
    }

    #[test]
    fn test_split_wrong_part_count() {
        assert_eq!(split("adele"), Err(FormatError::WrongPartCount { found: 1 }));
        assert_eq!(
            split("a & b & c"),
            Err(FormatError::WrongPartCount { found: 3 })
        );
    }

    #[test]
    fn test_normalized_parts_stay_splittable() {
        let song = normalize("Salt & Pepper");
        let artist = normalize("Simon & Garfunkel");
        let (a, b) = split(&join(&song, &artist)).unwrap();
        assert_eq!(a, "salt and pepper");
        assert_eq!(b, "simon and garfunkel");
    }

    #[test]
    fn test_error_message() {
        let err = split("nope").unwrap_err();
        assert_eq!(err.to_string(), "compound key has 1 parts, expected 2");
    }
}

//! Resolver configuration.
//!
//! Everything here is data, not engine logic: which playlists to ignore,
//! extra artist nicknames, and the transcription-artifact table. All fields
//! default, so an empty TOML file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::normalize::{Normalizer, DEFAULT_PHONETIC_REPLACEMENTS};

/// Name of the working playlist the playback side creates for queued tracks.
pub const DEFAULT_AUTOMATED_PLAYLIST: &str = "Automated";

/// Library-default pseudo-playlists that are never matched.
pub const DEFAULT_EXCLUDED_PLAYLISTS: &[&str] = &[
    "Library",
    "Music",
    "Movies",
    "TV Shows",
    "Podcasts",
    "Audiobooks",
    "Genius",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Syntax(#[from] toml::de::Error),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Build the Song and SongArtist indexes. Disable for very large libraries.
    pub include_songs: bool,

    /// Working playlist owned by the playback side; never indexed.
    pub automated_playlist: String,

    pub excluded_playlists: Vec<String>,

    /// Normalized artist name → extra aliases (stage names, nicknames).
    pub artist_nicknames: BTreeMap<String, Vec<String>>,

    /// Whole-word `(from, to)` rewrites applied to every alias and query.
    pub phonetic_replacements: Vec<(String, String)>,

    /// Subtracted from playlist scores so "play X" prefers a playlist named X.
    pub playlist_bias: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let mut artist_nicknames = BTreeMap::new();
        artist_nicknames.insert(
            "alanis morissette".to_string(),
            vec!["wet cat".to_string(), "the wet cat".to_string()],
        );

        Self {
            include_songs: true,
            automated_playlist: DEFAULT_AUTOMATED_PLAYLIST.to_string(),
            excluded_playlists: DEFAULT_EXCLUDED_PLAYLISTS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            artist_nicknames,
            phonetic_replacements: DEFAULT_PHONETIC_REPLACEMENTS
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            playlist_bias: 1.0,
        }
    }
}

impl ResolverConfig {
    /// Load from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validated()
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validated()
    }

    /// Reject values that would break score comparisons.
    pub fn validated(self) -> Result<Self, ConfigError> {
        if !self.playlist_bias.is_finite() || self.playlist_bias < 0.0 {
            return Err(ConfigError::Invalid {
                field: "playlist_bias",
                reason: format!("must be a finite, non-negative number, got {}", self.playlist_bias),
            });
        }
        Ok(self)
    }

    /// Load from `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.phonetic_replacements.iter().map(|(a, b)| (a, b)))
    }

    /// True for pseudo-playlists and the automated working playlist.
    pub fn is_excluded_playlist(&self, name: &str) -> bool {
        name == self.automated_playlist || self.excluded_playlists.iter().any(|p| p == name)
    }
}

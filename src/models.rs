//! Core data models for catalog matching.
//!
//! Library snapshot types supplied by the media-library collaborator, the
//! facets a phrase can resolve to, and the typed match handed to playback.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::error;

use crate::compound;

// ============================================================================
// Library Snapshot
// ============================================================================

/// Kind of a library item. Only `File` items are indexed or played.
///
/// Parsed leniently: any unrecognized kind becomes `Other`, which is never
/// playable. JSON and SQLite sources go through the same mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum TrackKind {
    #[default]
    File,
    Url,
    Device,
    SharedLibrary,
    Cd,
    Other,
}

impl TrackKind {
    pub fn is_playable(self) -> bool {
        self == TrackKind::File
    }
}

impl From<&str> for TrackKind {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "file" => TrackKind::File,
            "url" => TrackKind::Url,
            "device" => TrackKind::Device,
            "shared" | "shared_library" => TrackKind::SharedLibrary,
            "cd" => TrackKind::Cd,
            _ => TrackKind::Other,
        }
    }
}

impl From<String> for TrackKind {
    fn from(s: String) -> Self {
        TrackKind::from(s.as_str())
    }
}

/// One library item as enumerated by the library collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub kind: TrackKind,
    #[serde(default)]
    pub track_number: u32,
}

impl Track {
    pub fn file(name: &str, artist: &str, album: &str, track_number: u32) -> Self {
        Self {
            name: name.to_string(),
            artist: artist.to_string(),
            album: album.to_string(),
            kind: TrackKind::File,
            track_number,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub name: String,
}

impl Playlist {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Full enumeration of a media library at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibrarySnapshot {
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub playlists: Vec<Playlist>,
}

impl LibrarySnapshot {
    /// Tracks that can be indexed and played.
    pub fn playable_tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter().filter(|t| t.kind.is_playable())
    }
}

// ============================================================================
// Facets and Matches
// ============================================================================

/// Category of catalog entity a phrase can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Song,
    Album,
    Artist,
    Playlist,
    SongArtist,
    AlbumArtist,
}

impl Facet {
    pub const ALL: [Facet; 6] = [
        Facet::Song,
        Facet::Album,
        Facet::Artist,
        Facet::Playlist,
        Facet::SongArtist,
        Facet::AlbumArtist,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Facet::Song => "song",
            Facet::Album => "album",
            Facet::Artist => "artist",
            Facet::Playlist => "playlist",
            Facet::SongArtist => "song_artist",
            Facet::AlbumArtist => "album_artist",
        }
    }

    pub fn is_compound(self) -> bool {
        matches!(self, Facet::SongArtist | Facet::AlbumArtist)
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical (display-case) value of a resolved entity, tagged by facet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "facet", rename_all = "snake_case")]
pub enum CatalogMatch {
    Song { name: String },
    Album { name: String },
    Artist { name: String },
    Playlist { name: String },
    SongArtist { song: String, artist: String },
    AlbumArtist { album: String, artist: String },
}

impl CatalogMatch {
    pub fn facet(&self) -> Facet {
        match self {
            CatalogMatch::Song { .. } => Facet::Song,
            CatalogMatch::Album { .. } => Facet::Album,
            CatalogMatch::Artist { .. } => Facet::Artist,
            CatalogMatch::Playlist { .. } => Facet::Playlist,
            CatalogMatch::SongArtist { .. } => Facet::SongArtist,
            CatalogMatch::AlbumArtist { .. } => Facet::AlbumArtist,
        }
    }

    /// Display form; compound values are joined with the compound separator.
    pub fn display_value(&self) -> String {
        match self {
            CatalogMatch::Song { name }
            | CatalogMatch::Album { name }
            | CatalogMatch::Artist { name }
            | CatalogMatch::Playlist { name } => name.clone(),
            CatalogMatch::SongArtist { song, artist } => compound::join(song, artist),
            CatalogMatch::AlbumArtist { album, artist } => compound::join(album, artist),
        }
    }
}

/// Outcome of resolving one phrase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// Phrase as received, before normalization.
    pub query: String,
    /// Winning score after any facet bias.
    pub score: f64,
    /// Alias that produced the winning score.
    pub alias: String,
    #[serde(rename = "match")]
    pub matched: CatalogMatch,
}

impl Resolution {
    pub fn facet(&self) -> Facet {
        self.matched.facet()
    }

    /// Normalized halves of the matched compound alias; `None` for single facets.
    ///
    /// Compound aliases are always built with [`compound::join`], so a failed
    /// split is a logic error: fatal in debug builds, logged otherwise.
    pub fn alias_parts(&self) -> Option<(String, String)> {
        if !self.facet().is_compound() {
            return None;
        }
        match compound::split(&self.alias) {
            Ok(parts) => Some(parts),
            Err(err) => {
                error!(%err, alias = %self.alias, "Malformed compound alias");
                debug_assert!(false, "compound alias {:?} does not split: {}", self.alias, err);
                None
            }
        }
    }

    /// `"<original query>" to <facet> "<matched value>"`
    pub fn trace_line(&self) -> String {
        format!(
            "\"{}\" to {} \"{}\"",
            self.query,
            self.facet(),
            self.matched.display_value()
        )
    }
}
